use std::time::{Duration, Instant};

/// Time an alert stays fully visible before fading.
pub const ALERT_VISIBLE_FOR: Duration = Duration::from_secs(3);
pub const ALERT_FADE_OUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub message: String,
    pub kind: AlertKind,
    raised_at: Instant,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self::at(message, AlertKind::Success, Instant::now())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::at(message, AlertKind::Error, Instant::now())
    }

    pub fn at(message: impl Into<String>, kind: AlertKind, raised_at: Instant) -> Self {
        Self {
            message: message.into(),
            kind,
            raised_at,
        }
    }

    pub fn is_fading(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= ALERT_VISIBLE_FOR
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= ALERT_VISIBLE_FOR + ALERT_FADE_OUT
    }
}

/// The single dismissible alert a page shows.
#[derive(Debug, Clone, Default)]
pub struct AlertSlot(Option<Alert>);

impl AlertSlot {
    pub fn raise(&mut self, alert: Alert) {
        self.0 = Some(alert);
    }

    pub fn current(&self) -> Option<&Alert> {
        self.0.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.0 = None;
    }

    /// Clears the alert once its fade-out has finished.
    pub fn expire(&mut self, now: Instant) {
        if self.0.as_ref().is_some_and(|alert| alert.is_expired(now)) {
            self.0 = None;
        }
    }
}
