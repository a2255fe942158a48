use std::fmt;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::error::AppError;

pub const SESSION_COOKIE: &str = "accessToken";

const SESSION_MAX_AGE: Duration = Duration::hours(24);

#[derive(Clone, Copy, Debug, Default)]
pub struct CookieSettings {
    pub secure: bool,
}

/// Opaque bearer token carried in the session cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the session cookie; an empty value counts as no credential.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let jar = CookieJar::from_headers(headers);
        jar.get(SESSION_COOKIE)
            .map(Cookie::value)
            .filter(|value| !value.is_empty())
            .map(AccessToken::new)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        AccessToken::from_headers(&parts.headers).ok_or(AppError::MissingToken)
    }
}

/// Cookie set after a successful sign-in.
pub fn session_cookie(token: &str, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.to_string()))
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .max_age(SESSION_MAX_AGE)
        .path("/")
        .build()
}

/// Cookie that overwrites the session with an already-expired empty value.
pub fn expired_session_cookie(settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, String::new()))
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Strict)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .max_age(Duration::ZERO)
        .path("/")
        .build()
}
