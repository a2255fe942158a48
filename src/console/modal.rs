/// Lifecycle of a modal: `Closed → Open → (Editing) → Submitting → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    /// Create forms are editable here; view forms are read-only.
    Open,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModalState {
    phase: ModalPhase,
    resume: ModalPhase,
}

impl ModalState {
    pub fn phase(&self) -> ModalPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != ModalPhase::Closed
    }

    pub fn is_editing(&self) -> bool {
        self.phase == ModalPhase::Editing
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == ModalPhase::Submitting
    }

    pub fn open(&mut self) {
        self.phase = ModalPhase::Open;
    }

    /// Unlocks a read-only view for editing.
    pub fn begin_edit(&mut self) -> bool {
        if self.phase == ModalPhase::Open {
            self.phase = ModalPhase::Editing;
            true
        } else {
            false
        }
    }

    /// Leaves editing without closing, e.g. after a cancel.
    pub fn end_edit(&mut self) {
        if self.phase == ModalPhase::Editing {
            self.phase = ModalPhase::Open;
        }
    }

    pub fn begin_submit(&mut self) -> bool {
        match self.phase {
            ModalPhase::Open | ModalPhase::Editing => {
                self.resume = self.phase;
                self.phase = ModalPhase::Submitting;
                true
            }
            _ => false,
        }
    }

    /// Returns to the phase the submission started from; entered data stays.
    pub fn submit_failed(&mut self) {
        if self.phase == ModalPhase::Submitting {
            self.phase = self.resume;
        }
    }

    pub fn close(&mut self) {
        self.phase = ModalPhase::Closed;
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() { "Saving..." } else { "Save" }
    }

    /// Action button of a view/edit modal.
    pub fn view_action_label(&self) -> &'static str {
        match self.phase {
            ModalPhase::Open | ModalPhase::Closed => "Edit",
            ModalPhase::Editing => "Save",
            ModalPhase::Submitting => "Saving...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_submit_returns_to_editing() {
        let mut modal = ModalState::default();
        modal.open();
        assert!(modal.begin_edit());
        assert!(modal.begin_submit());
        assert_eq!(modal.submit_label(), "Saving...");
        modal.submit_failed();
        assert_eq!(modal.phase(), ModalPhase::Editing);
    }

    #[test]
    fn closed_modal_cannot_submit() {
        let mut modal = ModalState::default();
        assert!(!modal.begin_submit());
        assert!(!modal.begin_edit());
    }
}
