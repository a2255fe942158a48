use tracing::warn;

use crate::models::{Profile, ProfileUpdate};
use crate::validation::Validate;

use super::alert::{Alert, AlertSlot};
use super::api::ConsoleApi;
use super::form::{from_display, to_display};
use super::modal::ModalState;

pub const PROFILE_SAVED_MESSAGE: &str = "Profile updated successfully!";
pub const PROFILE_SAVE_FAILED_MESSAGE: &str = "An unexpected error occurred. Please try again.";
pub const PROFILE_LOAD_FAILED_MESSAGE: &str = "Error: Could not load profile data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Department,
    EmailAddress,
    Password,
    ContactNumber,
    Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ProfileDraft {
    first_name: Option<String>,
    last_name: Option<String>,
    department: Option<String>,
    email_address: Option<String>,
    password: Option<String>,
    contact_number: Option<String>,
    address: Option<String>,
}

impl ProfileDraft {
    fn of(profile: &Profile) -> Self {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            first_name: Some(profile.first_name.clone()).filter(|v| !v.is_empty()),
            last_name: Some(profile.last_name.clone()).filter(|v| !v.is_empty()),
            department: present(&profile.department),
            email_address: present(&profile.email),
            password: None,
            contact_number: present(&profile.contact_number),
            address: present(&profile.address),
        }
    }

    fn slot(&mut self, field: ProfileField) -> &mut Option<String> {
        match field {
            ProfileField::FirstName => &mut self.first_name,
            ProfileField::LastName => &mut self.last_name,
            ProfileField::Department => &mut self.department,
            ProfileField::EmailAddress => &mut self.email_address,
            ProfileField::Password => &mut self.password,
            ProfileField::ContactNumber => &mut self.contact_number,
            ProfileField::Address => &mut self.address,
        }
    }

    fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::FirstName => self.first_name.as_deref(),
            ProfileField::LastName => self.last_name.as_deref(),
            ProfileField::Department => self.department.as_deref(),
            ProfileField::EmailAddress => self.email_address.as_deref(),
            ProfileField::Password => self.password.as_deref(),
            ProfileField::ContactNumber => self.contact_number.as_deref(),
            ProfileField::Address => self.address.as_deref(),
        }
    }
}

/// The signed-in user's profile page: a loaded snapshot, an editable draft
/// and the save flow.
#[derive(Debug, Default)]
pub struct ProfileEditor {
    profile: Option<Profile>,
    draft: ProfileDraft,
    load_error: Option<String>,
    modal: ModalState,
    alert: AlertSlot,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, api: &dyn ConsoleApi) -> bool {
        match api.profile().await {
            Ok(profile) => {
                self.draft = ProfileDraft::of(&profile);
                self.profile = Some(profile);
                self.load_error = None;
                self.modal.open();
                true
            }
            Err(err) => {
                warn!("failed to load profile: {}", err);
                self.load_error = Some(PROFILE_LOAD_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.profile.is_none() && self.load_error.is_none()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn alert(&self) -> &AlertSlot {
        &self.alert
    }

    pub fn alert_mut(&mut self) -> &mut AlertSlot {
        &mut self.alert
    }

    pub fn begin_edit(&mut self) -> bool {
        self.modal.begin_edit()
    }

    pub fn cancel_edit(&mut self) {
        if let Some(profile) = &self.profile {
            self.draft = ProfileDraft::of(profile);
        }
        self.modal.end_edit();
    }

    pub fn display(&self, field: ProfileField) -> String {
        to_display(self.draft.get(field))
    }

    pub fn set(&mut self, field: ProfileField, text: &str) {
        if self.modal.is_editing() {
            *self.draft.slot(field) = from_display(text);
        }
    }

    /// Changed fields only. Empty or placeholder inputs are left out, so a
    /// profile field cannot be cleared from here.
    pub fn diff(&self) -> ProfileUpdate {
        let Some(profile) = &self.profile else {
            return ProfileUpdate::default();
        };
        let original = ProfileDraft::of(profile);
        let changed = |current: &Option<String>, before: &Option<String>| {
            current.as_ref().filter(|_| current != before).cloned()
        };

        ProfileUpdate {
            first_name: changed(&self.draft.first_name, &original.first_name),
            last_name: changed(&self.draft.last_name, &original.last_name),
            contact_number: changed(&self.draft.contact_number, &original.contact_number),
            department: changed(&self.draft.department, &original.department),
            email_address: changed(&self.draft.email_address, &original.email_address),
            password: self.draft.password.clone(),
            address: changed(&self.draft.address, &original.address),
        }
    }

    /// Validates and sends the diff. Returns `true` once the backend accepted
    /// a change.
    pub async fn save(&mut self, api: &dyn ConsoleApi) -> bool {
        let Some(id) = self.profile.as_ref().map(|profile| profile.id) else {
            return false;
        };

        let update = self.diff();
        if update.is_empty() {
            self.modal.end_edit();
            return false;
        }

        self.alert.dismiss();
        if let Err(errors) = update.validate() {
            self.alert.raise(Alert::error(errors.summary()));
            return false;
        }

        if !self.modal.begin_submit() {
            return false;
        }

        match api.update_profile(id, &update).await {
            Ok(_) => {
                if let Some(profile) = self.profile.as_mut() {
                    profile.apply(&update);
                    self.draft = ProfileDraft::of(profile);
                }
                self.modal.open();
                self.alert.raise(Alert::success(PROFILE_SAVED_MESSAGE));
                true
            }
            Err(err) => {
                warn!("profile update rejected: {}", err);
                self.modal.submit_failed();
                self.alert.raise(Alert::error(PROFILE_SAVE_FAILED_MESSAGE));
                false
            }
        }
    }
}
