//! Field-level validation for inbound request bodies and console forms.
//!
//! Every check records at most one message per field; the first failing rule
//! wins. Handlers turn a non-empty [`FieldErrors`] into a 400 response before
//! any backend call is made.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::{
    AssignmentRequest, NewPersonPayload, PersonKind, PersonPatch, ProfileUpdate, SignInRequest,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All messages joined for a single-line alert.
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join(", ")
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }

    /// Moves a message to another key, used when form field names differ
    /// from wire names. An existing message under `to` is kept.
    pub fn rename(&mut self, from: &str, to: &str) {
        if let Some(message) = self.0.remove(from) {
            self.0.entry(to.to_string()).or_insert(message);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

pub(crate) fn require_non_empty(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

pub(crate) fn require_email(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if !is_email(value) {
        errors.push(field, message);
    }
}

pub(crate) fn require_phone(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if !is_phone_number(value) {
        errors.push(field, message);
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // No lookaround in `regex`; leading dots and `..` are rejected in `is_email`.
        let pattern = r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+?[0-9]{10,15}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Same acceptance as the console's form schema: no leading dot, no `..`,
/// dotted domain with an alphabetic top-level label of two or more letters.
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}

/// An optional leading `+` followed by 10 to 15 digits.
pub fn is_phone_number(value: &str) -> bool {
    phone_regex().is_match(value)
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.is_empty() {
            errors.push("username", "Username must not be empty");
        }
        if self.password.chars().count() < 6 {
            errors.push("password", "Password must be at least 6 characters.");
        }
        errors.into_result()
    }
}

/// Checks a creation payload for the given resource.
pub fn validate_new_person(payload: &NewPersonPayload, kind: PersonKind) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    require_non_empty(&mut errors, "firstName", &payload.first_name, "First Name is required");
    require_non_empty(&mut errors, "lastName", &payload.last_name, "Last Name is required");
    require_non_empty(&mut errors, "address", &payload.address, "Address is required");
    require_email(&mut errors, "email", &payload.email, "Invalid email address");
    if payload.unique_id.trim().is_empty() {
        errors.push("uniqueId", format!("{} ID is required", kind.label()));
    }
    if let Some(contact) = &payload.contact_number {
        require_phone(
            &mut errors,
            "contactNumber",
            contact,
            "Contact number must be a valid phone number",
        );
    }
    if let Some(role) = payload.role {
        if role != kind.role() {
            errors.push("role", format!("Role must be {}", kind.label().to_uppercase()));
        }
    }

    // Year level, course and department travel together.
    let placed = [
        payload.year_level.is_some(),
        payload.course_id.is_some(),
        payload.department_id.is_some(),
    ];
    if placed.iter().any(|present| *present) {
        if payload.year_level.is_none() {
            errors.push("yearLevel", "Year level is required when a course is set");
        }
        if payload.course_id.is_none() {
            errors.push("courseId", "Course is required when a year level is set");
        }
        if payload.department_id.is_none() {
            errors.push("departmentId", "Department is required when a course is set");
        }
    }
    errors.into_result()
}

impl Validate for PersonPatch {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(first_name) = &self.first_name {
            require_non_empty(&mut errors, "firstName", first_name, "First Name is required");
        }
        if let Some(last_name) = &self.last_name {
            require_non_empty(&mut errors, "lastName", last_name, "Last Name is required");
        }
        if let Some(address) = &self.address {
            require_non_empty(&mut errors, "address", address, "Address is required");
        }
        if let Some(email) = &self.email {
            require_email(&mut errors, "email", email, "Invalid email address");
        }
        if let Some(Some(contact)) = &self.contact_number {
            require_phone(
                &mut errors,
                "contactNumber",
                contact,
                "Contact number must be a valid phone number",
            );
        }
        if matches!(self.course_id, Some(Some(_))) && matches!(self.department_id, Some(None)) {
            errors.push("departmentId", "Department is required when a course is set");
        }
        errors.into_result()
    }
}

impl Validate for ProfileUpdate {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Some(first_name) = &self.first_name {
            require_non_empty(&mut errors, "firstName", first_name, "First name must not be empty");
        }
        if let Some(last_name) = &self.last_name {
            require_non_empty(&mut errors, "lastName", last_name, "Last name must not be empty");
        }
        if let Some(contact) = &self.contact_number {
            require_phone(
                &mut errors,
                "contactNumber",
                contact,
                "Contact number must be a valid phone number",
            );
        }
        if let Some(department) = &self.department {
            require_non_empty(&mut errors, "department", department, "Department must not be empty");
        }
        if let Some(email) = &self.email_address {
            require_email(&mut errors, "emailAddress", email, "Email address must be a valid email");
        }
        if let Some(password) = &self.password {
            if password.chars().count() < 6 {
                errors.push("password", "Password must be at least 6 characters long");
            }
        }
        if let Some(address) = &self.address {
            require_non_empty(&mut errors, "address", address, "Address must not be empty");
        }
        errors.into_result()
    }
}

impl Validate for AssignmentRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.student_ids.is_empty() {
            errors.push("studentIds", "Select at least one student");
        }
        if self.coach_id <= 0 {
            errors.push("coachId", "Select a coach");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentMode, Role};
    use rstest::rstest;

    fn coach_payload() -> NewPersonPayload {
        NewPersonPayload {
            username: "C-001".to_string(),
            password: "password".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            unique_id: "C-001".to_string(),
            bio: String::new(),
            contact_number: None,
            email: "ada@example.edu".to_string(),
            department_id: Some(2),
            course_id: Some(7),
            year_level: Some(crate::models::YearLevel::First),
            address: "12 Analytical St".to_string(),
            role: Some(Role::Coach),
        }
    }

    #[rstest]
    #[case("ada@example.edu", true)]
    #[case("a.b+c@dept.school.ph", true)]
    #[case("ada@example", false)]
    #[case("ada.example.edu", false)]
    #[case("@example.edu", false)]
    #[case("ada @example.edu", false)]
    #[case("ada@example..edu", false)]
    #[case("a@b.c", false)]
    #[case("ada@-.-", false)]
    #[case("ada@exa_mple.edu", false)]
    #[case(".ada@example.edu", false)]
    #[case("ada..lovelace@example.edu", false)]
    #[case("o'brien@example.edu", true)]
    #[case("ada@mail-1.example.edu", true)]
    fn email_shapes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_email(value), valid);
    }

    #[rstest]
    #[case("09171234567", true)]
    #[case("+639171234567", true)]
    #[case("123456789", false)]
    #[case("0917-123-4567", false)]
    #[case("+1234567890123456", false)]
    #[case("+63 9171234567", false)]
    #[case("٠٩١٧١٢٣٤٥٦٧", false)]
    fn phone_shapes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_phone_number(value), valid);
    }

    #[test]
    fn short_password_is_rejected() {
        let request = SignInRequest {
            role: Role::Admin,
            username: "admin".to_string(),
            password: "short".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters.")
        );
        assert!(!errors.contains("username"));
    }

    #[test]
    fn complete_coach_payload_passes() {
        assert!(validate_new_person(&coach_payload(), PersonKind::Coach).is_ok());
    }

    #[test]
    fn empty_first_name_is_keyed() {
        let mut payload = coach_payload();
        payload.first_name = String::new();
        let errors = validate_new_person(&payload, PersonKind::Coach).unwrap_err();
        assert_eq!(errors.get("firstName"), Some("First Name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_unique_id_names_the_kind() {
        let mut payload = coach_payload();
        payload.unique_id = "  ".to_string();
        let errors = validate_new_person(&payload, PersonKind::Student).unwrap_err();
        assert_eq!(errors.get("uniqueId"), Some("Student ID is required"));
    }

    #[test]
    fn course_without_department_is_rejected() {
        let mut payload = coach_payload();
        payload.department_id = None;
        let errors = validate_new_person(&payload, PersonKind::Coach).unwrap_err();
        assert!(errors.contains("departmentId"));
    }

    #[test]
    fn unplaced_person_passes() {
        let mut payload = coach_payload();
        payload.year_level = None;
        payload.course_id = None;
        payload.department_id = None;
        assert!(validate_new_person(&payload, PersonKind::Coach).is_ok());
    }

    #[test]
    fn mismatched_role_is_rejected() {
        let errors = validate_new_person(&coach_payload(), PersonKind::Student).unwrap_err();
        assert_eq!(errors.get("role"), Some("Role must be STUDENT"));
    }

    #[test]
    fn patch_checks_only_present_fields() {
        let patch = PersonPatch {
            email: Some("not-an-email".to_string()),
            ..PersonPatch::default()
        };
        let errors = patch.validate().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email address"));
        assert!(PersonPatch::default().validate().is_ok());
    }

    #[test]
    fn profile_update_summary_joins_messages() {
        let update = ProfileUpdate {
            first_name: Some(String::new()),
            password: Some("abc".to_string()),
            ..ProfileUpdate::default()
        };
        let errors = update.validate().unwrap_err();
        assert_eq!(
            errors.summary(),
            "First name must not be empty, Password must be at least 6 characters long"
        );
    }

    #[test]
    fn assignment_needs_students_and_coach() {
        let request = AssignmentRequest {
            student_ids: Vec::new(),
            coach_id: 0,
            mode: AssignmentMode::Assign,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.contains("studentIds"));
        assert!(errors.contains("coachId"));
    }
}
