//! Typed form state for the create and view/edit person modals.
//!
//! The `N/A` placeholder lives only in [`EditDraft::display`] and
//! [`EditDraft::set`]; drafts, snapshots and patches hold real optional values.

use crate::models::{NewPersonPayload, Person, PersonKind, PersonPatch, YearLevel};
use crate::validation::{FieldErrors, validate_new_person};

use super::CourseCatalog;
use super::api::CreatedRecord;

pub const NOT_AVAILABLE: &str = "N/A";

/// Password given to accounts created from the console.
pub const DEFAULT_PASSWORD: &str = "password";

pub fn to_display(value: Option<&str>) -> String {
    match value {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn from_display(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    FirstName,
    LastName,
    Email,
    Address,
    ContactNumber,
    YearLevel,
    CourseId,
}

impl PersonField {
    pub const ALL: [PersonField; 7] = [
        PersonField::FirstName,
        PersonField::LastName,
        PersonField::Email,
        PersonField::Address,
        PersonField::ContactNumber,
        PersonField::YearLevel,
        PersonField::CourseId,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PersonField::FirstName => "firstName",
            PersonField::LastName => "lastName",
            PersonField::Email => "email",
            PersonField::Address => "address",
            PersonField::ContactNumber => "contactNumber",
            PersonField::YearLevel => "yearLevel",
            PersonField::CourseId => "courseId",
        }
    }
}

/// The "Add Coach" / "Add Student" form. Starts blank.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: String,
    /// Coach or student number; becomes both `uniqueId` and `username`.
    pub identifier: String,
    pub year_level: Option<YearLevel>,
    pub course_id: Option<i64>,
    errors: FieldErrors,
}

impl CreateForm {
    /// A blank form with the year level and course dropdowns preselected.
    pub fn preset(year_level: Option<YearLevel>, course_id: Option<i64>) -> Self {
        Self {
            year_level,
            course_id,
            ..Self::default()
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub(crate) fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors = FieldErrors::new();
    }

    pub fn payload(&self, kind: PersonKind, catalog: &CourseCatalog) -> NewPersonPayload {
        let identifier = self.identifier.trim().to_string();
        NewPersonPayload {
            username: identifier.clone(),
            password: DEFAULT_PASSWORD.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            unique_id: identifier,
            bio: String::new(),
            contact_number: None,
            email: self.email.trim().to_string(),
            department_id: self
                .course_id
                .and_then(|course_id| catalog.department_for(course_id)),
            course_id: self.course_id,
            year_level: self.year_level,
            address: self.address.trim().to_string(),
            role: Some(kind.role()),
        }
    }

    /// Builds the creation payload, or per-field messages keyed by form
    /// input name.
    pub fn validate(
        &self,
        kind: PersonKind,
        catalog: &CourseCatalog,
    ) -> Result<NewPersonPayload, FieldErrors> {
        let payload = self.payload(kind, catalog);
        match validate_new_person(&payload, kind) {
            Ok(()) => Ok(payload),
            Err(mut errors) => {
                errors.rename("uniqueId", kind.id_field());
                errors.rename("departmentId", "courseId");
                Err(errors)
            }
        }
    }
}

/// Combines a submitted payload with the fields the backend assigned.
pub fn created_person(payload: NewPersonPayload, created: CreatedRecord, kind: PersonKind) -> Person {
    Person {
        id: created.id,
        unique_id: payload.unique_id,
        username: payload.username,
        first_name: payload.first_name,
        last_name: payload.last_name,
        email: payload.email,
        address: payload.address,
        bio: Some(payload.bio),
        contact_number: payload.contact_number,
        year_level: payload.year_level,
        course_id: payload.course_id,
        department_id: payload.department_id,
        role: payload.role.unwrap_or(kind.role()),
        created_at: created.created_at,
        updated_at: created.updated_at,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct DraftValues {
    first_name: String,
    last_name: String,
    email: String,
    address: String,
    contact_number: Option<String>,
    year_level: Option<YearLevel>,
    course_id: Option<i64>,
}

impl DraftValues {
    /// Normalised the same way [`EditDraft::set`] normalises input, so a
    /// displayed value written back unchanged compares equal.
    fn of(person: &Person) -> Self {
        Self {
            first_name: from_display(&person.first_name).unwrap_or_default(),
            last_name: from_display(&person.last_name).unwrap_or_default(),
            email: from_display(&person.email).unwrap_or_default(),
            address: from_display(&person.address).unwrap_or_default(),
            contact_number: person.contact_number.as_deref().and_then(from_display),
            year_level: person.year_level,
            course_id: person.course_id,
        }
    }
}

/// Editable copy of a record opened in the view/edit modal, diffed against
/// the immutable snapshot on save.
#[derive(Debug, Clone)]
pub struct EditDraft {
    snapshot: Person,
    values: DraftValues,
}

impl EditDraft {
    pub fn new(snapshot: Person) -> Self {
        let values = DraftValues::of(&snapshot);
        Self { snapshot, values }
    }

    pub fn snapshot(&self) -> &Person {
        &self.snapshot
    }

    pub fn id(&self) -> i64 {
        self.snapshot.id
    }

    pub fn display(&self, field: PersonField) -> String {
        let values = &self.values;
        match field {
            PersonField::FirstName => to_display(Some(&values.first_name)),
            PersonField::LastName => to_display(Some(&values.last_name)),
            PersonField::Email => to_display(Some(&values.email)),
            PersonField::Address => to_display(Some(&values.address)),
            PersonField::ContactNumber => to_display(values.contact_number.as_deref()),
            PersonField::YearLevel => to_display(values.year_level.map(YearLevel::as_str)),
            PersonField::CourseId => values
                .course_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    /// Stores what the user typed or picked; the placeholder means "empty".
    pub fn set(&mut self, field: PersonField, text: &str) {
        let value = from_display(text);
        let values = &mut self.values;
        match field {
            PersonField::FirstName => values.first_name = value.unwrap_or_default(),
            PersonField::LastName => values.last_name = value.unwrap_or_default(),
            PersonField::Email => values.email = value.unwrap_or_default(),
            PersonField::Address => values.address = value.unwrap_or_default(),
            PersonField::ContactNumber => values.contact_number = value,
            PersonField::YearLevel => {
                values.year_level = value.as_deref().and_then(YearLevel::parse)
            }
            PersonField::CourseId => values.course_id = value.and_then(|v| v.parse().ok()),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.values != DraftValues::of(&self.snapshot)
    }

    /// Discards edits.
    pub fn reset(&mut self) {
        self.values = DraftValues::of(&self.snapshot);
    }

    /// The minimal change-set against the snapshot. A changed course carries
    /// its department along; a course cannot be cleared from here.
    pub fn diff(&self, catalog: &CourseCatalog) -> PersonPatch {
        let original = DraftValues::of(&self.snapshot);
        let current = &self.values;
        let mut patch = PersonPatch::default();

        if current.first_name != original.first_name {
            patch.first_name = Some(current.first_name.clone());
        }
        if current.last_name != original.last_name {
            patch.last_name = Some(current.last_name.clone());
        }
        if current.email != original.email {
            patch.email = Some(current.email.clone());
        }
        if current.address != original.address {
            patch.address = Some(current.address.clone());
        }
        if current.contact_number != original.contact_number {
            patch.contact_number = Some(current.contact_number.clone());
        }
        if current.year_level != original.year_level {
            patch.year_level = Some(current.year_level);
        }
        if let Some(course_id) = current.course_id {
            if Some(course_id) != original.course_id {
                patch.course_id = Some(Some(course_id));
                patch.department_id = Some(catalog.department_for(course_id));
            }
        }

        patch
    }
}
