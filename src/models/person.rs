use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;

/// Academic year level carried by students and coaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum YearLevel {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl YearLevel {
    pub const ALL: [YearLevel; 5] = [
        YearLevel::First,
        YearLevel::Second,
        YearLevel::Third,
        YearLevel::Fourth,
        YearLevel::Fifth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            YearLevel::First => "FIRST",
            YearLevel::Second => "SECOND",
            YearLevel::Third => "THIRD",
            YearLevel::Fourth => "FOURTH",
            YearLevel::Fifth => "FIFTH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            YearLevel::First => "1st Year",
            YearLevel::Second => "2nd Year",
            YearLevel::Third => "3rd Year",
            YearLevel::Fourth => "4th Year",
            YearLevel::Fifth => "5th Year",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }
}

/// Which person resource a handler or console section works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonKind {
    Coach,
    Student,
}

impl PersonKind {
    pub fn role(self) -> Role {
        match self {
            PersonKind::Coach => Role::Coach,
            PersonKind::Student => Role::Student,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PersonKind::Coach => "Coach",
            PersonKind::Student => "Student",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            PersonKind::Coach => "coaches",
            PersonKind::Student => "students",
        }
    }

    /// Name of the identifier input on the creation form.
    pub fn id_field(self) -> &'static str {
        match self {
            PersonKind::Coach => "coachId",
            PersonKind::Student => "studentId",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    #[serde(default)]
    pub unique_id: String,
    #[serde(default)]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub year_level: Option<YearLevel>,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub department_id: Option<i64>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Merges an accepted patch into this record.
    pub fn apply(&mut self, patch: &PersonPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(address) = &patch.address {
            self.address = address.clone();
        }
        if let Some(contact_number) = &patch.contact_number {
            self.contact_number = contact_number.clone();
        }
        if let Some(year_level) = patch.year_level {
            self.year_level = year_level;
        }
        if let Some(course_id) = patch.course_id {
            self.course_id = course_id;
        }
        if let Some(department_id) = patch.department_id {
            self.department_id = department_id;
        }
    }
}

/// Creation body for `POST /api/coaches` and `POST /api/students`.
///
/// Text fields default to empty so that a missing field surfaces as a
/// per-field validation message rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonPayload {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub unique_id: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub year_level: Option<YearLevel>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Sparse update. Nullable fields use `Some(None)` for an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub contact_number: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub year_level: Option<Option<YearLevel>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub course_id: Option<Option<i64>>,
    #[serde(
        default,
        deserialize_with = "super::nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub department_id: Option<Option<i64>>,
}

impl PersonPatch {
    pub fn is_empty(&self) -> bool {
        *self == PersonPatch::default()
    }
}
