pub mod assignment;
pub mod auth;
pub mod course;
pub mod envelope;
pub mod person;
pub mod profile;

pub use assignment::{AssignmentMode, AssignmentRequest};
pub use auth::{Role, SignInRequest};
pub use course::Course;
pub use envelope::Envelope;
pub use person::{NewPersonPayload, Person, PersonKind, PersonPatch, YearLevel};
pub use profile::{Profile, ProfileUpdate};

use serde::{Deserialize, Deserializer};

/// Deserializes a field that may be absent, `null`, or a value, keeping
/// `null` distinct from absent (`Some(None)` vs `None`).
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
