use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentMode {
    Assign,
    Transfer,
}

impl AssignmentMode {
    pub fn title(self) -> &'static str {
        match self {
            AssignmentMode::Assign => "Assign Coach",
            AssignmentMode::Transfer => "Transfer Students",
        }
    }
}

/// Body of `POST /api/assignments`: attach the listed students to one coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRequest {
    pub student_ids: Vec<i64>,
    pub coach_id: i64,
    pub mode: AssignmentMode,
}
