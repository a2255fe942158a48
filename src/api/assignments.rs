use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::info;

use crate::error::AppError;
use crate::models::{AssignmentRequest, Envelope};
use crate::session::AccessToken;
use crate::state::AppState;
use crate::validation::Validate;

pub(crate) async fn assign_students(
    State(state): State<AppState>,
    token: AccessToken,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> Result<Json<Envelope<Value>>, AppError> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::Validation)?;
    info!(
        "{} {} student(s) to coach {}",
        request.mode.title(),
        request.student_ids.len(),
        request.coach_id
    );

    let result = state.backend.assign_students(&token, &request).await?;
    Ok(Json(Envelope::data(result)))
}
