use axum::{Json, extract::State};
use serde_json::Value;

use crate::error::AppError;
use crate::models::Envelope;
use crate::session::AccessToken;
use crate::state::AppState;

pub(crate) async fn list_courses(
    State(state): State<AppState>,
    token: AccessToken,
) -> Result<Json<Envelope<Value>>, AppError> {
    let courses = state.backend.fetch_courses(&token).await?;
    Ok(Json(Envelope::data(courses)))
}
