use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde_json::Value;
use tracing::info;

use super::IdQuery;
use crate::error::AppError;
use crate::models::{Envelope, ProfileUpdate};
use crate::session::AccessToken;
use crate::state::AppState;
use crate::validation::Validate;

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    token: AccessToken,
) -> Result<Json<Envelope<Value>>, AppError> {
    let profile = state.backend.fetch_profile(&token).await?;
    Ok(Json(Envelope::data(profile)))
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    token: AccessToken,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Value>>, AppError> {
    let Query(IdQuery { id }) = query?;
    let Json(update) = payload?;
    update.validate().map_err(AppError::Validation)?;
    info!("updating profile {}", id);

    let body = serde_json::to_value(&update).map_err(|_| AppError::InternalServerError)?;
    let result = state.backend.update_user(&token, id, &body).await?;
    Ok(Json(Envelope::data(result)))
}
