//! Coach and student routes. Both resources share one set of handlers,
//! parameterised by [`PersonKind`].

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{MethodRouter, get},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::IdQuery;
use crate::error::AppError;
use crate::models::{Envelope, NewPersonPayload, PersonKind, PersonPatch};
use crate::session::AccessToken;
use crate::state::AppState;
use crate::validation::{Validate, validate_new_person};

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default)]
    q: Option<String>,
}

type Reply = Result<Json<Envelope<Value>>, AppError>;

pub(crate) fn routes(kind: PersonKind) -> MethodRouter<AppState> {
    get(
        move |State(state): State<AppState>,
              token: AccessToken,
              query: Result<Query<ListQuery>, QueryRejection>| async move {
            list(kind, state, token, query).await
        },
    )
    .post(
        move |State(state): State<AppState>,
              token: AccessToken,
              payload: Result<Json<NewPersonPayload>, JsonRejection>| async move {
            create(kind, state, token, payload).await
        },
    )
    .patch(
        move |State(state): State<AppState>,
              token: AccessToken,
              query: Result<Query<IdQuery>, QueryRejection>,
              payload: Result<Json<PersonPatch>, JsonRejection>| async move {
            update(kind, state, token, query, payload).await
        },
    )
}

async fn list(
    kind: PersonKind,
    state: AppState,
    token: AccessToken,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Reply {
    let Query(ListQuery { q }) = query?;
    info!("listing {} (query: {:?})", kind.plural(), q);

    let people = state
        .backend
        .list_people(&token, kind, q.as_deref())
        .await?;
    Ok(Json(Envelope::data(people)))
}

async fn create(
    kind: PersonKind,
    state: AppState,
    token: AccessToken,
    payload: Result<Json<NewPersonPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Value>>), AppError> {
    let Json(mut payload) = payload?;
    validate_new_person(&payload, kind).map_err(AppError::Validation)?;
    payload.role.get_or_insert(kind.role());
    info!("creating {} {}", kind.label().to_lowercase(), payload.unique_id);

    let created = state.backend.create_person(&token, kind, &payload).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(created))))
}

async fn update(
    kind: PersonKind,
    state: AppState,
    token: AccessToken,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<PersonPatch>, JsonRejection>,
) -> Reply {
    let Query(IdQuery { id }) = query?;
    let Json(patch) = payload?;
    patch.validate().map_err(AppError::Validation)?;
    info!("updating {} {}", kind.label().to_lowercase(), id);

    let body = serde_json::to_value(&patch).map_err(|_| AppError::InternalServerError)?;
    let updated = state.backend.update_user(&token, id, &body).await?;
    Ok(Json(Envelope::data(updated)))
}
