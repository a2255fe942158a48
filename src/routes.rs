use axum::{Json, Router, http::StatusCode, middleware, routing::get};
use tower::ServiceBuilder;

use crate::api;
use crate::models::Envelope;
use crate::session::session_gate;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api::router())
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(middleware::from_fn(session_gate)))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::NOT_FOUND, Json(Envelope::failure("Not Found")))
}
