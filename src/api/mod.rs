mod assignments;
mod auth;
mod courses;
mod people;
mod profile;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::models::PersonKind;
use crate::state::AppState;

pub use auth::WRONG_CREDENTIALS_MESSAGE;

#[derive(Debug, Deserialize)]
pub(crate) struct IdQuery {
    pub id: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route(
            "/users/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route("/courses", get(courses::list_courses))
        .route("/coaches", people::routes(PersonKind::Coach))
        .route("/students", people::routes(PersonKind::Student))
        .route("/assignments", post(assignments::assign_students))
}
