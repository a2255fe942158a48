use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;
use tracing::{info, warn};

use crate::backend::dto;
use crate::error::AppError;
use crate::models::{Envelope, SignInRequest};
use crate::session::{expired_session_cookie, session_cookie};
use crate::state::AppState;
use crate::validation::Validate;

pub const WRONG_CREDENTIALS_MESSAGE: &str = "Wrong username or password";
pub const SIGNED_OUT_MESSAGE: &str = "Signed out successfully";

pub(crate) async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<Envelope<Value>>), AppError> {
    let Json(request) = payload?;
    request.validate().map_err(AppError::Validation)?;
    info!("sign-in attempt by {} as {:?}", request.username, request.role);

    let result = state
        .backend
        .sign_in(&request)
        .await
        .map_err(|err| match err {
            AppError::Upstream { status, message } if message == "Unauthorized" => {
                AppError::Upstream {
                    status,
                    message: WRONG_CREDENTIALS_MESSAGE.to_string(),
                }
            }
            other => other,
        })?;

    let Some(token) = dto::access_token(&result) else {
        warn!("sign-in reply for {} carried no access token", request.username);
        return Err(AppError::Upstream {
            status: StatusCode::BAD_GATEWAY,
            message: "Sign-in response did not include an access token".to_string(),
        });
    };
    let jar = jar.add(session_cookie(token, state.cookies));

    Ok((jar, Json(Envelope::data(result))))
}

/// Clears the session cookie. Local only: the backend is not contacted.
pub(crate) async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<Envelope<()>>) {
    info!("signing out");
    let jar = jar.add(expired_session_cookie(state.cookies));
    (jar, Json(Envelope::message(SIGNED_OUT_MESSAGE)))
}
