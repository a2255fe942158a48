use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use super::AccessToken;

pub const SIGN_IN_PATH: &str = "/signin";
pub const LANDING_PATH: &str = "/ccms/profile";

const PROTECTED_PREFIXES: [&str; 1] = ["/ccms"];
const AUTH_PREFIXES: [&str; 2] = ["/signin", "/signup"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Root,
    AuthOnly,
    Protected,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(&'static str),
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn classify(path: &str) -> RouteClass {
    if path == "/" {
        RouteClass::Root
    } else if AUTH_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        RouteClass::AuthOnly
    } else if PROTECTED_PREFIXES.iter().any(|prefix| under(path, prefix)) {
        RouteClass::Protected
    } else {
        RouteClass::Other
    }
}

pub fn decide(class: RouteClass, has_credential: bool) -> GateDecision {
    match (class, has_credential) {
        (RouteClass::Root, false) | (RouteClass::Protected, false) => {
            GateDecision::Redirect(SIGN_IN_PATH)
        }
        (RouteClass::Root, true) | (RouteClass::AuthOnly, true) => {
            GateDecision::Redirect(LANDING_PATH)
        }
        _ => GateDecision::Pass,
    }
}

/// Redirects page requests according to session presence. Only the cookie is
/// inspected; no backend call is made.
pub async fn session_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let has_credential = AccessToken::from_headers(request.headers()).is_some();
    let class = classify(path);

    match decide(class, has_credential) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(target) => {
            debug!(
                "redirecting {} ({:?}, credential: {}) to {}",
                path, class, has_credential, target
            );
            Redirect::temporary(target).into_response()
        }
    }
}
