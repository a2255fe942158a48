//! Session credential handling: the `accessToken` cookie and the page gate
//! that runs ahead of every route.

pub mod cookie;
pub mod gate;

pub use cookie::{AccessToken, CookieSettings, SESSION_COOKIE, expired_session_cookie, session_cookie};
pub use gate::{GateDecision, RouteClass, classify, decide, session_gate};
