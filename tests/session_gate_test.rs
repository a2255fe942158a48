use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use ccms::{
    backend::BackendClient,
    error::AppError,
    models::{AssignmentRequest, NewPersonPayload, PersonKind, SignInRequest},
    routes::router,
    session::{AccessToken, CookieSettings, GateDecision, RouteClass, classify, decide},
    state::AppState,
};
use rstest::rstest;
use serde_json::Value;
use tower::ServiceExt;

/// The gate never calls the backend; any call is a test failure.
struct UnreachableBackend;

#[async_trait]
impl BackendClient for UnreachableBackend {
    async fn sign_in(&self, _: &SignInRequest) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn fetch_profile(&self, _: &AccessToken) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn update_user(&self, _: &AccessToken, _: i64, _: &Value) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn fetch_courses(&self, _: &AccessToken) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn list_people(
        &self,
        _: &AccessToken,
        _: PersonKind,
        _: Option<&str>,
    ) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn create_person(
        &self,
        _: &AccessToken,
        _: PersonKind,
        _: &NewPersonPayload,
    ) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
    async fn assign_students(
        &self,
        _: &AccessToken,
        _: &AssignmentRequest,
    ) -> Result<Value, AppError> {
        panic!("gate must not call the backend")
    }
}

#[rstest]
#[case("/", RouteClass::Root)]
#[case("/signin", RouteClass::AuthOnly)]
#[case("/signup/step-2", RouteClass::AuthOnly)]
#[case("/ccms", RouteClass::Protected)]
#[case("/ccms/coaches", RouteClass::Protected)]
#[case("/ccmsx", RouteClass::Other)]
#[case("/signinfo", RouteClass::Other)]
#[case("/api/coaches", RouteClass::Other)]
fn test_classify(#[case] path: &str, #[case] expected: RouteClass) {
    assert_eq!(classify(path), expected);
}

#[rstest]
#[case(RouteClass::Root, false, GateDecision::Redirect("/signin"))]
#[case(RouteClass::Root, true, GateDecision::Redirect("/ccms/profile"))]
#[case(RouteClass::AuthOnly, false, GateDecision::Pass)]
#[case(RouteClass::AuthOnly, true, GateDecision::Redirect("/ccms/profile"))]
#[case(RouteClass::Protected, false, GateDecision::Redirect("/signin"))]
#[case(RouteClass::Protected, true, GateDecision::Pass)]
#[case(RouteClass::Other, false, GateDecision::Pass)]
#[case(RouteClass::Other, true, GateDecision::Pass)]
fn test_decision_table(
    #[case] class: RouteClass,
    #[case] has_credential: bool,
    #[case] expected: GateDecision,
) {
    assert_eq!(decide(class, has_credential), expected);
}

#[rstest]
#[case("/", None, Some("/signin"))]
#[case("/", Some("tok"), Some("/ccms/profile"))]
#[case("/ccms/students", None, Some("/signin"))]
#[case("/ccms/students", Some(""), Some("/signin"))]
#[case("/signin", Some("tok"), Some("/ccms/profile"))]
#[case("/signin", None, None)]
#[case("/ccms/students", Some("tok"), None)]
#[tokio::test]
async fn test_gate_redirects(
    #[case] path: &str,
    #[case] cookie: Option<&str>,
    #[case] location: Option<&str>,
) {
    let app = router(AppState {
        backend: Arc::new(UnreachableBackend),
        cookies: CookieSettings::default(),
    });

    let mut builder = Request::builder().uri(path);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("accessToken={}", token));
    }
    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

    match location {
        Some(target) => {
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(response.headers()[header::LOCATION], target);
        }
        None => assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT),
    }
}
