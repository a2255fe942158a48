pub mod dto;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header::CONTENT_TYPE};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::BackendEndpoints;
use crate::error::AppError;
use crate::models::{AssignmentRequest, NewPersonPayload, PersonKind, SignInRequest};
use crate::session::AccessToken;

/// The external REST API the proxy forwards to.
///
/// Every method returns the backend's JSON payload on a 2xx reply and
/// [`AppError::Upstream`] carrying the backend's status otherwise.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn sign_in(&self, request: &SignInRequest) -> Result<Value, AppError>;
    async fn fetch_profile(&self, token: &AccessToken) -> Result<Value, AppError>;
    async fn update_user(&self, token: &AccessToken, id: i64, body: &Value) -> Result<Value, AppError>;
    async fn fetch_courses(&self, token: &AccessToken) -> Result<Value, AppError>;
    async fn list_people(
        &self,
        token: &AccessToken,
        kind: PersonKind,
        query: Option<&str>,
    ) -> Result<Value, AppError>;
    async fn create_person(
        &self,
        token: &AccessToken,
        kind: PersonKind,
        payload: &NewPersonPayload,
    ) -> Result<Value, AppError>;
    async fn assign_students(
        &self,
        token: &AccessToken,
        request: &AssignmentRequest,
    ) -> Result<Value, AppError>;
}

pub struct HttpBackendClient {
    client: Client,
    endpoints: BackendEndpoints,
}

impl HttpBackendClient {
    pub fn new(endpoints: BackendEndpoints) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, endpoints })
    }

    async fn send(&self, request: RequestBuilder, fallback: &str) -> Result<Value, AppError> {
        let response = request
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        info!("backend responded with {}", status);

        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }

        let body = response.json::<Value>().await.ok();
        let message = body
            .as_ref()
            .and_then(dto::error_message)
            .unwrap_or_else(|| fallback.to_string());
        warn!("backend rejected request ({}): {}", status, message);

        Err(AppError::Upstream { status, message })
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn sign_in(&self, request: &SignInRequest) -> Result<Value, AppError> {
        let builder = self
            .client
            .post(self.endpoints.sign_in.clone())
            .json(request);
        self.send(builder, "Failed to sign in").await
    }

    async fn fetch_profile(&self, token: &AccessToken) -> Result<Value, AppError> {
        let builder = self
            .client
            .get(self.endpoints.profile.clone())
            .bearer_auth(token.as_str());
        self.send(builder, "Failed to fetch profile data").await
    }

    async fn update_user(&self, token: &AccessToken, id: i64, body: &Value) -> Result<Value, AppError> {
        let builder = self
            .client
            .patch(self.endpoints.user_url(id)?)
            .bearer_auth(token.as_str())
            .json(body);
        self.send(builder, "Failed to update profile data").await
    }

    async fn fetch_courses(&self, token: &AccessToken) -> Result<Value, AppError> {
        let builder = self
            .client
            .get(self.endpoints.courses.clone())
            .bearer_auth(token.as_str());
        self.send(builder, "Failed to fetch course data").await
    }

    async fn list_people(
        &self,
        token: &AccessToken,
        kind: PersonKind,
        query: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut url = match kind {
            PersonKind::Coach => self.endpoints.coaches.clone(),
            PersonKind::Student => self.endpoints.students.clone(),
        };
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", q);
        }

        let builder = self.client.get(url).bearer_auth(token.as_str());
        let fallback = format!("Failed to fetch {} data", kind.label().to_lowercase());
        self.send(builder, &fallback).await
    }

    async fn create_person(
        &self,
        token: &AccessToken,
        kind: PersonKind,
        payload: &NewPersonPayload,
    ) -> Result<Value, AppError> {
        let url = match kind {
            PersonKind::Coach => self.endpoints.coaches_create.clone(),
            PersonKind::Student => self.endpoints.students_create.clone(),
        };
        let builder = self
            .client
            .post(url)
            .bearer_auth(token.as_str())
            .json(payload);
        self.send(builder, "Failed to create resource").await
    }

    async fn assign_students(
        &self,
        token: &AccessToken,
        request: &AssignmentRequest,
    ) -> Result<Value, AppError> {
        let builder = self
            .client
            .post(self.endpoints.assignments.clone())
            .bearer_auth(token.as_str())
            .json(request);
        self.send(builder, "Failed to assign students").await
    }
}
