use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use chrono::{DateTime, Utc};
use reqwest::{
    Client, RequestBuilder, StatusCode,
    header::{COOKIE, SET_COOKIE},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::{
    AssignmentRequest, Course, Envelope, NewPersonPayload, Person, PersonKind, PersonPatch,
    Profile, ProfileUpdate, SignInRequest,
};
use crate::session::{AccessToken, SESSION_COOKIE};

#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The proxy answered `success: false`.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Network error occurred.")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ConsoleError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ConsoleError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fields the backend assigns to a newly created person.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The proxy routes as seen from the console.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    async fn profile(&self) -> Result<Profile, ConsoleError>;
    async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Value, ConsoleError>;
    async fn courses(&self) -> Result<Vec<Course>, ConsoleError>;
    async fn list_people(
        &self,
        kind: PersonKind,
        query: Option<&str>,
    ) -> Result<Vec<Person>, ConsoleError>;
    async fn create_person(
        &self,
        kind: PersonKind,
        payload: &NewPersonPayload,
    ) -> Result<CreatedRecord, ConsoleError>;
    async fn update_person(
        &self,
        kind: PersonKind,
        id: i64,
        patch: &PersonPatch,
    ) -> Result<Value, ConsoleError>;
    async fn assign_students(&self, request: &AssignmentRequest) -> Result<Value, ConsoleError>;
}

/// [`ConsoleApi`] over HTTP, carrying the session cookie to the proxy.
pub struct HttpConsoleApi {
    client: Client,
    base: Url,
    token: AccessToken,
}

impl HttpConsoleApi {
    pub fn new(base: Url, token: AccessToken) -> Self {
        Self {
            client: Client::new(),
            base,
            token,
        }
    }

    /// Signs in through the proxy and keeps the issued session cookie.
    pub async fn sign_in(base: Url, request: &SignInRequest) -> Result<Self, ConsoleError> {
        let client = Client::new();
        let response = client
            .post(join(&base, "api/auth/signin")?)
            .json(request)
            .send()
            .await?;

        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|raw| Cookie::parse(raw.to_string()).ok())
            .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
            .map(|cookie| AccessToken::new(cookie.value()));

        let status = response.status();
        let envelope = response
            .json::<Envelope<Value>>()
            .await
            .map_err(|e| ConsoleError::Decode(e.to_string()))?;
        if !envelope.success {
            return Err(rejected(status, envelope));
        }

        let token = token.ok_or_else(|| {
            ConsoleError::Decode("sign-in succeeded without a session cookie".to_string())
        })?;
        Ok(Self {
            client,
            base,
            token,
        })
    }

    pub async fn sign_out(self) -> Result<(), ConsoleError> {
        let builder = self.client.post(join(&self.base, "api/auth/signout")?);
        let response = builder.send().await?;
        debug!("signed out with status {}", response.status());
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ConsoleError> {
        join(&self.base, path)
    }

    fn people_endpoint(&self, kind: PersonKind) -> Result<Url, ConsoleError> {
        self.endpoint(&format!("api/{}", kind.plural()))
    }

    async fn call<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ConsoleError> {
        let response = builder
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, self.token.as_str()))
            .send()
            .await?;

        let status = response.status();
        let envelope = response
            .json::<Envelope<Value>>()
            .await
            .map_err(|e| ConsoleError::Decode(e.to_string()))?;

        if !envelope.success {
            let error = rejected(status, envelope);
            warn!("proxy rejected request: {}", error);
            return Err(error);
        }

        let data = envelope.data.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ConsoleError::Decode(e.to_string()))
    }
}

fn join(base: &Url, path: &str) -> Result<Url, ConsoleError> {
    base.join(path)
        .map_err(|e| ConsoleError::Decode(format!("invalid proxy url: {}", e)))
}

fn with_id(mut url: Url, id: i64) -> Url {
    url.query_pairs_mut().append_pair("id", &id.to_string());
    url
}

fn rejected(status: StatusCode, envelope: Envelope<Value>) -> ConsoleError {
    ConsoleError::Rejected {
        status,
        message: envelope
            .message
            .unwrap_or_else(|| "Unknown error".to_string()),
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn profile(&self) -> Result<Profile, ConsoleError> {
        let url = self.endpoint("api/users/profile")?;
        self.call(self.client.get(url)).await
    }

    async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> Result<Value, ConsoleError> {
        let url = with_id(self.endpoint("api/users/profile")?, id);
        self.call(self.client.patch(url).json(update)).await
    }

    async fn courses(&self) -> Result<Vec<Course>, ConsoleError> {
        let url = self.endpoint("api/courses")?;
        self.call(self.client.get(url)).await
    }

    async fn list_people(
        &self,
        kind: PersonKind,
        query: Option<&str>,
    ) -> Result<Vec<Person>, ConsoleError> {
        let mut url = self.people_endpoint(kind)?;
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            url.query_pairs_mut().append_pair("q", q);
        }
        self.call(self.client.get(url)).await
    }

    async fn create_person(
        &self,
        kind: PersonKind,
        payload: &NewPersonPayload,
    ) -> Result<CreatedRecord, ConsoleError> {
        let url = self.people_endpoint(kind)?;
        self.call(self.client.post(url).json(payload)).await
    }

    async fn update_person(
        &self,
        kind: PersonKind,
        id: i64,
        patch: &PersonPatch,
    ) -> Result<Value, ConsoleError> {
        let url = with_id(self.people_endpoint(kind)?, id);
        self.call(self.client.patch(url).json(patch)).await
    }

    async fn assign_students(&self, request: &AssignmentRequest) -> Result<Value, ConsoleError> {
        let url = self.endpoint("api/assignments")?;
        self.call(self.client.post(url).json(request)).await
    }
}
