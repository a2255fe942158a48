use std::env;
use std::net::SocketAddr;

use url::Url;

use crate::error::AppError;

/// Placeholder replaced by the record id in [`BackendEndpoints::user_patch`].
pub const ID_PLACEHOLDER: char = '%';

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Backend REST endpoints, one per proxied resource.
#[derive(Clone, Debug)]
pub struct BackendEndpoints {
    pub sign_in: Url,
    pub profile: Url,
    /// Template such as `https://api.example.edu/users/%`.
    pub user_patch: String,
    pub courses: Url,
    pub coaches: Url,
    pub coaches_create: Url,
    pub students: Url,
    pub students_create: Url,
    pub assignments: Url,
}

impl BackendEndpoints {
    pub fn user_url(&self, id: i64) -> Result<Url, AppError> {
        let raw = self.user_patch.replace(ID_PLACEHOLDER, &id.to_string());
        Url::parse(&raw).map_err(|e| AppError::Config(format!("PATCH_USER_API_URL: {}", e)))
    }
}

#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub bind_addr: SocketAddr,
    /// Marks session cookies `Secure`; on when `APP_ENV=production`.
    pub secure_cookies: bool,
    pub endpoints: BackendEndpoints,
}

impl ProxyConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = |key: &str| -> Result<Url, AppError> {
            let raw = lookup(key).ok_or_else(|| AppError::Config(format!("{} is not set", key)))?;
            Url::parse(&raw).map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e)))
        };

        let user_patch = lookup("PATCH_USER_API_URL")
            .ok_or_else(|| AppError::Config("PATCH_USER_API_URL is not set".to_string()))?;
        if !user_patch.contains(ID_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "PATCH_USER_API_URL must contain the '{}' id placeholder",
                ID_PLACEHOLDER
            )));
        }

        let endpoints = BackendEndpoints {
            sign_in: url("SIGN_IN_API_URL")?,
            profile: url("PROFILE_API_URL")?,
            user_patch,
            courses: url("COURSES_API_URL")?,
            coaches: url("COACHES_API_URL")?,
            coaches_create: url("COACHES_CREATE_API_URL")?,
            students: url("STUDENTS_API_URL")?,
            students_create: url("STUDENTS_CREATE_API_URL")?,
            assignments: url("ASSIGN_COACH_API_URL")?,
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let secure_cookies = lookup("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        Ok(Self {
            bind_addr,
            secure_cookies,
            endpoints,
        })
    }
}
