//! Client configuration sourced from the environment.
//!
//! - `CLOUDHEALTH_API_KEY` (required)
//! - `CLOUDHEALTH_API_URL` (optional, defaults to [`DEFAULT_ENDPOINT`])

use std::fmt;

use crate::error::ApiError;

/// Public CloudHealth API root.
pub const DEFAULT_ENDPOINT: &str = "https://chapi.cloudhealthtech.com/v1/";

pub const API_KEY_VAR: &str = "CLOUDHEALTH_API_KEY";
pub const API_URL_VAR: &str = "CLOUDHEALTH_API_URL";

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = non_empty(API_KEY_VAR)
            .ok_or_else(|| ApiError::Config(format!("{API_KEY_VAR} is not set")))?;
        let base_url = non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self { api_key, base_url })
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}
