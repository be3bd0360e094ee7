// Configuration module: reads the vendor credential and endpoint settings
// from the process environment, after loading an optional `.env` file.

use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const ORG_VAR: &str = "OPENAI_ORG_ID";
pub const PROJECT_VAR: &str = "OPENAI_PROJECT_ID";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set in the environment variables")]
    MissingCredential(&'static str),
}

/// Settings needed to talk to the files endpoint.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub organization: Option<String>,
    pub project: Option<String>,
}

// Keep the credential out of logs and panic messages.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("project", &self.project)
            .finish()
    }
}

impl Config {
    /// Load `.env` (if any) and build a `Config` from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "ignoring unreadable .env file"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a `Config` from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;
        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Ok(Config {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            organization: get(ORG_VAR),
            project: get(PROJECT_VAR),
        })
    }
}
