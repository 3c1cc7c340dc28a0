//! Configuration loaded from the environment.

use std::env;
use std::time::Duration;

use crate::client::{TextbeltClient, TextbeltClientBuilder, TextbeltError};
use crate::domain::{ApiKey, ValidationError};

/// Variable holding the API key (required).
pub const API_KEY_VAR: &str = "TEXTBELT_API_KEY";
/// Variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "TEXTBELT_BASE_URL";
/// Variable setting the request timeout, in whole seconds.
pub const TIMEOUT_SECS_VAR: &str = "TEXTBELT_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {name} is not set")]
    Missing { name: String },

    #[error("environment variable {name} is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

/// Read a required environment variable.
pub fn env_var(name: &str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(value),
        Err(env::VarError::NotPresent) => Err(ConfigError::Missing {
            name: name.to_owned(),
        }),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::Invalid {
            name: name.to_owned(),
            reason: "not valid unicode".to_owned(),
        }),
    }
}

/// Settings for building a [`TextbeltClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: None,
            timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `TEXTBELT_API_KEY` (required)
    /// - `TEXTBELT_BASE_URL` for the API base URL
    /// - `TEXTBELT_TIMEOUT_SECS` for the request timeout
    ///
    /// With the `env` feature, a `.env` file in the working directory (or a parent) is
    /// loaded first; variables already set take precedence.
    pub fn from_env() -> Result<Self, ConfigError> {
        #[cfg(feature = "env")]
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| match env_var(name) {
            Ok(value) => Ok(Some(value)),
            Err(ConfigError::Missing { .. }) => Ok(None),
            Err(err) => Err(err),
        })
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Result<Option<String>, ConfigError>,
    {
        let raw_key = lookup(API_KEY_VAR)?.ok_or_else(|| ConfigError::Missing {
            name: API_KEY_VAR.to_owned(),
        })?;
        let api_key = ApiKey::new(raw_key).map_err(|err| invalid(API_KEY_VAR, &err))?;

        let base_url = lookup(BASE_URL_VAR)?
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let timeout = match lookup(TIMEOUT_SECS_VAR)? {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                    name: TIMEOUT_SECS_VAR.to_owned(),
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            base_url,
            timeout,
        })
    }

    /// A client builder carrying these settings.
    pub fn builder(&self) -> TextbeltClientBuilder {
        let mut builder = TextbeltClient::builder(self.api_key.clone());
        if let Some(base_url) = self.base_url.as_ref() {
            builder = builder.base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }

    pub fn build_client(&self) -> Result<TextbeltClient, TextbeltError> {
        self.builder().build()
    }
}

fn invalid(name: &str, err: &ValidationError) -> ConfigError {
    ConfigError::Invalid {
        name: name.to_owned(),
        reason: err.to_string(),
    }
}
