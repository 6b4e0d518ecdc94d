//! Runtime settings
//!
//! Loaded from environment variables with defaults:
//!
//! - `DRONE_DEBUG`: enable debug logging - default: `false`
//! - `DRONE_GITHUB_TOKEN`: token for the change set lookups - optional
//! - `DRONE_GITHUB_ENDPOINT`: GitHub API root - default: `https://api.github.com/`
//! - `DRONE_GITHUB_TIMEOUT`: request timeout in seconds - default: `30`

use crate::changes::github::DEFAULT_ENDPOINT;
use crate::changes::{ChangeSetError, GithubClient};
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to create GitHub client: {0}")]
    Client(#[from] ChangeSetError),
}

/// Settings shared by every command
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub debug: bool,
    pub github_endpoint: String,
    pub github_token: Option<String>,
    pub github_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            github_endpoint: DEFAULT_ENDPOINT.to_string(),
            github_token: None,
            github_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let debug = match value("DRONE_DEBUG") {
            Some(raw) => parse_bool("DRONE_DEBUG", &raw)?,
            None => defaults.debug,
        };

        let github_timeout = match value("DRONE_GITHUB_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|err| ConfigError::InvalidValue {
                    key: "DRONE_GITHUB_TIMEOUT",
                    value: raw.clone(),
                    reason: err.to_string(),
                })?,
            None => defaults.github_timeout,
        };

        Ok(Self {
            debug,
            github_endpoint: value("DRONE_GITHUB_ENDPOINT").unwrap_or(defaults.github_endpoint),
            github_token: value("DRONE_GITHUB_TOKEN"),
            github_timeout,
        })
    }

    /// Build the change set client these settings describe
    pub fn github_client(&self) -> Result<GithubClient, ConfigError> {
        Ok(GithubClient::new(
            &self.github_endpoint,
            self.github_token.clone(),
            self.github_timeout,
        )?)
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
