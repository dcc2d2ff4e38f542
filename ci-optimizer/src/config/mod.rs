use config::{Config as ConfigCrate, ConfigError as ConfigCrateError};
use log::warn;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub mod inputs;

use crate::config::inputs::RawInputs;

/// Errors raised while turning step inputs into [`Settings`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read step inputs: {0}")]
    Source(#[from] ConfigCrateError),
    #[error("Invalid endpoint '{value}': {source}")]
    InvalidEndpoint {
        value: String,
        source: url::ParseError,
    },
    #[error("Invalid timeout '{0}': expected a whole number of seconds")]
    InvalidTimeout(String),
}

/// Validated configuration of a single step invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Opaque token forwarded verbatim to the optimizer
    pub token: String,

    /// Base URL of the optimizer service (default: https://api.graphite.dev)
    pub endpoint: Url,

    /// Upper bound on the whole optimizer request (default: 30 seconds)
    pub timeout: Duration,

    /// Explicit PR number, takes precedence over the event payload
    pub pr_number: Option<u64>,
}

impl Settings {
    /// Loads the step inputs from the given variables, or from the process
    /// environment when `source` is `None`
    pub fn from_source(source: Option<config::Map<String, String>>) -> Result<Self, ConfigError> {
        let raw: RawInputs = ConfigCrate::builder()
            .add_source(
                config::Environment::with_prefix("INPUT")
                    .prefix_separator("_")
                    .source(source),
            )
            .build()?
            .try_deserialize()?;
        Self::try_from(raw)
    }

    /// The full URL of the optimizer decision route
    pub fn optimizer_url(&self) -> String {
        format!(
            "{}/api/v1/ci/optimizer",
            self.endpoint.as_str().trim_end_matches('/')
        )
    }

    #[cfg(test)]
    pub fn for_test_with_mock(optimizer_mock: &wiremock::MockServer) -> Self {
        Self {
            token: "test_token".to_string(),
            endpoint: Url::parse(&optimizer_mock.uri()).expect("Mock server URI is a valid URL"),
            timeout: Duration::from_secs(5),
            pr_number: None,
        }
    }
}

impl TryFrom<RawInputs> for Settings {
    type Error = ConfigError;

    fn try_from(raw: RawInputs) -> Result<Self, Self::Error> {
        let endpoint = non_empty(raw.endpoint).unwrap_or_else(inputs::default_endpoint);
        let endpoint = Url::parse(endpoint.trim()).map_err(|source| {
            ConfigError::InvalidEndpoint {
                value: endpoint.clone(),
                source,
            }
        })?;

        let timeout = non_empty(raw.timeout).unwrap_or_else(inputs::default_timeout);
        let timeout = timeout
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidTimeout(timeout.clone()))?;

        let pr_number = non_empty(raw.pr_number).and_then(|value| {
            let parsed = parse_leading_number(&value);
            if parsed.is_none() {
                warn!(
                    "Ignoring pr_number '{}': not a number. Using the pull request from the event instead.",
                    value
                );
            }
            parsed
        });

        Ok(Self {
            token: raw.graphite_token,
            endpoint,
            timeout,
            pr_number,
        })
    }
}

/// Reads the digits at the start of `value` ("12abc" is 12), ignoring surrounding
/// whitespace; `None` when there are none
fn parse_leading_number(value: &str) -> Option<u64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse::<u64>().ok()
}

/// The runner exports declared-but-unset inputs as empty strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
