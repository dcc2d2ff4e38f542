use serde::Deserialize;

/// Step inputs exactly as the runner exports them (`INPUT_<NAME>`), before validation
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawInputs {
    /// Token identifying the caller to the optimizer
    #[serde(default)]
    pub graphite_token: String,

    /// Base URL of the optimizer service
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<String>,

    /// Optional PR number override
    #[serde(default)]
    pub pr_number: Option<String>,
}

pub fn default_endpoint() -> String {
    "https://api.graphite.dev".to_string()
}

pub fn default_timeout() -> String {
    "30".to_string()
}
