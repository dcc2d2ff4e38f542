use crate::context::InvocationContext;
use crate::state::AppState;
use log::debug;
use reqwest::header::InvalidHeaderValue;
use reqwest::Response;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Reexport modules
pub mod decision;

/// Discriminator the optimizer uses to interpret the context object
pub const CONTEXT_KIND: &str = "GITHUB_ACTIONS";

/// Send the decision request to the optimizer and hand back the raw response.
///
/// Status handling is left to the caller; only transport failures are errors here.
async fn send_request_to_optimizer(
    state: &AppState,
    body: &OptimizerRequest,
) -> Result<Response, RequestError> {
    let optimizer_url = state.settings.optimizer_url();
    debug!("Requesting CI optimizer decision from: {}", optimizer_url);

    let response = state
        .optimizer_client
        .post(&optimizer_url)
        .json(body)
        .send()
        .await?;
    debug!("CI optimizer responded with status: {}", response.status());
    Ok(response)
}

/// Identifies this tool to the optimizer for analytics and compatibility checks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Caller {
    pub name: String,
    pub version: String,
}

impl Caller {
    pub fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RunInfo {
    pub workflow: String,
    pub job: String,
    pub run: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequestContext {
    /// Always `GITHUB_ACTIONS`
    pub kind: String,
    pub repository: Repository,
    /// Omitted for events that are not tied to a pull request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr: Option<u64>,
    pub sha: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_ref: Option<String>,
    pub run: RunInfo,
}

/// Body of `POST /api/v1/ci/optimizer`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OptimizerRequest {
    pub token: String,
    pub caller: Caller,
    pub context: RequestContext,
}

impl OptimizerRequest {
    /// Builds the request body; an explicit `pr_override` wins over the event's PR number
    pub fn new(token: &str, pr_override: Option<u64>, context: &InvocationContext) -> Self {
        Self {
            token: token.to_string(),
            caller: Caller::current(),
            context: RequestContext {
                kind: CONTEXT_KIND.to_string(),
                repository: Repository {
                    owner: context.repository.owner.clone(),
                    name: context.repository.name.clone(),
                },
                pr: pr_override.or(context.event_pr_number),
                sha: context.sha.clone(),
                git_ref: context.git_ref.clone(),
                head_ref: context.head_ref.clone(),
                run: RunInfo {
                    workflow: context.workflow.clone(),
                    job: context.job.clone(),
                    run: context.run_id,
                },
            },
        }
    }
}

/// Body of a successful (200) optimizer response
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DecisionResult {
    pub skip: bool,
    pub reason: String,
}

/// Errors that can occur when talking to the optimizer.
///
/// Only transport-level failures end up here; every HTTP-level anomaly is
/// absorbed by the decision policy.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to build request to CI optimizer: {0}")]
    BuildError(#[from] InvalidHeaderValue),
    #[error("Failed to send request to CI optimizer: {0}")]
    Transport(#[from] reqwest::Error),
}
