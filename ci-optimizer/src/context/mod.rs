use crate::context::event::EventPayload;
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

pub mod event;

/// Errors raised while discovering the invocation context
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("GITHUB_REPOSITORY is not set; expected a value like 'owner/repo'")]
    MissingRepository,
    #[error("Invalid GITHUB_REPOSITORY '{0}': expected a value like 'owner/repo'")]
    InvalidRepository(String),
    #[error("Failed to read event payload at {path}: {source}")]
    EventRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse event payload at {path}: {source}")]
    EventParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Identity of the repository the workflow runs in
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryId {
    pub owner: String,
    pub name: String,
}

impl RepositoryId {
    /// Parses the `owner/repo` form used by `GITHUB_REPOSITORY`
    pub fn parse(value: &str) -> Result<Self, ContextError> {
        match value.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(ContextError::InvalidRepository(value.to_string())),
        }
    }
}

/// Everything the host platform tells us about the current run.
///
/// Built once at startup and passed down by reference; the optimizer client
/// never reads the process environment itself.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationContext {
    pub repository: RepositoryId,
    /// PR number from the triggering event, if it has one
    pub event_pr_number: Option<u64>,
    pub sha: String,
    pub git_ref: String,
    pub head_ref: Option<String>,
    pub workflow: String,
    pub job: String,
    pub run_id: u64,
    pub event_name: String,
}

impl InvocationContext {
    /// Reads the context through `lookup`, which maps variable names to values
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ContextError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let repository = lookup("GITHUB_REPOSITORY").ok_or(ContextError::MissingRepository)?;
        let repository = RepositoryId::parse(&repository)?;

        let payload = match lookup("GITHUB_EVENT_PATH").filter(|p| !p.is_empty()) {
            Some(path) => read_event_payload(PathBuf::from(path))?,
            None => EventPayload::default(),
        };

        let run_id = lookup("GITHUB_RUN_ID")
            .and_then(|id| id.trim().parse::<u64>().ok())
            .unwrap_or_default();

        Ok(Self {
            repository,
            event_pr_number: payload.pull_request_number(),
            sha: lookup("GITHUB_SHA").unwrap_or_default(),
            git_ref: lookup("GITHUB_REF").unwrap_or_default(),
            head_ref: lookup("GITHUB_HEAD_REF"),
            workflow: lookup("GITHUB_WORKFLOW").unwrap_or_default(),
            job: lookup("GITHUB_JOB").unwrap_or_default(),
            run_id,
            event_name: lookup("GITHUB_EVENT_NAME").unwrap_or_default(),
        })
    }

    /// Manually dispatched runs are never skipped
    pub fn is_manual_dispatch(&self) -> bool {
        self.event_name == "workflow_dispatch"
    }
}

fn read_event_payload(path: PathBuf) -> Result<EventPayload, ContextError> {
    if !path.exists() {
        debug!("GITHUB_EVENT_PATH {} does not exist", path.display());
        return Ok(EventPayload::default());
    }

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(source) => return Err(ContextError::EventRead { path, source }),
    };
    match serde_json::from_str(&contents) {
        Ok(payload) => Ok(payload),
        Err(source) => Err(ContextError::EventParse { path, source }),
    }
}
