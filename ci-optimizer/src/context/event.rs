use serde::Deserialize;

/// The subset of the triggering webhook payload the optimizer cares about.
///
/// The runner writes the full payload to the file named by `GITHUB_EVENT_PATH`;
/// every field we do not model is ignored.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct EventPayload {
    /// Present on `pull_request`, `pull_request_target` and review events
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PullRequest {
    pub number: u64,
}

impl EventPayload {
    pub fn pull_request_number(&self) -> Option<u64> {
        self.pull_request.as_ref().map(|pr| pr.number)
    }
}
