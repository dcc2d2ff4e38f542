use crate::config::Settings;
use crate::context::{InvocationContext, RepositoryId};
use crate::outputs::{OutputError, OutputSink};
use crate::state::AppState;
use log::Level;
use serde::Serialize;
use std::cell::RefCell;
use std::time::Duration;
use wiremock::matchers;
use wiremock::Match;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

const OPTIMIZER_PATH: &str = "/api/v1/ci/optimizer";

/// Test fixture for running the decision requester against a mocked optimizer.
///
/// It starts a `wiremock` server standing in for the optimizer, points the
/// settings at it, and provides a pull request invocation context for
/// `acme/widgets#7`. Log capture is reset for the current test thread.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_skip() {
///     let fixture = TestFixture::new().await;
///     fixture
///         .add_optimizer_mock(json!({ "skip": true, "reason": "docs only" }), 200, 1)
///         .await;
///
///     let decision = request_decision(&fixture.state, &fixture.context).await.unwrap();
///     assert!(decision.skip());
/// }
/// ```
pub struct TestFixture {
    /// State built from `settings`
    pub state: AppState,
    /// Configuration settings
    pub settings: Settings,
    /// Invocation context of a pull request run
    pub context: InvocationContext,
    /// Mock server for the optimizer
    pub optimizer_mock: MockServer,
}

impl TestFixture {
    pub async fn new() -> Self {
        testing_logger::setup();

        let optimizer_mock = MockServer::start().await;
        let settings = Settings::for_test_with_mock(&optimizer_mock);
        let state = AppState::new(settings.clone()).expect("Failed to create test state");

        Self {
            state,
            settings,
            context: Self::pull_request_context(),
            optimizer_mock,
        }
    }

    /// Context of a `pull_request` run for `acme/widgets#7`
    pub fn pull_request_context() -> InvocationContext {
        InvocationContext {
            repository: RepositoryId {
                owner: "acme".to_string(),
                name: "widgets".to_string(),
            },
            event_pr_number: Some(7),
            sha: "ffac537e6cbbf934b08745a378932722df287a53".to_string(),
            git_ref: "refs/pull/7/merge".to_string(),
            head_ref: Some("feature/foo".to_string()),
            workflow: "CI".to_string(),
            job: "optimize".to_string(),
            run_id: 1658821493,
            event_name: "pull_request".to_string(),
        }
    }

    /// Sets the `pr_number` input and rebuilds the state
    pub fn set_pr_override(&mut self, pr_number: Option<u64>) {
        self.settings.pr_number = pr_number;
        self.rebuild_state();
    }

    /// Sets the request timeout and rebuilds the state
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.settings.timeout = timeout;
        self.rebuild_state();
    }

    fn rebuild_state(&mut self) {
        self.state = AppState::new(self.settings.clone()).expect("Failed to create test state");
    }

    /// Mounts an optimizer response with a JSON body.
    ///
    /// # Parameters
    ///
    /// - `response_body`: The JSON response body to return
    /// - `status_code`: HTTP status code for the response
    /// - `expected_calls`: Number of expected calls to this mock
    pub async fn add_optimizer_mock(
        &self,
        response_body: impl Serialize,
        status_code: u16,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(OPTIMIZER_PATH))
            .respond_with(ResponseTemplate::new(status_code).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.optimizer_mock)
            .await;
    }

    /// Mounts an optimizer response with a raw, possibly non-JSON, body
    pub async fn add_optimizer_raw_mock(&self, response_body: &str, status_code: u16) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(OPTIMIZER_PATH))
            .respond_with(
                ResponseTemplate::new(status_code)
                    .set_body_raw(response_body.to_string(), "application/json"),
            )
            .expect(1)
            .mount(&self.optimizer_mock)
            .await;
    }

    /// Mounts a 200 response that only answers requests accepted by `matcher`
    pub async fn add_optimizer_mock_matching(
        &self,
        matcher: impl Match + 'static,
        response_body: impl Serialize,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(OPTIMIZER_PATH))
            .and(matcher)
            .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
            .expect(1)
            .mount(&self.optimizer_mock)
            .await;
    }

    /// Mounts a 200 response that is only sent after `delay`
    pub async fn add_delayed_optimizer_mock(&self, response_body: impl Serialize, delay: Duration) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path(OPTIMIZER_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(response_body)
                    .set_delay(delay),
            )
            .mount(&self.optimizer_mock)
            .await;
    }
}

/// Step outputs recorded in memory
#[derive(Debug, Default)]
pub struct MemoryOutputs {
    pub values: Vec<(String, String)>,
}

impl OutputSink for MemoryOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), OutputError> {
        self.values.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

/// Log records emitted by this crate on the current test thread
pub struct CapturedLogs(Vec<(Level, String)>);

impl CapturedLogs {
    /// Messages logged at exactly `level`, in order
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.0
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, body)| body.clone())
            .collect()
    }
}

/// Drains the logs captured since `testing_logger::setup()` on this thread
pub fn captured_logs() -> CapturedLogs {
    let records = RefCell::new(Vec::new());
    testing_logger::validate(|captured| {
        records.borrow_mut().extend(
            captured
                .iter()
                .filter(|log| log.target.starts_with(env!("CARGO_CRATE_NAME")))
                .map(|log| (log.level, log.body.clone())),
        );
    });
    CapturedLogs(records.into_inner())
}
