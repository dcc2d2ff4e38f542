use crate::context::InvocationContext;
use crate::optimizer_client::{
    send_request_to_optimizer, DecisionResult, OptimizerRequest, RequestError,
};
use crate::state::AppState;
use log::{debug, info, warn};
use reqwest::StatusCode;

/// Outcome of one exchange with the optimizer.
///
/// Anything other than a clean answer from the service fails open.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// 200 with a well-formed body
    Service(DecisionResult),
    /// 401
    Unauthenticated,
    /// 402
    PlanRequired,
    /// The run was started by `workflow_dispatch`
    ManualDispatch,
    UnexpectedStatus(StatusCode),
    /// 200 whose body could not be read or parsed
    MalformedBody,
}

impl Decision {
    /// Value of the `skip` step output
    pub fn skip(&self) -> bool {
        match self {
            Decision::Service(result) => result.skip,
            _ => false,
        }
    }
}

/// Ask the optimizer whether the checks of this run can be skipped.
///
/// Only a transport failure (DNS, connection, timeout) is returned as an error.
pub async fn request_decision(
    state: &AppState,
    context: &InvocationContext,
) -> Result<Decision, RequestError> {
    let request = OptimizerRequest::new(&state.settings.token, state.settings.pr_number, context);
    let response = send_request_to_optimizer(state, &request).await?;
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        warn!("Invalid authentication. Skipping Graphite checks.");
        return Ok(Decision::Unauthenticated);
    }

    if status == StatusCode::PAYMENT_REQUIRED {
        warn!(
            "Your Graphite plan does not support the CI Optimizer. Please upgrade your plan to use this feature."
        );
        return Ok(Decision::PlanRequired);
    }

    // Manual runs still make the request; only 401/402 take precedence over this
    if context.is_manual_dispatch() {
        info!("Workflow dispatch event detected. Skipping Graphite checks.");
        return Ok(Decision::ManualDispatch);
    }

    if status != StatusCode::OK {
        log_unexpected_status(&request, status);
        return Ok(Decision::UnexpectedStatus(status));
    }

    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            debug!("Failed to read CI optimizer response: {}", e);
            warn!("Failed to parse response body. Skipping Graphite checks.");
            return Ok(Decision::MalformedBody);
        }
    };

    match serde_json::from_slice::<DecisionResult>(&body) {
        Ok(result) => {
            info!("{}", result.reason);
            Ok(Decision::Service(result))
        }
        Err(e) => {
            debug!("Failed to parse CI optimizer response: {}", e);
            warn!("Failed to parse response body. Skipping Graphite checks.");
            Ok(Decision::MalformedBody)
        }
    }
}

/// Dump enough of the exchange for an operator to reproduce it
fn log_unexpected_status(request: &OptimizerRequest, status: StatusCode) {
    match serde_json::to_string(request) {
        Ok(body) => warn!("Request body: {}", body),
        Err(e) => warn!("Request body could not be serialized: {}", e),
    }
    warn!("Response status: {}", status.as_u16());
    let pr = request
        .context
        .pr
        .map_or_else(|| "undefined".to_string(), |pr| pr.to_string());
    warn!(
        "{}/{}/{}",
        request.context.repository.owner, request.context.repository.name, pr
    );
    warn!("Response returned a non-200 status. Skipping Graphite checks.");
}
