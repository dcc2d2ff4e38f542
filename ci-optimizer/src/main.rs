mod config;
mod context;
mod errors;
mod logging;
mod optimizer_client;
mod outputs;
mod state;
#[cfg(test)]
mod test_utils;

use crate::config::Settings;
use crate::context::InvocationContext;
use crate::errors::ActionError;
use crate::optimizer_client::decision::{request_decision, Decision};
use crate::outputs::OutputSink;
use crate::state::AppState;
use log::{debug, error};

#[tokio::main]
async fn main() {
    // Local runs can provide the runner variables through a .env file
    dotenv::dotenv().ok();

    // Initialize logging
    let runner_debug = std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1");
    logging::init(runner_debug);

    let code = exit_code(start(None, |key| std::env::var(key).ok()).await);
    if code != 0 {
        std::process::exit(code);
    }
}

/// Load configuration and context, then run the step.
///
/// `inputs` replaces the `INPUT_*` variables and `lookup` resolves the runner
/// variables; production passes `None` and the process environment.
async fn start<F>(
    inputs: Option<::config::Map<String, String>>,
    lookup: F,
) -> Result<(), ActionError>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = Settings::from_source(inputs)?;
    logging::mask_secret(&settings.token);

    let context = InvocationContext::from_lookup(&lookup)?;
    debug!(
        "Running for {}/{} on {} ({})",
        context.repository.owner, context.repository.name, context.git_ref, context.event_name
    );

    let state = AppState::new(settings)?;
    let mut outputs = outputs::create_outputs(lookup("GITHUB_OUTPUT"));
    run(&state, &context, &mut outputs).await?;
    Ok(())
}

/// Reports a failed step to the runner (rendered as `::error::<message>`) and
/// returns the process exit code
fn exit_code(result: Result<(), ActionError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

/// Ask the optimizer for a decision and publish it as the `skip` output.
///
/// On error nothing has been published.
pub async fn run<O: OutputSink>(
    state: &AppState,
    context: &InvocationContext,
    outputs: &mut O,
) -> Result<Decision, ActionError> {
    let decision = request_decision(state, context).await?;
    outputs.set_output("skip", &decision.skip().to_string())?;
    Ok(decision)
}
