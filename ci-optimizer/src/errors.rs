use crate::config::ConfigError;
use crate::context::ContextError;
use crate::optimizer_client::RequestError;
use crate::outputs::OutputError;
use thiserror::Error;

/// Errors that fail the step.
///
/// Everything the optimizer itself answers with is absorbed by the decision
/// policy; what reaches this type means the step could not run at all.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Output(#[from] OutputError),
}
