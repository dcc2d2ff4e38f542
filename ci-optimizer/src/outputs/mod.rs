use std::io::Stdout;
use std::path::PathBuf;
use thiserror::Error;

pub mod command;
pub mod file;

/// Errors that can occur while publishing step outputs
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output '{name}': {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },
    #[error("Output '{0}' contains the output delimiter")]
    DelimiterCollision(String),
}

/// Destination for the step's outputs.
///
/// The runner offers two mechanisms: the file named by `GITHUB_OUTPUT`, and the
/// older `::set-output` command on stdout for runners that predate it.
pub trait OutputSink {
    /// Publish `value` under `name`
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), OutputError>;
}

/// Output sink chosen at startup from the runner environment
pub enum Outputs {
    /// Appends to the `GITHUB_OUTPUT` file
    File(file::FileOutputs),
    /// Legacy `::set-output` workflow command
    Command(command::CommandOutputs<Stdout>),
}

impl OutputSink for Outputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), OutputError> {
        match self {
            Self::File(outputs) => outputs.set_output(name, value),
            Self::Command(outputs) => outputs.set_output(name, value),
        }
    }
}

/// Picks the output sink the runner supports, given the value of `GITHUB_OUTPUT`
pub fn create_outputs(github_output: Option<String>) -> Outputs {
    match github_output.filter(|path| !path.is_empty()) {
        Some(path) => Outputs::File(file::FileOutputs::new(PathBuf::from(path))),
        None => Outputs::Command(command::CommandOutputs::stdout()),
    }
}
