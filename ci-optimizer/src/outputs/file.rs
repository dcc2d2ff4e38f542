use super::{OutputError, OutputSink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

/// Writes outputs to the file the runner names in `GITHUB_OUTPUT`.
///
/// Each value is framed by a random heredoc delimiter, so values may span lines:
///
/// ```text
/// skip<<ghadelimiter_5f3c...
/// true
/// ghadelimiter_5f3c...
/// ```
#[derive(Debug, Clone)]
pub struct FileOutputs {
    path: PathBuf,
}

impl FileOutputs {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OutputSink for FileOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), OutputError> {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(OutputError::DelimiterCollision(name.to_string()));
        }

        let io_error = |source| OutputError::Io {
            name: name.to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}").map_err(io_error)
    }
}
