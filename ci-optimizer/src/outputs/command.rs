use super::{OutputError, OutputSink};
use crate::logging::escape_data;
use std::io::{Stdout, Write};

/// Emits `::set-output name=<name>::<value>` for runners without `GITHUB_OUTPUT`
#[derive(Debug)]
pub struct CommandOutputs<W> {
    writer: W,
}

impl CommandOutputs<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> CommandOutputs<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputSink for CommandOutputs<W> {
    fn set_output(&mut self, name: &str, value: &str) -> Result<(), OutputError> {
        writeln!(
            self.writer,
            "::set-output name={}::{}",
            escape_property(name),
            escape_data(value)
        )
        .and_then(|()| self.writer.flush())
        .map_err(|source| OutputError::Io {
            name: name.to_string(),
            source,
        })
    }
}

/// Command properties additionally reserve `:` and `,`
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
