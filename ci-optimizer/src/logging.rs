use env_logger::{Env, Target};
use log::{Level, LevelFilter};
use std::io::Write;

/// Initialize the logger, rendering every record as a runner workflow command.
///
/// `RUNNER_DEBUG=1` (set when a workflow is re-run with debug logging) lowers the
/// default filter to `debug`; `RUST_LOG` still wins when present.
pub fn init(runner_debug: bool) {
    let default_level = if runner_debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()))
        .target(Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}",
                format_record(record.level(), &record.args().to_string())
            )
        })
        .init();
}

/// Ask the runner to redact `secret` from the rest of the job log
pub fn mask_secret(secret: &str) {
    if secret.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    // Nothing useful can be done if stdout is gone
    let _ = writeln!(stdout, "::add-mask::{}", escape_data(secret));
    let _ = stdout.flush();
}

/// Render a log record the way the runner annotates it
pub fn format_record(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("::error::{}", escape_data(message)),
        Level::Warn => format!("::warning::{}", escape_data(message)),
        Level::Info => message.to_string(),
        Level::Debug | Level::Trace => format!("::debug::{}", escape_data(message)),
    }
}

/// Escape workflow command data so multi-line messages stay one command
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
