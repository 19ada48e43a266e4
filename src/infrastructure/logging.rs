use super::InfraError;
use crate::config::Config;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Output is appended to the configured log file without ANSI colours, since
/// the terminal itself is taken over by the UI. `RUST_LOG` wins over the
/// configured level when both are set.
pub fn init_tracing(config: &Config) -> Result<(), InfraError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| InfraError::Logging(e.to_string()))
}
