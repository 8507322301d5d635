//! Log setup for the `tick` binary.
//!
//! The TUI owns the terminal, so logs go to a daily file under
//! `<data_dir>/logs/` through a non-blocking writer.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "tick.log";

/// Error type for log setup
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter {filter:?}: {source}")]
    InvalidFilter {
        filter: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("could not create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("a global logger is already installed")]
    AlreadyInitialized,
}

/// Pick the filter: explicit override, then `RUST_LOG`, then the config value
pub fn resolve_filter(cli_level: Option<&str>, config_level: &str) -> String {
    if let Some(level) = cli_level {
        return level.to_string();
    }
    match std::env::var("RUST_LOG") {
        Ok(env) if !env.trim().is_empty() => env,
        _ => config_level.to_string(),
    }
}

/// Directory log files are written to
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Install the global subscriber. Keep the returned guard alive until exit,
/// or buffered lines are lost.
pub fn init_logging(filter: &str, data_dir: &Path) -> Result<WorkerGuard, LoggingError> {
    let env_filter = EnvFilter::try_new(filter).map_err(|e| LoggingError::InvalidFilter {
        filter: filter.to_string(),
        source: e,
    })?;

    let dir = log_dir(data_dir);
    std::fs::create_dir_all(&dir).map_err(|e| LoggingError::CreateDir {
        path: dir.clone(),
        source: e,
    })?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = std::env::consts::OS,
        "tick starting"
    );
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_wins() {
        assert_eq!(resolve_filter(Some("debug"), "warn"), "debug");
    }

    #[test]
    fn log_dir_is_under_data_dir() {
        assert_eq!(
            log_dir(Path::new("/data/tickoff")),
            PathBuf::from("/data/tickoff/logs")
        );
    }

    #[test]
    fn invalid_filter_is_rejected() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            init_logging("tickoff=notalevel", tmp.path()),
            Err(LoggingError::InvalidFilter { .. })
        ));
    }
}
