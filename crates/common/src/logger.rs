use crate::config::AppConfig;
use crate::error::SemRouteError;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file name inside the configured log directory
pub const LOG_FILE_NAME: &str = "semroute.log";

/// Initialize logging from the application configuration
///
/// Console output always; a file layer is added when `log_dir` is set.
pub fn init_from_config(config: &AppConfig) -> Result<(), SemRouteError> {
    match &config.log_dir {
        Some(dir) => setup_logging(dir, &config.log_level),
        None => setup_console_logging(&config.log_level),
    }
}

/// Initialize console + file logging
///
/// # Arguments
/// * `log_dir` - Directory where `semroute.log` is appended to
/// * `log_level` - Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), SemRouteError> {
    std::fs::create_dir_all(log_dir).map_err(|e| {
        SemRouteError::configuration(format!(
            "Failed to create log directory {}: {}",
            log_dir.display(),
            e
        ))
    })?;

    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            SemRouteError::configuration(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter(log_level));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(env_filter(log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| SemRouteError::configuration(format!("Failed to install logger: {}", e)))?;

    tracing::info!(
        "Logging initialized: level={}, log_file={}",
        log_level,
        log_file_path.display()
    );

    Ok(())
}

/// Console-only logging, for development and the one-shot CLI commands
pub fn setup_console_logging(log_level: &str) -> Result<(), SemRouteError> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(env_filter(log_level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| SemRouteError::configuration(format!("Failed to install logger: {}", e)))?;

    tracing::debug!("Console logging initialized: level={}", log_level);

    Ok(())
}

fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_log_level(log_level).as_str().to_lowercase()))
}

/// Parse string to tracing Level
pub fn parse_log_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("warning"), Level::WARN);
        assert_eq!(parse_log_level(" ERROR "), Level::ERROR);
        assert_eq!(parse_log_level("verbose"), Level::INFO);
    }
}
