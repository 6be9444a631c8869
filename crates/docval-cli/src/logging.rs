//! Log setup for the binary.

use crate::error::{CliError, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log-level` nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Build the log filter: explicit level, then `RUST_LOG`, then the default
pub fn log_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(level) => EnvFilter::try_new(level)
            .map_err(|e| CliError::InvalidInput(format!("Invalid log level '{}': {}", level, e))),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))),
    }
}

/// Install the global subscriber, logging to stderr
pub fn init_logging(level: Option<&str>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level)?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level() {
        let filter = log_filter(Some("debug")).unwrap();
        assert_eq!(filter.to_string(), "debug");

        let filter = log_filter(Some("docval_engine=trace")).unwrap();
        assert_eq!(filter.to_string(), "docval_engine=trace");
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            log_filter(Some("docval_engine=loud")),
            Err(CliError::InvalidInput(_))
        ));
    }
}
