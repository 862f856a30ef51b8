// Logging module - Logging infrastructure
use crate::domain::error::{MemCliError, MemCliResult};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the configured level, `debug` when verbose.
pub fn filter_directive(log_level: &str, verbose: bool) -> String {
    let level = if verbose {
        "debug"
    } else {
        match log_level {
            "error" | "warn" | "info" | "debug" | "trace" | "off" => log_level,
            _ => "warn",
        }
    };
    format!("memcli={}", level)
}

/// Initialize logging system
///
/// `RUST_LOG` wins over the configured level. Events go to stderr so they
/// never mix with rendered output.
pub fn init_logging(log_level: &str, verbose: bool) -> MemCliResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level, verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()
        .map_err(|e| MemCliError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("memcli logging system initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("info", false), "memcli=info");
        assert_eq!(filter_directive("info", true), "memcli=debug");
        assert_eq!(filter_directive("loud", false), "memcli=warn");
    }

    #[test]
    fn test_logging_init() {
        // A second init reports an error instead of panicking
        let _ = init_logging("warn", false);
        assert!(init_logging("warn", false).is_err());
    }
}
