//! Logging setup.
//!
//! Logs go to stderr: stdout carries the MCP protocol stream.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins, then the configured level, then "info".
pub fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new(crate::config::DEFAULT_LOG_LEVEL))
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber was already installed.
pub fn init(log_level: &str) -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        // Must not panic on garbage directives
        let filter = build_filter("[[not a filter");
        assert!(!filter.to_string().is_empty());
    }
}
