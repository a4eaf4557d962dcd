//! Logging setup
//!
//! Diagnostics go to stderr through `tracing-subscriber`; stdout carries
//! only the CSV result of a command.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set and non-empty; otherwise this crate logs at
/// `default_level`. Calling it again is a no-op.
pub fn init_logging(default_level: &str) {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| format!("transfer_tracker={}", default_level));

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
