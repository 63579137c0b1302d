//! Logging configuration
//!
//! Initializes tracing for the binary. Library components never install a
//! global subscriber; they emit events and leave the choice to the host.

/// Initializes tracing with the specified default level
///
/// `RUST_LOG` takes precedence over the passed level when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();
}
