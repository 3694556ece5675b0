//! Tracing subscriber setup for hosts embedding the controller

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Returns false when a
/// global subscriber was already installed (the existing one is kept).
pub fn init_tracing(default_level: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        debug!(default_level, "Tracing initialized");
    }
    installed
}
