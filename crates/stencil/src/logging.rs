//! Logging setup for binaries and tests.
//!
//! The library crates only emit `tracing` events. Hosts that want to see them
//! install a subscriber; this is a ready-made one.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs a formatting subscriber filtered by `RUST_LOG`.
///
/// Defaults to `warn` overall and `debug` for the stencil crates. Calling it
/// again after a subscriber is installed does nothing.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,stencil=debug,stencil_analysis=debug,stencil_builtins=info")
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
