//! Log subscriber setup.
//!
//! The engine only emits `tracing` events; embedding applications decide
//! where they go. These helpers cover the common cases.

use tracing::Subscriber;
use tracing_subscriber::{fmt, EnvFilter};

/// Fmt subscriber with target and line numbers, filtered by `filter`.
pub fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync {
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .finish()
}

/// Installs the global subscriber filtered by `RUST_LOG` (default: `info`).
///
/// Does nothing if a global subscriber is already set.
///
/// # Example
/// ```no_run
/// u_timetable::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing::subscriber::set_global_default(subscriber(filter));
}

/// Installs a debug-level subscriber that writes through the test harness.
///
/// Safe to call repeatedly; only the first call takes effect.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
