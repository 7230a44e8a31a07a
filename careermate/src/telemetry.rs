//! Log output setup for binaries and tests embedding CareerMate.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already set, in which case
/// nothing changes.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}
