//! Logging initialization, called once by the CLI binary at startup.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing-subscriber` formatter honoring `RUST_LOG`,
/// defaulting to `info` when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
