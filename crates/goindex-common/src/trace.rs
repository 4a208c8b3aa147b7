//! Shared `tracing` subscriber setup for the CLI and integration tests.

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber reading `RUST_LOG` (defaulting to `info`).
/// Idempotent: safe to call from multiple test binaries in the same process
/// group since `try_init` swallows the "already set" error.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
