//! Console logging setup shared by both binaries.
//!
//! Log lines go to stderr so stdout carries only the report. `RUST_LOG`
//! overrides the level chosen by `--verbose`.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
