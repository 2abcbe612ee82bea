//! Logging setup for suite binaries

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a suite binary
///
/// RUST_LOG overrides the verbosity flag. Safe to call more than once;
/// later calls keep the first subscriber.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .try_init();
}
