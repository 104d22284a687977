use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stdout is left for the generated prompt so the binary can be piped.
///
/// ```
/// promptgen::init_logging(false);
/// ```
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
