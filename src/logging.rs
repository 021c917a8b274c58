//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "warn";

/// Filter directive used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool, configured: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    configured
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
        .to_string()
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `verbose` and the configured level.
pub fn init(verbose: bool, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, configured)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
