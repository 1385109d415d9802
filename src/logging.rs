//! Developer tracing setup.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the tracing filter.
pub const LOG_ENV: &str = "HIT_LOG";

/// Return the filter directive used when `HIT_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "hit=debug" } else { "hit=warn" }
}

/// Build the tracing filter from `HIT_LOG`, falling back to the verbosity default.
fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install the stderr tracing subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbose: bool) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
