//! Logging setup.
//!
//! Library code logs through `tracing`; this installs the subscriber that
//! writes those events to stderr so stdout stays free for `--json` reports.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise the filter is `info`, or `debug`
/// when `verbose` is requested.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    // A second init (e.g. from tests) is harmless, so the result is ignored.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();
}
