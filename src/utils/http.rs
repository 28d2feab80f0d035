use std::time::Duration;

/// Default request timeout for tile probes, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get standard user agent string
pub fn get_user_agent() -> &'static str {
    "TileStitch"
}

/// Build the shared client used for every tile probe.
///
/// Redirects are followed by reqwest's default policy (up to 10 hops); the
/// final status decides whether a tile exists.
pub fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}
