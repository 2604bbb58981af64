//! Shared HTTP plumbing for the character database and Gemini clients.

use std::sync::OnceLock;
use std::time::Duration;

use crate::error::FetchError;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide client so both API clients share one connection pool.
pub fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .user_agent(concat!("kiscope/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[net] falling back to default client: {e}");
                reqwest::Client::new()
            })
    })
}

/// Join a base URL and a path without doubling or dropping the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Send once (no retries) and turn transport errors and non-2xx statuses into
/// [`FetchError::NetworkOrStatus`].
pub async fn send_checked(
    rb: reqwest::RequestBuilder,
    label: &str,
    timeout_ms: u64,
) -> Result<reqwest::Response, FetchError> {
    let res = rb
        .timeout(Duration::from_millis(timeout_ms))
        .send()
        .await
        .map_err(|e| {
            log::warn!("[net] {label} transport error: {e}");
            FetchError::network(label, e)
        })?;

    if !res.status().is_success() {
        log::warn!("[net] {label} status {}", res.status());
        return Err(FetchError::status(label, res.status()));
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("https://a.test/api", "characters"), "https://a.test/api/characters");
        assert_eq!(join_url("https://a.test/api/", "/characters"), "https://a.test/api/characters");
    }
}
