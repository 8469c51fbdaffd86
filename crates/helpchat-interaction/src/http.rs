use std::time::Duration;

use helpchat_core::{HelpchatError, Result};
use reqwest::Client;

/// Builds the shared client used for every call of one service.
pub fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|err| HelpchatError::config(format!("Failed to build HTTP client: {err}")))
}

/// Maps a request-level failure (connect, timeout, body read).
pub(crate) fn transport_error(err: reqwest::Error) -> HelpchatError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "failed"
    };
    HelpchatError::transport(format!("request {kind}: {err}"))
}

/// Joins a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h:1/", "/a/b"), "http://h:1/a/b");
        assert_eq!(join_url("http://h:1", "a"), "http://h:1/a");
    }
}
