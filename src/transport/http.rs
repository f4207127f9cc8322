//! reqwest-backed transport and header helpers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::{HttpReply, Transport};
use crate::error::ChatError;

/// Request lifetime applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Build the JSON + Bearer header set the completions endpoint expects.
///
/// A key that cannot travel in a header (control characters, a trailing
/// newline from a key file) is a configuration error.
pub fn bearer_headers(api_key: &str) -> Result<HeaderMap, ChatError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
        ChatError::Configuration("API key contains characters not allowed in a header".into())
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}

/// [`Transport`] over a pooled `reqwest::Client`.
///
/// The timeout bounds how long a conversation can stay in flight.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn request_error(&self, error: reqwest::Error) -> ChatError {
        if error.is_timeout() {
            return ChatError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX));
        }
        ChatError::Transport {
            status: error.status().map(|s| s.as_u16()),
            body: String::new(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        headers: &HeaderMap,
        body: String,
    ) -> Result<HttpReply, ChatError> {
        debug!(url, bytes = body.len(), "POST");

        let resp = self
            .client
            .post(url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| match self.request_error(e) {
            ChatError::Transport { message, .. } => ChatError::Transport {
                status: Some(status),
                body: String::new(),
                message: format!("Failed to read response body: {message}"),
            },
            timeout => timeout,
        })?;

        Ok(HttpReply { status, body })
    }
}
