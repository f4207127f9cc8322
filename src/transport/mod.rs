//! Transport seam and the endpoint client built on it.

pub mod http;

pub use http::{bearer_headers, ReqwestTransport, DEFAULT_TIMEOUT};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tracing::warn;

use crate::error::ChatError;

/// Default DeepSeek API root.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com";

/// Raw HTTP outcome: whatever status the server answered with, plus its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the actual network call.
///
/// Implementations return `Ok` for any HTTP response and `Err` only when no
/// response could be obtained (connection failure, timeout, unreadable body).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, headers: &HeaderMap, body: String)
        -> Result<HttpReply, ChatError>;
}

/// Endpoint client: base URL and bearer token bound to a [`Transport`].
///
/// The token is injected here rather than held globally, so each owner of a
/// conversation decides which credential it uses. It is checked once at
/// construction and kept only inside the prepared headers.
#[derive(Clone)]
pub struct ChatClient {
    base_url: String,
    headers: HeaderMap,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"..")
            .finish()
    }
}

impl ChatClient {
    /// Client for the default endpoint over a [`ReqwestTransport`].
    pub fn new(api_key: impl AsRef<str>) -> Result<Self, ChatError> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)?;
        Self::with_transport(api_key, Arc::new(transport))
    }

    /// Fails with [`ChatError::Configuration`] when the key cannot be sent as
    /// a bearer header.
    pub fn with_transport(
        api_key: impl AsRef<str>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ChatError> {
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: bearer_headers(api_key.as_ref())?,
            transport,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// POST a JSON body to `/chat/completions` and return the response body.
    ///
    /// Non-2xx statuses become [`ChatError::Transport`] carrying the raw body.
    pub async fn post_chat(&self, body: String) -> Result<String, ChatError> {
        let url = self.completions_url();
        let reply = self.transport.post(&url, &self.headers, body).await?;
        if !reply.is_success() {
            warn!(status = reply.status, body = %reply.body, "chat completion rejected");
            return Err(ChatError::status(reply.status, reply.body));
        }
        Ok(reply.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingTransport {
        reply: HttpReply,
        seen: Mutex<Vec<(String, HeaderMap, String)>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post(
            &self,
            url: &str,
            headers: &HeaderMap,
            body: String,
        ) -> Result<HttpReply, ChatError> {
            self.seen
                .lock()
                .unwrap()
                .push((url.to_string(), headers.clone(), body));
            Ok(self.reply.clone())
        }
    }

    fn client_replying(status: u16, body: &str) -> (ChatClient, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            reply: HttpReply {
                status,
                body: body.to_string(),
            },
            seen: Mutex::new(Vec::new()),
        });
        let client = ChatClient::with_transport("sk-test", transport.clone())
            .unwrap()
            .with_base_url("https://example.test/");
        (client, transport)
    }

    #[test]
    fn completions_url_tolerates_trailing_slash() {
        let (client, _) = client_replying(200, "");
        assert_eq!(client.completions_url(), "https://example.test/chat/completions");
    }

    #[test]
    fn debug_output_hides_api_key() {
        let (client, _) = client_replying(200, "");
        assert!(!format!("{client:?}").contains("sk-test"));
    }

    #[test]
    fn unusable_key_fails_at_construction() {
        let (_, transport) = client_replying(200, "");
        let err = ChatClient::with_transport("sk-abc\n", transport.clone()).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn post_chat_forwards_url_headers_and_body() {
        let (client, transport) = client_replying(200, "{}");
        let body = client.post_chat("{\"a\":1}".to_string()).await.unwrap();
        assert_eq!(body, "{}");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "https://example.test/chat/completions");
        assert_eq!(seen[0].1["authorization"], "Bearer sk-test");
        assert_eq!(seen[0].2, "{\"a\":1}");
    }

    #[tokio::test]
    async fn non_success_status_becomes_transport_error() {
        let (client, _) = client_replying(500, "boom");
        let err = client.post_chat(String::new()).await.unwrap_err();
        match err {
            ChatError::Transport {
                status,
                body,
                message,
            } => {
                assert_eq!(status, Some(500));
                assert_eq!(body, "boom");
                assert!(message.contains("500"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
