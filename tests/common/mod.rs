//! Shared test helpers and fake transports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use tokio::sync::Notify;

use seekchat::error::ChatError;
use seekchat::transport::{ChatClient, HttpReply, Transport};

/// A transport that replays queued outcomes and records request bodies.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpReply, ChatError>>>,
    bodies: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: u16, body: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(HttpReply {
            status,
            body: body.into(),
        }));
    }

    /// Queue a 200 reply whose choices carry `contents`.
    pub fn reply_choices(&self, contents: &[&str]) {
        self.reply(200, completion_body(contents));
    }

    pub fn fail(&self, error: ChatError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn last_body(&self) -> Option<serde_json::Value> {
        self.bodies
            .lock()
            .unwrap()
            .last()
            .map(|b| serde_json::from_str(b).unwrap())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(
        &self,
        _url: &str,
        _headers: &HeaderMap,
        body: String,
    ) -> Result<HttpReply, ChatError> {
        self.bodies.lock().unwrap().push(body);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpReply { status: 200, body: completion_body(&["Mock response"]) }))
    }
}

/// A transport that parks every call until released.
#[derive(Default)]
pub struct GatedTransport {
    pub entered: Notify,
    pub release: Notify,
    calls: AtomicUsize,
}

impl GatedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn post(
        &self,
        _url: &str,
        _headers: &HeaderMap,
        _body: String,
    ) -> Result<HttpReply, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(HttpReply {
            status: 200,
            body: completion_body(&["released"]),
        })
    }
}

pub fn client_for(transport: Arc<dyn Transport>) -> ChatClient {
    ChatClient::with_transport("test-key", transport)
        .expect("client")
        .with_base_url("https://example.test")
}

/// A DeepSeek-shaped completion body with one choice per entry.
pub fn completion_body(contents: &[&str]) -> String {
    let choices: Vec<serde_json::Value> = contents
        .iter()
        .enumerate()
        .map(|(index, content)| {
            serde_json::json!({
                "index": index,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            })
        })
        .collect();
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "deepseek-chat",
        "choices": choices,
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
    .to_string()
}
