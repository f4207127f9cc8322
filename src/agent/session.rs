//! Session facade wiring an identity and an endpoint client together.

use super::conversation::Conversation;
use super::identity::AgentIdentity;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::ChatClient;
use crate::types::{ChatResponse, RequestParameters};

/// Convenience entry point: one identity, one client, default parameters.
///
/// Holds no per-conversation state; callers own their [`Conversation`]s.
#[derive(Debug, Clone)]
pub struct Session {
    identity: AgentIdentity,
    client: ChatClient,
    defaults: RequestParameters,
}

impl Session {
    /// Session using [`RequestParameters::default`] (temperature 1.0) for
    /// callers that pass [`Session::defaults`].
    pub fn new(identity: AgentIdentity, client: ChatClient) -> Self {
        Self {
            identity,
            client,
            defaults: RequestParameters::default(),
        }
    }

    /// Build a session from resolved configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(config.identity(), config.client()?).with_defaults(config.defaults().clone()))
    }

    pub fn with_defaults(mut self, defaults: RequestParameters) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn defaults(&self) -> &RequestParameters {
        &self.defaults
    }

    /// Fresh conversation bound to this session's identity.
    pub fn create_conversation(&self) -> Conversation {
        self.identity.create_conversation()
    }

    /// Build a request from `user_input` and send it on `conversation`.
    ///
    /// A conversation that is still waiting is rejected with
    /// [`ChatError::AlreadyInFlight`](crate::error::ChatError::AlreadyInFlight)
    /// before its pending turn is replaced. See [`Conversation::ask`].
    pub async fn chat(
        &self,
        user_input: impl Into<String>,
        conversation: &Conversation,
        params: &RequestParameters,
    ) -> Result<ChatResponse> {
        conversation.ask(user_input, params, &self.client).await
    }

    /// Same as [`Session::chat`], handing the outcome to `callback`.
    pub async fn chat_with<F>(
        &self,
        user_input: impl Into<String>,
        conversation: &Conversation,
        params: &RequestParameters,
        callback: F,
    ) where
        F: FnOnce(Result<ChatResponse>),
    {
        callback(self.chat(user_input, conversation, params).await);
    }
}
