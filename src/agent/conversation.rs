//! Conversation state: history, the pending user turn and the single-flight guard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};
use uuid::Uuid;

use super::identity::AgentIdentity;
use crate::error::{ChatError, Result};
use crate::transport::ChatClient;
use crate::types::{ChatRequest, ChatResponse, Message, RequestParameters, Role, Usage};

/// How a successful reply is folded into history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Append the user turn once, then one assistant message per choice.
    #[default]
    UserOncePerExchange,
    /// Append a user/assistant pair for every choice.
    UserPerChoice,
}

#[derive(Debug, Default)]
struct ConversationState {
    /// `None` until the first `build_request` seeds the system message.
    history: Option<Vec<Message>>,
    pending: Option<Message>,
    usage: Usage,
}

/// A single chat session against the completions endpoint.
///
/// History is append-only and only grows when a `send` succeeds with at least
/// one choice. At most one `send` may be outstanding; a second concurrent call
/// is rejected with [`ChatError::AlreadyInFlight`] instead of queued.
#[derive(Debug)]
pub struct Conversation {
    id: Uuid,
    identity: AgentIdentity,
    policy: HistoryPolicy,
    waiting: AtomicBool,
    state: Mutex<ConversationState>,
}

/// Clears the waiting flag when dropped, including when the `send` future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Conversation {
    pub fn new(identity: AgentIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            policy: HistoryPolicy::default(),
            waiting: AtomicBool::new(false),
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn with_history_policy(mut self, policy: HistoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    pub fn history_policy(&self) -> HistoryPolicy {
        self.policy
    }

    /// True while a request is in flight.
    pub fn is_waiting(&self) -> bool {
        self.waiting.load(Ordering::Acquire)
    }

    pub fn is_seeded(&self) -> bool {
        self.state().history.is_some()
    }

    /// Snapshot of the durable history (empty before seeding).
    pub fn history(&self) -> Vec<Message> {
        self.state().history.clone().unwrap_or_default()
    }

    pub fn history_len(&self) -> usize {
        self.state().history.as_ref().map_or(0, Vec::len)
    }

    /// The user message built by the last `build_request`, if not yet sent.
    pub fn pending(&self) -> Option<Message> {
        self.state().pending.clone()
    }

    /// Token usage accumulated over successful exchanges.
    pub fn usage(&self) -> Usage {
        self.state().usage
    }

    /// Build the payload for the next exchange.
    ///
    /// Seeds history with the identity's trait on first use and stores the
    /// user turn as pending; durable history is left untouched.
    pub fn build_request(
        &self,
        user_input: impl Into<String>,
        params: &RequestParameters,
    ) -> Result<ChatRequest> {
        params.validate()?;

        let mut state = self.state();
        let history = state
            .history
            .get_or_insert_with(|| vec![Message::system(self.identity.system_trait())]);

        let user = Message::user(user_input);
        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.extend(history.iter().cloned());
        messages.push(user.clone());
        state.pending = Some(user);

        Ok(ChatRequest::new(messages, params))
    }

    /// Post `request` and fold a successful reply into history.
    ///
    /// Failures of any kind leave history exactly as it was and discard the
    /// pending turn. A reply with zero choices is returned as-is without
    /// touching history.
    pub async fn send(&self, request: &ChatRequest, client: &ChatClient) -> Result<ChatResponse> {
        let _in_flight = self.claim()?;
        self.dispatch(request, client).await
    }

    /// Build a request from `user_input` and send it as one step.
    ///
    /// The in-flight slot is claimed before the request is built, so a call
    /// on a busy conversation fails without replacing the pending turn even
    /// when several tasks race for it.
    pub async fn ask(
        &self,
        user_input: impl Into<String>,
        params: &RequestParameters,
        client: &ChatClient,
    ) -> Result<ChatResponse> {
        let _in_flight = self.claim()?;
        let request = self.build_request(user_input, params)?;
        self.dispatch(&request, client).await
    }

    fn claim(&self) -> Result<InFlight<'_>> {
        InFlight::acquire(&self.waiting).ok_or_else(|| {
            warn!(conversation = %self.id, "send rejected: reply still pending");
            ChatError::AlreadyInFlight
        })
    }

    async fn dispatch(&self, request: &ChatRequest, client: &ChatClient) -> Result<ChatResponse> {
        let pending = self.state().pending.take();
        // The turn recorded is the one actually sent, even if `build_request`
        // ran again since this request was built.
        let user_turn = request
            .messages
            .last()
            .filter(|m| m.role == Role::User)
            .cloned()
            .or(pending);

        debug!(
            conversation = %self.id,
            model = %request.model,
            messages = request.messages.len(),
            "awaiting reply"
        );

        let response = match self.exchange(request, client).await {
            Ok(response) => response,
            Err(err) => {
                warn!(conversation = %self.id, error = %err, "exchange failed, history unchanged");
                return Err(err);
            }
        };

        if response.choices.is_empty() {
            debug!(conversation = %self.id, "reply carried no choices");
            return Ok(response);
        }

        self.record(user_turn, &response);
        Ok(response)
    }

    async fn exchange(&self, request: &ChatRequest, client: &ChatClient) -> Result<ChatResponse> {
        let body = client.post_chat(request.to_json()?).await?;
        if body.is_empty() {
            return Err(ChatError::EmptyResponse);
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn record(&self, user_turn: Option<Message>, response: &ChatResponse) {
        let mut state = self.state();
        if let Some(usage) = &response.usage {
            state.usage.merge(usage);
        }

        let history = state
            .history
            .get_or_insert_with(|| vec![Message::system(self.identity.system_trait())]);
        let before = history.len();
        let replies = response
            .choices
            .iter()
            .map(|choice| Message::assistant(choice.message.content.clone()));

        match self.policy {
            HistoryPolicy::UserOncePerExchange => {
                history.extend(user_turn);
                history.extend(replies);
            }
            HistoryPolicy::UserPerChoice => {
                for reply in replies {
                    history.extend(user_turn.clone());
                    history.push(reply);
                }
            }
        }

        debug!(
            conversation = %self.id,
            appended = history.len() - before,
            total = history.len(),
            "history updated"
        );
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
