//! Convenience re-exports for common use.

pub use crate::agent::{AgentIdentity, Conversation, HistoryPolicy, Session};
pub use crate::config::ClientConfig;
pub use crate::error::{ChatError, Result};
pub use crate::transport::{ChatClient, HttpReply, Transport};
pub use crate::types::{
    ChatModel, ChatRequest, ChatResponse, Choice, FinishReason, Message, RequestParameters, Role,
    Usage,
};
