//! Agent identity, conversations and the session facade.

pub mod conversation;
pub mod identity;
pub mod session;

pub use conversation::{Conversation, HistoryPolicy};
pub use identity::{AgentIdentity, DEFAULT_TRAIT};
pub use session::Session;
