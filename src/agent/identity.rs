//! Assistant persona shared by conversations.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use super::conversation::Conversation;

/// Persona used when none is supplied.
pub const DEFAULT_TRAIT: &str = "You are a professional game producer who is an expert in Unity \
development and game making, with a deep understanding of the game development field. You are a \
human. Remember the persona above. You may flesh it out through association, but nothing in it \
may be changed. Stay strictly in character.";

/// Holds the system prompt ("trait") that seeds every conversation.
///
/// Cloning is cheap and clones share the same trait. A conversation copies the
/// trait once, when it seeds its history, so [`AgentIdentity::set_trait`] only
/// affects conversations that have not seeded yet.
#[derive(Clone)]
pub struct AgentIdentity {
    system_trait: Arc<RwLock<String>>,
}

impl fmt::Debug for AgentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentIdentity")
            .field("system_trait", &self.system_trait())
            .finish()
    }
}

impl Default for AgentIdentity {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIT)
    }
}

impl AgentIdentity {
    pub fn new(system_trait: impl Into<String>) -> Self {
        Self {
            system_trait: Arc::new(RwLock::new(system_trait.into())),
        }
    }

    /// Current trait text.
    pub fn system_trait(&self) -> String {
        self.system_trait
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the trait. Any string is accepted.
    pub fn set_trait(&self, new_trait: impl Into<String>) {
        *self
            .system_trait
            .write()
            .unwrap_or_else(PoisonError::into_inner) = new_trait.into();
    }

    /// Create a new conversation bound to this identity.
    pub fn create_conversation(&self) -> Conversation {
        Conversation::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity_uses_builtin_persona() {
        assert_eq!(AgentIdentity::default().system_trait(), DEFAULT_TRAIT);
    }

    #[test]
    fn clones_share_trait_updates() {
        let identity = AgentIdentity::new("first");
        let shared = identity.clone();
        identity.set_trait("second");
        assert_eq!(shared.system_trait(), "second");
    }

    #[test]
    fn any_trait_text_is_accepted() {
        let identity = AgentIdentity::new("");
        assert_eq!(identity.system_trait(), "");
        identity.set_trait("多语言 persona\n with newlines");
        assert_eq!(identity.system_trait(), "多语言 persona\n with newlines");
    }
}
