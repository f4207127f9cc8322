//! Error types for seekchat.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for every conversation operation.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("A request is already in flight for this conversation")]
    AlreadyInFlight,

    #[error("Transport error (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        body: String,
        message: String,
    },

    #[error("Timed out after {0}ms")]
    Timeout(u64),

    #[error("Response body was empty")]
    EmptyResponse,

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// Create a transport error for a non-success HTTP status.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            body: body.into(),
            message: format!("HTTP status {status}"),
        }
    }

    /// Create a transport error for a failure that produced no response.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            body: String::new(),
            message: message.into(),
        }
    }

    /// HTTP status attached to a transport error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyInFlight => ErrorCategory::Busy,
            Self::Transport { status, .. } => match status {
                None => ErrorCategory::Network,
                Some(401 | 403) => ErrorCategory::Authentication,
                Some(408) => ErrorCategory::Timeout,
                Some(429) => ErrorCategory::RateLimit,
                Some(500..=599) => ErrorCategory::Server,
                Some(_) => ErrorCategory::Api,
            },
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::EmptyResponse => ErrorCategory::EmptyResponse,
            Self::Parse(_) => ErrorCategory::Serialization,
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorCategory::Configuration,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether the caller may reasonably retry the same exchange.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Busy
                | ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Busy => RecoverySuggestion::WaitForReply,
            ErrorCategory::Authentication => RecoverySuggestion::CheckCredentials,
            ErrorCategory::RateLimit
            | ErrorCategory::Network
            | ErrorCategory::Server => RecoverySuggestion::RetryWithBackoff,
            ErrorCategory::Timeout => RecoverySuggestion::IncreaseTimeout,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            _ => RecoverySuggestion::ContactSupport,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ChatError>;
