//! seekchat: stateful chat-completions client
//!
//! Keeps one conversation's message history against a DeepSeek-compatible
//! `/chat/completions` endpoint: builds request payloads, guards against
//! overlapping requests, and folds replies back into history.
//!
//! # Quick Start
//!
//! ```no_run
//! use seekchat::prelude::*;
//!
//! # async fn example() -> seekchat::error::Result<()> {
//! let session = Session::new(AgentIdentity::default(), ChatClient::new("sk-...")?);
//! let conversation = session.create_conversation();
//! let reply = session
//!     .chat("Hello!", &conversation, session.defaults())
//!     .await?;
//! println!("{}", reply.content(0));
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod prelude;
pub mod transport;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
