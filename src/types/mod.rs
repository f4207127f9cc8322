//! Core types for seekchat.

pub mod message;
pub mod request;
pub mod response;
pub mod usage;

pub use message::*;
pub use request::*;
pub use response::*;
pub use usage::*;
