//! Parsed completions response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use super::message::Role;
use super::usage::Usage;

/// Response body of `/chat/completions`.
///
/// Every field is defaulted so partial bodies still parse; callers check
/// `choices.len()` before reading content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatResponse {
    /// Unique identifier of the completion.
    pub id: String,
    /// Model that produced the completion.
    pub model: String,
    /// Unix timestamp (seconds) of creation.
    pub created: i64,
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// Content of the choice at `index`, or an empty string when out of range.
    pub fn content(&self, index: usize) -> String {
        self.choices
            .get(index)
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }

    /// All choice contents joined with newlines.
    ///
    /// Usually there is a single choice and `content(0)` is enough.
    pub fn all_content(&self) -> String {
        self.choices
            .iter()
            .map(|choice| choice.message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Reasoning trace of the choice at `index` (reasoner models only).
    pub fn reasoning(&self, index: usize) -> Option<&str> {
        self.choices
            .get(index)
            .and_then(|choice| choice.message.reasoning_content.as_deref())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}

/// One candidate completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Choice {
    pub index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    pub message: ResponseMessage,
}

/// Assistant message carried by a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseMessage {
    pub role: Role,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
}

impl Default for ResponseMessage {
    fn default() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            reasoning_content: None,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    ToolCalls,
    InsufficientSystemResource,
    #[serde(other)]
    Other,
}
