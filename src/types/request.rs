//! Request payload and per-call generation parameters.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::EnumString;

use super::message::Message;
use crate::error::ChatError;

const PENALTY_RANGE: RangeInclusive<f32> = -2.0..=2.0;
const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
const MAX_TOKENS_RANGE: RangeInclusive<u32> = 1..=8192;

/// Models served by the completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, EnumString, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ChatModel {
    /// DeepSeek-V3.
    #[default]
    #[strum(serialize = "deepseek-chat")]
    DeepSeekChat,
    /// DeepSeek-R1.
    #[strum(serialize = "deepseek-reasoner")]
    DeepSeekReasoner,
    /// Any other model id understood by a compatible endpoint.
    #[strum(default)]
    Custom(String),
}

impl ChatModel {
    /// Wire identifier sent in the `model` field.
    pub fn as_str(&self) -> &str {
        match self {
            Self::DeepSeekChat => "deepseek-chat",
            Self::DeepSeekReasoner => "deepseek-reasoner",
            Self::Custom(id) => id,
        }
    }
}

impl fmt::Display for ChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ChatModel {
    fn from(id: String) -> Self {
        // `Custom` is the strum default, so parsing never fails.
        Self::from_str(&id).unwrap_or(Self::Custom(id))
    }
}

impl From<ChatModel> for String {
    fn from(model: ChatModel) -> Self {
        model.as_str().to_string()
    }
}

/// Sampling parameters sent alongside the message list.
///
/// ```
/// use seekchat::types::{ChatModel, RequestParameters};
///
/// let params = RequestParameters::builder()
///     .model(ChatModel::DeepSeekReasoner)
///     .temperature(0.2)
///     .build();
/// assert_eq!(params.max_tokens, 8192);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
pub struct RequestParameters {
    #[builder(default)]
    pub model: ChatModel,
    /// Penalises tokens by how often they already appeared, in `[-2, 2]`.
    #[builder(default = 0.0)]
    pub frequency_penalty: f32,
    /// Completion token cap, in `[1, 8192]`.
    #[builder(default = 8192)]
    pub max_tokens: u32,
    /// Penalises tokens that appeared at all, in `[-2, 2]`.
    #[builder(default = 0.0)]
    pub presence_penalty: f32,
    /// Sampling temperature, in `[0, 2]`.
    #[builder(default = 1.0)]
    pub temperature: f32,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl RequestParameters {
    /// Check every parameter against the range the endpoint accepts.
    pub fn validate(&self) -> Result<(), ChatError> {
        check_range("frequency_penalty", self.frequency_penalty, &PENALTY_RANGE)?;
        check_range("presence_penalty", self.presence_penalty, &PENALTY_RANGE)?;
        check_range("temperature", self.temperature, &TEMPERATURE_RANGE)?;
        if !MAX_TOKENS_RANGE.contains(&self.max_tokens) {
            return Err(ChatError::InvalidArgument(format!(
                "max_tokens must be within {}..={}, got {}",
                MAX_TOKENS_RANGE.start(),
                MAX_TOKENS_RANGE.end(),
                self.max_tokens
            )));
        }
        Ok(())
    }
}

fn check_range(name: &str, value: f32, range: &RangeInclusive<f32>) -> Result<(), ChatError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ChatError::InvalidArgument(format!(
            "{name} must be within {}..={}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// Immutable request payload: history snapshot plus the pending user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: ChatModel,
    pub frequency_penalty: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>, params: &RequestParameters) -> Self {
        Self {
            messages,
            model: params.model.clone(),
            frequency_penalty: params.frequency_penalty,
            max_tokens: params.max_tokens,
            presence_penalty: params.presence_penalty,
            temperature: params.temperature,
        }
    }

    /// Serialize to the JSON body posted to `/chat/completions`.
    pub fn to_json(&self) -> Result<String, ChatError> {
        Ok(serde_json::to_string(self)?)
    }
}
