//! Configuration system (layered: code > env > config file > defaults).

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::agent::AgentIdentity;
use crate::error::ChatError;
use crate::transport::{ChatClient, ReqwestTransport, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::types::{ChatModel, RequestParameters};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variables consulted by [`ClientConfig::apply_env`].
pub const ENV_API_KEY: &str = "DEEPSEEK_API_KEY";
pub const ENV_BASE_URL: &str = "DEEPSEEK_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DEEPSEEK_TIMEOUT_SECS";
pub const ENV_MODEL: &str = "DEEPSEEK_MODEL";

/// Resolved client configuration.
///
/// Resolution order, highest first:
/// 1. Values set in code (`with_*`)
/// 2. Environment variables (a `.env` file is loaded if present)
/// 3. `~/.seekchat/config.toml`
/// 4. Built-in defaults
#[derive(Clone)]
pub struct ClientConfig {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
    defaults: RequestParameters,
    persona: Option<String>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("defaults", &self.defaults)
            .field("persona", &self.persona)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    persona: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    frequency_penalty: Option<f32>,
    presence_penalty: Option<f32>,
}

impl ClientConfig {
    /// Built-in defaults only; no credential.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            defaults: RequestParameters::default(),
            persona: None,
        }
    }

    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ChatError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Default config file (if it exists) overlaid with the environment.
    pub fn load() -> Result<Self, ChatError> {
        Self::load_from(Self::default_path())
    }

    /// Config file at `path` (if it exists) overlaid with the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::new();
        config.apply_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Default config file path (`~/.seekchat/config.toml`).
    pub fn default_path() -> PathBuf {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".seekchat"))
            .unwrap_or_else(|| PathBuf::from(".seekchat"))
            .join(CONFIG_FILE_NAME)
    }

    /// Overlay values from a TOML file. A missing file is not an error.
    pub fn apply_file(&mut self, path: impl AsRef<Path>) -> Result<(), ChatError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(ChatError::Io(err)),
        };

        let file: FileConfig = toml::from_str(&raw).map_err(|e| {
            ChatError::Configuration(format!("Invalid config file {}: {e}", path.display()))
        })?;

        if let Some(key) = file.api_key {
            self.api_key = Some(key);
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(persona) = file.persona {
            self.persona = Some(persona);
        }
        if let Some(model) = file.model {
            self.defaults.model = ChatModel::from(model);
        }
        if let Some(t) = file.temperature {
            self.defaults.temperature = t;
        }
        if let Some(max) = file.max_tokens {
            self.defaults.max_tokens = max;
        }
        if let Some(fp) = file.frequency_penalty {
            self.defaults.frequency_penalty = fp;
        }
        if let Some(pp) = file.presence_penalty {
            self.defaults.presence_penalty = pp;
        }
        self.defaults.validate()
    }

    /// Overlay values from an environment lookup.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ChatError> {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| {
                ChatError::Configuration(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got '{raw}'"))
            })?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.defaults.model = ChatModel::from(model);
        }
        Ok(())
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_defaults(mut self, defaults: RequestParameters) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn defaults(&self) -> &RequestParameters {
        &self.defaults
    }

    pub fn persona(&self) -> Option<&str> {
        self.persona.as_deref()
    }

    /// Identity carrying the configured persona, or the built-in one.
    pub fn identity(&self) -> AgentIdentity {
        match &self.persona {
            Some(persona) => AgentIdentity::new(persona.clone()),
            None => AgentIdentity::default(),
        }
    }

    /// Endpoint client over a [`ReqwestTransport`] with the configured timeout.
    pub fn client(&self) -> Result<ChatClient, ChatError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| ChatError::Configuration(format!("Missing {ENV_API_KEY}")))?;
        let transport = ReqwestTransport::new(self.timeout)?;
        Ok(ChatClient::with_transport(api_key, std::sync::Arc::new(transport))?
            .with_base_url(self.base_url.clone()))
    }
}
