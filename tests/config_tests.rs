//! Tests for configuration loading from the process environment.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use seekchat::config::{ClientConfig, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL, ENV_TIMEOUT_SECS};
use seekchat::error::ChatError;
use seekchat::types::ChatModel;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 4] = [ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS, ENV_MODEL];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clear_config_env() {
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
}

#[test]
fn from_env_reads_deepseek_variables() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    std::env::set_var(ENV_API_KEY, "sk-env");
    std::env::set_var(ENV_BASE_URL, "https://proxy.test");
    std::env::set_var(ENV_TIMEOUT_SECS, "30");
    std::env::set_var(ENV_MODEL, "deepseek-reasoner");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.api_key(), Some("sk-env"));
    assert_eq!(config.base_url(), "https://proxy.test");
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert_eq!(config.defaults().model, ChatModel::DeepSeekReasoner);
    assert!(config.client().is_ok());
}

#[test]
fn load_from_layers_env_over_file() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "api_key = \"sk-file\"\ntimeout_secs = 10\npersona = \"file persona\"\n",
    )
    .unwrap();
    std::env::set_var(ENV_API_KEY, "sk-env");

    let config = ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.api_key(), Some("sk-env"));
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.identity().system_trait(), "file persona");
}

#[test]
fn client_requires_an_api_key() {
    let _lock = env_lock_guard();
    let _guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    clear_config_env();

    let dir = tempfile::TempDir::new().unwrap();
    let config = ClientConfig::load_from(dir.path().join("missing.toml")).unwrap();
    let err = config.client().unwrap_err();
    assert!(matches!(err, ChatError::Configuration(msg) if msg.contains(ENV_API_KEY)));
}
