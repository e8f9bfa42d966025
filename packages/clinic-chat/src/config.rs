//! Configuration loading.
//!
//! Values come from, in order of precedence: command-line flags, environment
//! variables, `<config_dir>/clinic-chat/config.toml`, built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clinic_chat_core::{ChatConfig, CHAT_TIMEOUT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "CLINIC_CHAT_API_URL";
pub const ENV_TOKEN: &str = "CLINIC_CHAT_TOKEN";
pub const ENV_CONFIG: &str = "CLINIC_CHAT_CONFIG";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub welcome_text: Option<String>,
    pub expiry_text: Option<String>,
}

impl FileConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub config_path: Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token: String,
    pub user_id: Option<String>,
    pub request_timeout: Duration,
    pub chat: ChatConfig,
}

impl Settings {
    /// Resolve settings from flags, the process environment and the config file.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        let path = overrides
            .config_path
            .clone()
            .or_else(|| env(ENV_CONFIG).map(PathBuf::from))
            .unwrap_or_else(default_config_path);
        tracing::debug!("Loading config from {}", path.display());
        let file = FileConfig::load(&path)?;
        Self::resolve(overrides, env, file)
    }

    /// Merge the three sources. `env` looks up an environment variable.
    pub fn resolve(
        overrides: &Overrides,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| env(ENV_API_URL))
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token = overrides
            .token
            .clone()
            .or_else(|| env(ENV_TOKEN))
            .or(file.token)
            .ok_or_else(|| anyhow!("No auth token configured; pass --token or set {}", ENV_TOKEN))?;

        let user_id = overrides.user_id.clone().or(file.user_id);

        let timeout = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(CHAT_TIMEOUT);

        let request_timeout = file
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let mut chat = ChatConfig::default().with_timeout(timeout);
        if let Some(text) = file.welcome_text {
            chat = chat.with_welcome_text(text);
        }
        if let Some(text) = file.expiry_text {
            chat = chat.with_expiry_text(text);
        }
        chat.validate()?;

        Ok(Self {
            api_url,
            token,
            user_id,
            request_timeout,
            chat,
        })
    }
}

/// `<config_dir>/clinic-chat/config.toml`, or `config.toml` when no home is known.
pub fn default_config_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("clinic-chat").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
