//! Configuration management with XDG paths
//!
//! ~/.config/chatguru/config.json - API key, models, server settings (0600)
//! ~/.local/state/chatguru/users/ - Profiles and chat history

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use crate::client::DEFAULT_API_BASE;

const APP_NAME: &str = "chatguru";

/// Get config directory (~/.config/chatguru/)
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get state directory (~/.local/state/chatguru/)
pub fn state_dir() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".local/state")))
        .context("Could not determine state directory")?;
    Ok(base.join(APP_NAME))
}

/// Get config file path
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Ensure all directories exist
pub fn ensure_dirs() -> Result<()> {
    fs::create_dir_all(config_dir()?)?;
    fs::create_dir_all(state_dir()?)?;
    Ok(())
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chat Completions API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model used for the true/false scope check
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Model used for guidance answers
    #[serde(default = "default_answer_model")]
    pub answer_model: String,

    /// HTTP port for chatguru-api
    #[serde(default = "default_port")]
    pub port: u16,

    /// Where profiles and history live; defaults to the state dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_api_base() -> String { DEFAULT_API_BASE.to_string() }
fn default_classifier_model() -> String { "gpt-3.5-turbo".to_string() }
fn default_answer_model() -> String { "gpt-4".to_string() }
fn default_port() -> u16 { 3000 }

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            classifier_model: default_classifier_model(),
            answer_model: default_answer_model(),
            port: default_port(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults
    pub fn load() -> Result<Self> {
        ensure_dirs()?;
        let path = config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from disk, then apply environment overrides
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    /// Environment variables take precedence over the file
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let non_empty = |k: &str| var(k).filter(|v| !v.is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY").or_else(|| non_empty("OPENROUTER_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(base) = non_empty("CHATGURU_API_BASE") {
            self.api_base = base;
        }
        if let Some(port) = non_empty("CHATGURU_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(dir) = non_empty("CHATGURU_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Set a single key by name (for `chatguru config set`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "key" | "api_key" => self.api_key = Some(value.to_string()),
            "base" | "api_base" => self.api_base = value.to_string(),
            "classifier_model" => self.classifier_model = value.to_string(),
            "answer_model" | "model" => self.answer_model = value.to_string(),
            "port" => {
                self.port = value
                    .parse()
                    .with_context(|| format!("Invalid port: {}", value))?
            }
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Directory holding per-user profile and history files
    pub fn users_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(state_dir()?.join("users")),
        }
    }

    /// Save config to disk with secure permissions
    pub fn save(&self) -> Result<()> {
        ensure_dirs()?;
        let path = config_path()?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, &content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        // 0600: the file holds the API key
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;

        Ok(())
    }

    /// API key or a helpful error
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("No API key configured. Set OPENAI_API_KEY or run: chatguru config set key <your-key>")
    }
}
