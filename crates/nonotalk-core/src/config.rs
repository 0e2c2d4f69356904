use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NonotalkError, Result};

/// Top-level configuration for the NonoTalk client.
///
/// Loaded from `~/.nonotalk/config.toml` by default. Every section falls back
/// to its defaults when omitted, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NonotalkConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub companion: CompanionConfig,
    #[serde(default)]
    pub crisis: CrisisConfig,
}

impl NonotalkConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NonotalkConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NonotalkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Connection settings for the companion backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Scheme and authority of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Per-request timeout in seconds. 0 leaves requests unbounded.
    pub timeout_secs: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 0,
            user_agent: format!("nonotalk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Companion persona and chat-screen behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Display name of the companion.
    pub name: String,
    /// Title given to the main conversation when the screen has to create it.
    pub main_thread_title: String,
    /// Remaining-exchange count at or below which the quota warning is raised.
    pub quota_warning_threshold: u32,
    /// Number of most recent messages listed in the history sidebar.
    pub sidebar_history_limit: usize,
    /// Cap on the number of messages fetched when a conversation loads.
    /// Unset fetches the full history.
    pub history_fetch_limit: Option<u32>,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            name: "Nono".to_string(),
            main_thread_title: "Conversation avec Nono".to_string(),
            quota_warning_threshold: 2,
            sidebar_history_limit: 20,
            history_fetch_limit: None,
        }
    }
}

/// Emergency contacts shown alongside a crisis alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisConfig {
    pub hotlines: Vec<Hotline>,
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self {
            hotlines: vec![
                Hotline {
                    label: "Appeler 112".to_string(),
                    number: "112".to_string(),
                },
                Hotline {
                    label: "SOS Suicide".to_string(),
                    number: "0145394000".to_string(),
                },
            ],
        }
    }
}

/// A phone line offered in the crisis dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotline {
    pub label: String,
    pub number: String,
}

impl Hotline {
    /// `tel:` URI for the hotline.
    pub fn tel_uri(&self) -> String {
        format!("tel:{}", self.number)
    }
}
