//! CLI argument definitions for the NonoTalk terminal client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// NonoTalk: chat with Nono, your caring companion, from the terminal.
#[derive(Parser, Debug)]
#[command(name = "nonotalk", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://localhost:5000.
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Account username.
    #[arg(long = "username", env = "NONOTALK_USERNAME")]
    pub username: Option<String>,

    /// Account PIN.
    #[arg(long = "pin", env = "NONOTALK_PIN", hide_env_values = true)]
    pub pin: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NONOTALK_CONFIG env var > ~/.nonotalk/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NONOTALK_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend base URL.
    ///
    /// Priority: --base-url flag > NONOTALK_BASE_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        if let Some(ref url) = self.base_url {
            return url.clone();
        }
        if let Ok(url) = std::env::var("NONOTALK_BASE_URL") {
            if !url.trim().is_empty() {
                return url;
            }
        }
        config_url.to_string()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".nonotalk").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".nonotalk").join("config.toml");
    }
    PathBuf::from("config.toml")
}
