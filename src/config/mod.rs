//! Configuration module for Yukira.
//!
//! Loads configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

/// Where chat settings are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo { uri: String, database: String },
    /// Volatile, lost on restart.
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    /// Bot username (without @) accepted after `/edit@`.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    pub poll_timeout_secs: u32,
    pub retry_delay: Duration,

    // Storage
    pub storage: StorageBackend,
    pub images_dir: PathBuf,
    pub fallback_image: PathBuf,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if the bot token is missing, a MongoDB backend has no URI,
    /// or a numeric setting does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| var(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = non_empty("BOT_TOKEN")
            .or_else(|| non_empty("TELEGRAM_BOT_TOKEN"))
            .context("BOT_TOKEN must be set")?;

        // Strip @ if present
        let bot_username = non_empty("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let backend = non_empty("STORAGE_BACKEND")
            .unwrap_or_else(|| "mongodb".to_string())
            .to_lowercase();

        let storage = match backend.as_str() {
            "mongodb" | "mongo" => StorageBackend::Mongo {
                uri: non_empty("MONGODB_URI").context("MONGODB_URI must be set")?,
                database: non_empty("MONGODB_DATABASE").unwrap_or_else(|| "yukira".to_string()),
            },
            "memory" => StorageBackend::Memory,
            other => bail!("Unknown STORAGE_BACKEND '{}' (expected mongodb or memory)", other),
        };

        let poll_timeout_secs = match non_empty("POLL_TIMEOUT_SECS") {
            Some(v) => v.parse().context("POLL_TIMEOUT_SECS must be a whole number")?,
            None => 30,
        };

        let retry_delay_secs: u64 = match non_empty("RETRY_DELAY_SECS") {
            Some(v) => v.parse().context("RETRY_DELAY_SECS must be a whole number")?,
            None => 5,
        };

        Ok(Self {
            bot_token,
            bot_username,
            poll_timeout_secs,
            retry_delay: Duration::from_secs(retry_delay_secs),
            storage,
            images_dir: non_empty("IMAGES_DIR")
                .unwrap_or_else(|| "images".to_string())
                .into(),
            fallback_image: non_empty("FALLBACK_IMAGE")
                .unwrap_or_else(|| "assets/farewell_anime.svg".to_string())
                .into(),
        })
    }
}
