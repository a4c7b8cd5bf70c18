//! Yukira - Telegram farewell bot
//!
//! Posts a themed farewell when a member leaves, gets kicked or gets banned.
//! Group admins customize the message and image per event with `/edit`.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `bot` - Gateway boundary, Telegram transport, dispatch and polling loop
//! - `events` - Departure classification and the farewell notifier
//! - `plugins` - `/edit` command and the settings menu
//! - `database` - Settings store (MongoDB or in-memory)
//! - `cache` - Moka read cache for the MongoDB store
//! - `permissions` - Live admin checks
//! - `state` - Pending edits per user
//! - `media` - Uploaded image storage
//! - `utils` - Formatting helpers

mod bot;
mod cache;
mod config;
mod database;
mod error;
mod events;
mod media;
mod permissions;
mod plugins;
mod state;
mod utils;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bot::telegram::TelegramGateway;
use bot::{AppState, PollSettings};
use config::{Config, StorageBackend};
use database::{Database, InMemorySettingsStore, MongoSettingsStore, SettingsStore};
use media::ImageStore;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("yukira=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🎌 Yukira farewell bot starting...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");

    let settings: Arc<dyn SettingsStore> = match &config.storage {
        StorageBackend::Mongo { uri, database } => {
            info!("Connecting to MongoDB...");
            let db = Database::connect(uri, database).await?;
            let store = MongoSettingsStore::new(&db);
            store.ensure_indexes().await?;
            Arc::new(store)
        }
        StorageBackend::Memory => {
            info!("Using in-memory settings store; customizations are lost on restart");
            Arc::new(InMemorySettingsStore::new())
        }
    };

    let gateway = TelegramGateway::new(&config.bot_token, config.poll_timeout_secs)?;
    let username = match gateway.connect().await {
        Ok(username) => username,
        Err(e) => {
            error!("❌ Failed to connect to Telegram, check BOT_TOKEN: {}", e);
            return Err(e);
        }
    };
    info!("✅ Bot connected successfully: @{}", username);

    let bot_username = config.bot_username.clone().unwrap_or(username);

    info!("📝 Make sure to:");
    info!("   1. Add the bot to your group");
    info!("   2. Give it admin permissions");
    info!("   3. Enable 'Ban users' permission to see member changes");

    let state = AppState::new(
        Arc::new(gateway),
        settings,
        ImageStore::new(&config.images_dir),
        config.fallback_image.clone(),
        bot_username,
    );

    let poll = PollSettings {
        timeout_secs: config.poll_timeout_secs,
        retry_delay: config.retry_delay,
    };

    bot::run(state, poll, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await;

    Ok(())
}
