//! MongoDB connection and collections.

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::info;

use super::models::{AdminRecord, ChatSettings};
use crate::error::StoreError;

const SETTINGS_COLLECTION: &str = "farewell_settings";
const ADMINS_COLLECTION: &str = "admins";

/// Handle to the bot's database.
#[derive(Debug, Clone)]
pub struct Database {
    db: mongodb::Database,
}

impl Database {
    /// Connect and ping the target database.
    ///
    /// # Errors
    /// Returns error if the URI is invalid or the server is unreachable.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name.get_or_insert_with(|| "yukira".to_string());

        let db = Client::with_options(options)?.database(db_name);
        db.run_command(doc! { "ping": 1 }).await?;

        info!("Connected to MongoDB database '{}'", db_name);
        Ok(Self { db })
    }

    pub fn settings(&self) -> Collection<ChatSettings> {
        self.db.collection(SETTINGS_COLLECTION)
    }

    pub fn admins(&self) -> Collection<AdminRecord> {
        self.db.collection(ADMINS_COLLECTION)
    }
}
