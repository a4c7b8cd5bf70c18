//! MongoDB-backed settings store with a read-through cache.
//!
//! Cached rows expire after five minutes; writes refresh them immediately.

use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument, UpdateOptions};
use mongodb::{Collection, IndexModel};
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};
use crate::database::models::{AdminRecord, ChatSettings, Customization, SettingsPatch};
use crate::database::store::SettingsStore;
use crate::database::Database;
use crate::error::StoreError;
use crate::events::EventKind;

/// Settings store over the `farewell_settings` and `admins` collections.
pub struct MongoSettingsStore {
    settings: Collection<ChatSettings>,
    admins: Collection<AdminRecord>,
    cache: TypedCache<(i64, EventKind), Customization>,
}

impl MongoSettingsStore {
    pub fn new(db: &Database) -> Self {
        Self {
            settings: db.settings(),
            admins: db.admins(),
            cache: TypedCache::new("farewell_settings", CacheConfig::settings()),
        }
    }

    /// Create the unique indexes that enforce one row per key.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique = IndexOptions::builder().unique(true).build();

        self.settings
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1, "kind": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await?;

        self.admins
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "chat_id": 1, "user_id": 1 })
                    .options(unique)
                    .build(),
            )
            .await?;

        Ok(())
    }
}

fn settings_filter(chat_id: i64, kind: EventKind) -> Document {
    doc! { "chat_id": chat_id, "kind": kind.as_str() }
}

fn admin_filter(chat_id: i64, user_id: u64) -> Document {
    doc! { "chat_id": chat_id, "user_id": user_id as i64 }
}

/// `$set` only what the patch carries so the upsert merges server-side.
fn merge_update(patch: SettingsPatch, now: i64) -> Document {
    let mut fields = doc! { "updated_at": now };
    if let Some(template) = patch.template {
        fields.insert("template", template);
    }
    if let Some(image_ref) = patch.image_ref {
        fields.insert("image_ref", image_ref);
    }

    doc! {
        "$set": fields,
        "$setOnInsert": { "created_at": now },
    }
}

#[async_trait]
impl SettingsStore for MongoSettingsStore {
    async fn get(&self, chat_id: i64, kind: EventKind) -> Result<Customization, StoreError> {
        let key = (chat_id, kind);
        if let Some(cached) = self.cache.get(&key) {
            debug!("{} cache hit for chat {} ({})", self.cache.name(), chat_id, kind);
            return Ok(cached);
        }

        let row = self.settings.find_one(settings_filter(chat_id, kind)).await?;
        let customization = row.map(|r| r.customization()).unwrap_or_default();

        self.cache.insert(key, customization.clone());
        Ok(customization)
    }

    async fn set(
        &self,
        chat_id: i64,
        kind: EventKind,
        patch: SettingsPatch,
    ) -> Result<Customization, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let row = self
            .settings
            .find_one_and_update(
                settings_filter(chat_id, kind),
                merge_update(patch, chrono::Utc::now().timestamp()),
            )
            .with_options(options)
            .await?;

        let customization = row.map(|r| r.customization()).unwrap_or_default();
        self.cache.insert((chat_id, kind), customization.clone());
        debug!("Saved {} settings for chat {}", kind, chat_id);

        Ok(customization)
    }

    async fn reset(&self, chat_id: i64) -> Result<u64, StoreError> {
        let result = self.settings.delete_many(doc! { "chat_id": chat_id }).await?;

        self.cache.invalidate_where(move |(chat, _)| *chat == chat_id);
        debug!("Reset {} settings rows for chat {}", result.deleted_count, chat_id);

        Ok(result.deleted_count)
    }

    async fn add_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        let options = UpdateOptions::builder().upsert(true).build();
        let record = AdminRecord::new(chat_id, user_id);

        self.admins
            .update_one(
                admin_filter(chat_id, user_id),
                doc! { "$setOnInsert": { "added_at": record.added_at } },
            )
            .with_options(options)
            .await?;

        Ok(())
    }

    async fn remove_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        self.admins.delete_one(admin_filter(chat_id, user_id)).await?;
        Ok(())
    }

    async fn is_admin(&self, chat_id: i64, user_id: u64) -> Result<bool, StoreError> {
        Ok(self
            .admins
            .find_one(admin_filter(chat_id, user_id))
            .await?
            .is_some())
    }
}
