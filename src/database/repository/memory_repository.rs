//! Volatile settings store.
//!
//! Same contract as the MongoDB backend, kept in process memory. Used when
//! `STORAGE_BACKEND=memory` and by handler tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::database::models::{AdminRecord, ChatSettings, Customization, SettingsPatch};
use crate::database::store::SettingsStore;
use crate::error::StoreError;
use crate::events::EventKind;

#[derive(Default)]
struct Tables {
    settings: HashMap<(i64, EventKind), ChatSettings>,
    admins: HashMap<(i64, u64), AdminRecord>,
}

/// In-memory settings store. Merges happen under one lock.
#[derive(Default)]
pub struct InMemorySettingsStore {
    tables: Mutex<Tables>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, chat_id: i64, kind: EventKind) -> Result<Customization, StoreError> {
        Ok(self
            .tables
            .lock()
            .settings
            .get(&(chat_id, kind))
            .map(ChatSettings::customization)
            .unwrap_or_default())
    }

    async fn set(
        &self,
        chat_id: i64,
        kind: EventKind,
        patch: SettingsPatch,
    ) -> Result<Customization, StoreError> {
        let mut tables = self.tables.lock();
        let row = tables
            .settings
            .entry((chat_id, kind))
            .or_insert_with(|| ChatSettings::new(chat_id, kind));
        row.apply(patch);
        Ok(row.customization())
    }

    async fn reset(&self, chat_id: i64) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.settings.len();
        tables.settings.retain(|(chat, _), _| *chat != chat_id);
        Ok((before - tables.settings.len()) as u64)
    }

    async fn add_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        self.tables
            .lock()
            .admins
            .entry((chat_id, user_id))
            .or_insert_with(|| AdminRecord::new(chat_id, user_id));
        Ok(())
    }

    async fn remove_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError> {
        self.tables.lock().admins.remove(&(chat_id, user_id));
        Ok(())
    }

    async fn is_admin(&self, chat_id: i64, user_id: u64) -> Result<bool, StoreError> {
        Ok(self.tables.lock().admins.contains_key(&(chat_id, user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips_template() {
        let store = InMemorySettingsStore::new();
        store
            .set(1, EventKind::Leave, SettingsPatch::template("X"))
            .await
            .unwrap();

        let got = store.get(1, EventKind::Leave).await.unwrap();
        assert_eq!(got.template.as_deref(), Some("X"));
        assert_eq!(got.image_ref, None);
    }

    #[tokio::test]
    async fn unset_kind_is_empty() {
        let store = InMemorySettingsStore::new();
        store
            .set(1, EventKind::Leave, SettingsPatch::template("X"))
            .await
            .unwrap();

        assert_eq!(store.get(1, EventKind::Kick).await.unwrap(), Customization::default());
        assert_eq!(store.get(2, EventKind::Leave).await.unwrap(), Customization::default());
    }

    #[tokio::test]
    async fn template_and_image_updates_merge() {
        let store = InMemorySettingsStore::new();
        store
            .set(1, EventKind::Ban, SettingsPatch::template("Banned {username}"))
            .await
            .unwrap();
        let merged = store
            .set(1, EventKind::Ban, SettingsPatch::image("images/ban_1_a.jpg"))
            .await
            .unwrap();

        assert_eq!(merged.template.as_deref(), Some("Banned {username}"));
        assert_eq!(merged.image_ref.as_deref(), Some("images/ban_1_a.jpg"));

        let replaced = store
            .set(1, EventKind::Ban, SettingsPatch::template("Gone {username}"))
            .await
            .unwrap();
        assert_eq!(replaced.template.as_deref(), Some("Gone {username}"));
        assert_eq!(replaced.image_ref.as_deref(), Some("images/ban_1_a.jpg"));
    }

    #[tokio::test]
    async fn reset_clears_only_that_chat() {
        let store = InMemorySettingsStore::new();
        for kind in EventKind::ALL {
            store.set(1, kind, SettingsPatch::template("X")).await.unwrap();
        }
        store
            .set(2, EventKind::Leave, SettingsPatch::template("Y"))
            .await
            .unwrap();

        assert_eq!(store.reset(1).await.unwrap(), 3);
        for kind in EventKind::ALL {
            assert_eq!(store.get(1, kind).await.unwrap(), Customization::default());
        }
        assert_eq!(
            store.get(2, EventKind::Leave).await.unwrap().template.as_deref(),
            Some("Y")
        );
        assert_eq!(store.reset(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_record_add_and_remove() {
        let store = InMemorySettingsStore::new();
        assert!(!store.is_admin(1, 7).await.unwrap());

        store.add_admin(1, 7).await.unwrap();
        store.add_admin(1, 7).await.unwrap();
        assert!(store.is_admin(1, 7).await.unwrap());
        assert!(!store.is_admin(2, 7).await.unwrap());

        store.remove_admin(1, 7).await.unwrap();
        assert!(!store.is_admin(1, 7).await.unwrap());
    }
}
