//! Settings store abstraction.

use async_trait::async_trait;

use super::models::{Customization, SettingsPatch};
use crate::error::StoreError;
use crate::events::EventKind;

/// Durable per-chat farewell customizations plus the admin audit record.
///
/// Rows are unique per (chat, kind). Storage failures are returned to the
/// caller, never swallowed.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The stored customization, or an empty one if the chat never customized `kind`.
    async fn get(&self, chat_id: i64, kind: EventKind) -> Result<Customization, StoreError>;

    /// Upsert the row for (chat, kind). Fields the patch leaves `None` keep
    /// their stored value; the merge is atomic. Returns the merged row.
    async fn set(
        &self,
        chat_id: i64,
        kind: EventKind,
        patch: SettingsPatch,
    ) -> Result<Customization, StoreError>;

    /// Delete every customization of a chat. Returns the number of rows removed.
    async fn reset(&self, chat_id: i64) -> Result<u64, StoreError>;

    /// Record that `user_id` passed the live admin check in `chat_id`.
    async fn add_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError>;

    /// Forget `user_id` after a failed live admin check.
    async fn remove_admin(&self, chat_id: i64, user_id: u64) -> Result<(), StoreError>;

    /// Whether the audit record lists `user_id` for `chat_id`.
    async fn is_admin(&self, chat_id: i64, user_id: u64) -> Result<bool, StoreError>;
}
