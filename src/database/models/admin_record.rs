//! Admin audit record.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user who last passed the live admin check in a chat.
///
/// Informational only; authorization always asks Telegram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub chat_id: i64,

    /// Stored signed, as BSON has no unsigned integers
    pub user_id: i64,

    /// Unix timestamp of the first successful check
    #[serde(default)]
    pub added_at: i64,
}

impl AdminRecord {
    pub fn new(chat_id: i64, user_id: u64) -> Self {
        Self {
            id: None,
            chat_id,
            user_id: user_id as i64,
            added_at: chrono::Utc::now().timestamp(),
        }
    }
}
