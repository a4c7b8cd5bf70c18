//! Live administrator check.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bot::gateway::Gateway;
use crate::database::SettingsStore;

/// Decides who may change a chat's farewell settings.
///
/// Every check asks the gateway for the member's current status. The admin
/// record in the store is kept in step with the result but never read here.
#[derive(Clone)]
pub struct Permissions {
    gateway: Arc<dyn Gateway>,
    store: Arc<dyn SettingsStore>,
}

impl Permissions {
    pub fn new(gateway: Arc<dyn Gateway>, store: Arc<dyn SettingsStore>) -> Self {
        Self { gateway, store }
    }

    /// True only for the chat's creator and administrators.
    ///
    /// A failed status lookup counts as a denial.
    pub async fn can_manage_settings(&self, chat_id: i64, user_id: u64) -> bool {
        let allowed = match self.gateway.get_member_status(chat_id, user_id).await {
            Ok(status) => status.can_manage_settings(),
            Err(e) => {
                warn!("Admin check for {} in chat {} failed: {}", user_id, chat_id, e);
                return false;
            }
        };

        let recorded = if allowed {
            self.store.add_admin(chat_id, user_id).await
        } else {
            debug!("User {} is not an admin of chat {}", user_id, chat_id);
            self.store.remove_admin(chat_id, user_id).await
        };

        if let Err(e) = recorded {
            warn!("Failed to update admin record for {} in chat {}: {}", user_id, chat_id, e);
        }

        allowed
    }
}
