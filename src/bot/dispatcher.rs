//! Shared state and per-event routing.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use super::gateway::{Event, Gateway};
use crate::database::SettingsStore;
use crate::events;
use crate::media::ImageStore;
use crate::permissions::Permissions;
use crate::plugins;
use crate::state::ConversationStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Messaging transport.
    pub gateway: Arc<dyn Gateway>,

    /// Farewell customizations and admin records.
    pub settings: Arc<dyn SettingsStore>,

    /// Live admin checks.
    pub permissions: Permissions,

    /// Edits waiting for the user's next message.
    pub conversations: ConversationStore,

    /// Uploaded images.
    pub images: ImageStore,

    /// Image sent when a chat has no usable custom one.
    pub fallback_image: PathBuf,

    /// Bot username (without @), accepted as a command suffix.
    pub bot_username: String,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        settings: Arc<dyn SettingsStore>,
        images: ImageStore,
        fallback_image: PathBuf,
        bot_username: String,
    ) -> Self {
        let permissions = Permissions::new(gateway.clone(), settings.clone());

        Self {
            gateway,
            settings,
            permissions,
            conversations: ConversationStore::new(),
            images,
            fallback_image,
            bot_username,
        }
    }
}

/// Route one event to its handler.
pub async fn dispatch(state: &AppState, event: Event) -> anyhow::Result<()> {
    match event {
        Event::MembershipChange(change) => {
            if let Some(delivered) = events::handle_membership_change(state, &change).await? {
                debug!("Farewell in chat {} delivered as {:?}", change.chat_id, delivered);
            }
        }
        Event::Message(msg) => plugins::handle_message(state, &msg).await?,
        Event::Callback(action) => plugins::handle_callback(state, &action).await?,
    }

    Ok(())
}
