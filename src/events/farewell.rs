//! Farewell notifier.
//!
//! Sends the chat's farewell when a member leaves, is kicked or is banned.

use std::path::Path;

use tracing::{debug, info, warn};

use super::classifier::classify;
use super::kind::NAME_PLACEHOLDER;
use crate::bot::dispatcher::AppState;
use crate::bot::gateway::MembershipChange;
use crate::media;
use crate::utils::html_escape;

/// How a farewell reached the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivered {
    CustomImage,
    FallbackImage,
    Text,
}

/// Substitute the display name into an HTML template.
pub fn render_farewell(template: &str, display_name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, &html_escape(display_name))
}

/// Announce a departure. Returns `None` when the transition is not a farewell.
///
/// Delivery order: the chat's custom image, then the shared fallback image,
/// then plain text. Image files missing on disk are skipped.
pub async fn handle_membership_change(
    state: &AppState,
    change: &MembershipChange,
) -> anyhow::Result<Option<Delivered>> {
    let Some(kind) = classify(change.old_status, change.new_status, change.until_timestamp)
    else {
        debug!(
            "Ignoring {:?} -> {:?} for {} in chat {}",
            change.old_status, change.new_status, change.user.id, change.chat_id
        );
        return Ok(None);
    };

    let name = change.user.display_name();
    let custom = state.settings.get(change.chat_id, kind).await?;
    let text = render_farewell(custom.template_or_default(kind), &name);

    info!("User {} ({}) from chat {}", name, kind, change.chat_id);

    let delivered = deliver(state, change.chat_id, custom.image_ref.as_deref(), &text).await?;
    Ok(Some(delivered))
}

async fn deliver(
    state: &AppState,
    chat_id: i64,
    custom_image: Option<&str>,
    text: &str,
) -> anyhow::Result<Delivered> {
    if let Some(image) = custom_image.map(Path::new) {
        if send_photo_if_present(state, chat_id, image, text).await {
            return Ok(Delivered::CustomImage);
        }
    }

    if send_photo_if_present(state, chat_id, &state.fallback_image, text).await {
        return Ok(Delivered::FallbackImage);
    }

    warn!("Failed to send image, sending text only");
    state.gateway.send_text(chat_id, text, None).await?;
    Ok(Delivered::Text)
}

async fn send_photo_if_present(state: &AppState, chat_id: i64, image: &Path, caption: &str) -> bool {
    if !media::exists(image).await {
        debug!("Image {} not found, skipping", image.display());
        return false;
    }

    match state.gateway.send_photo(chat_id, image, caption).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Sending {} to chat {} failed: {}", image.display(), chat_id, e);
            false
        }
    }
}
