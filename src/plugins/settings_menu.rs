//! Farewell settings menu.
//!
//! `/edit` opens an inline menu. Picking an entry either asks for the next
//! message (new template or new photo) or resets the chat. Every step
//! re-checks that the user is still an admin.

use tracing::{debug, info, warn};

use crate::bot::dispatcher::AppState;
use crate::bot::gateway::{CallbackAction, InboundMessage, Keyboard};
use crate::database::SettingsPatch;
use crate::error::MediaError;
use crate::events::EventKind;
use crate::state::{InputMode, PendingEdit};
use crate::utils::format_entities;

pub const MENU_TEXT: &str = "⚙️ <b>Farewell Bot Settings</b>\n\nChoose what you'd like to customize:";
pub const DENIED_TEXT: &str = "❌ Only group administrators can access settings.";
pub const DENIED_TOAST: &str = "Only admins can change settings!";
pub const RESET_TEXT: &str =
    "✅ <b>Settings Reset</b>\n\nAll messages and images have been reset to default values.";
pub const EXPECTED_PHOTO_TEXT: &str = "❌ Please send a photo, not text.";
pub const EXPECTED_TEXT_TEXT: &str = "❌ Please send the new message as text.";
pub const DOWNLOAD_FAILED_TEXT: &str = "❌ Failed to download image. Please try again.";

const BACK_LABEL: &str = "◀️ Back to Settings";

/// A menu button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Edit(EventKind),
    Image(EventKind),
    Reset,
    Back,
}

impl MenuAction {
    /// Parse a callback token (`edit_leave`, `image_ban`, `reset_default`, `back_to_menu`).
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "reset_default" => Some(MenuAction::Reset),
            "back_to_menu" => Some(MenuAction::Back),
            _ => {
                let (verb, kind) = token.split_once('_')?;
                let kind = EventKind::parse(kind)?;
                match verb {
                    "edit" => Some(MenuAction::Edit(kind)),
                    "image" => Some(MenuAction::Image(kind)),
                    _ => None,
                }
            }
        }
    }

    pub fn as_token(self) -> String {
        match self {
            MenuAction::Edit(kind) => format!("edit_{}", kind),
            MenuAction::Image(kind) => format!("image_{}", kind),
            MenuAction::Reset => "reset_default".to_string(),
            MenuAction::Back => "back_to_menu".to_string(),
        }
    }
}

/// The seven-entry settings menu.
pub fn menu_keyboard() -> Keyboard {
    use EventKind::*;

    let entries = [
        ("📝 Edit Leave Message", MenuAction::Edit(Leave)),
        ("👢 Edit Kick Message", MenuAction::Edit(Kick)),
        ("🚫 Edit Ban Message", MenuAction::Edit(Ban)),
        ("🖼️ Change Leave Image", MenuAction::Image(Leave)),
        ("🖼️ Change Kick Image", MenuAction::Image(Kick)),
        ("🖼️ Change Ban Image", MenuAction::Image(Ban)),
        ("🔄 Reset to Default", MenuAction::Reset),
    ];

    Keyboard::single_column(entries.into_iter().map(|(label, action)| (label, action.as_token())))
}

fn back_keyboard() -> Keyboard {
    Keyboard::single_column([(BACK_LABEL, MenuAction::Back.as_token())])
}

/// Handle `/edit`: show the menu to admins, a denial to everyone else.
pub async fn open_menu(state: &AppState, chat_id: i64, user_id: u64) -> anyhow::Result<()> {
    if !state.permissions.can_manage_settings(chat_id, user_id).await {
        state.gateway.send_text(chat_id, DENIED_TEXT, None).await?;
        return Ok(());
    }

    let keyboard = menu_keyboard();
    debug!(
        "Showing settings menu ({} entries) to {} in chat {}",
        keyboard.button_count(),
        user_id,
        chat_id
    );
    state
        .gateway
        .send_text(chat_id, MENU_TEXT, Some(&keyboard))
        .await?;
    Ok(())
}

/// Handle a menu button press. The callback is answered exactly once.
pub async fn handle_callback(state: &AppState, action: &CallbackAction) -> anyhow::Result<()> {
    let chat_id = action.chat_id;

    if !state.permissions.can_manage_settings(chat_id, action.user_id).await {
        answer(state, action, Some(DENIED_TOAST)).await;
        return Ok(());
    }
    answer(state, action, None).await;

    let Some(menu_action) = MenuAction::parse(&action.data) else {
        debug!("Ignoring unknown callback data '{}'", action.data);
        return Ok(());
    };

    let (html, keyboard) = match menu_action {
        MenuAction::Edit(kind) => {
            let current = state.settings.get(chat_id, kind).await?;
            replace_pending(state, action.user_id, chat_id, kind, InputMode::Text);

            let html = format!(
                "📝 <b>Edit {} Message</b>\n\n<i>Current message:</i>\n{}\n\n💬 Send me the new message you want to use:",
                kind.title(),
                current.template_or_default(kind)
            );
            (html, back_keyboard())
        }
        MenuAction::Image(kind) => {
            replace_pending(state, action.user_id, chat_id, kind, InputMode::Photo);

            let html = format!(
                "🖼️ <b>Change {} Image</b>\n\n📷 Send me a photo that you want to use for {} messages.\n\nSupported formats: JPG, PNG, GIF",
                kind.title(),
                kind
            );
            (html, back_keyboard())
        }
        MenuAction::Reset => {
            let removed = state.settings.reset(chat_id).await?;
            info!("Reset farewell settings for chat {} ({} rows)", chat_id, removed);
            (RESET_TEXT.to_string(), back_keyboard())
        }
        MenuAction::Back => (MENU_TEXT.to_string(), menu_keyboard()),
    };

    if let Err(e) = state
        .gateway
        .edit_text(chat_id, action.message_id, &html, Some(&keyboard))
        .await
    {
        warn!("Failed to update settings menu in chat {}: {}", chat_id, e);
    }

    Ok(())
}

fn replace_pending(state: &AppState, user_id: u64, chat_id: i64, kind: EventKind, mode: InputMode) {
    if let Some(previous) = state.conversations.begin(user_id, chat_id, kind, mode) {
        debug!(
            "Dropping unfinished {} edit of user {} in chat {}",
            previous.kind, user_id, previous.chat_id
        );
    }
}

async fn answer(state: &AppState, action: &CallbackAction, text: Option<&str>) {
    if let Err(e) = state.gateway.answer_callback(&action.callback_id, text).await {
        warn!("Failed to answer callback {}: {}", action.callback_id, e);
    }
}

/// Finish an edit with the user's next message. The pending edit is already
/// consumed, whatever happens here.
pub async fn complete_pending(
    state: &AppState,
    msg: &InboundMessage,
    pending: PendingEdit,
) -> anyhow::Result<()> {
    match pending.mode {
        InputMode::Text => save_template(state, msg, pending).await,
        InputMode::Photo => save_image(state, msg, pending).await,
    }
}

async fn save_template(
    state: &AppState,
    msg: &InboundMessage,
    pending: PendingEdit,
) -> anyhow::Result<()> {
    let Some(text) = msg.text.as_deref() else {
        state
            .gateway
            .send_text(msg.chat_id, EXPECTED_TEXT_TEXT, None)
            .await?;
        return Ok(());
    };

    let formatted = format_entities(text, &msg.spans);
    state
        .settings
        .set(pending.chat_id, pending.kind, SettingsPatch::template(formatted.as_str()))
        .await?;

    info!("Updated {} message for chat {}", pending.kind, pending.chat_id);

    let html = format!(
        "✅ <b>{} message updated!</b>\n\n<i>New message:</i>\n{}",
        pending.kind.title(),
        formatted
    );
    state
        .gateway
        .send_text(msg.chat_id, &html, Some(&back_keyboard()))
        .await?;
    Ok(())
}

async fn save_image(
    state: &AppState,
    msg: &InboundMessage,
    pending: PendingEdit,
) -> anyhow::Result<()> {
    let Some(photo) = msg.largest_photo() else {
        state
            .gateway
            .send_text(msg.chat_id, EXPECTED_PHOTO_TEXT, None)
            .await?;
        return Ok(());
    };

    let file = match state.gateway.fetch_file(&photo.file_id).await {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to download photo {}: {}", photo.file_id, e);
            state
                .gateway
                .send_text(msg.chat_id, DOWNLOAD_FAILED_TEXT, None)
                .await?;
            return Ok(());
        }
    };

    let path = match state
        .images
        .save(pending.kind, pending.chat_id, &file.name, &file.bytes)
        .await
    {
        Ok(path) => path,
        Err(MediaError::Empty) => {
            state
                .gateway
                .send_text(msg.chat_id, DOWNLOAD_FAILED_TEXT, None)
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    state
        .settings
        .set(
            pending.chat_id,
            pending.kind,
            SettingsPatch::image(path.to_string_lossy()),
        )
        .await?;

    info!("Updated {} image for chat {}: {}", pending.kind, pending.chat_id, path.display());

    let html = format!(
        "✅ <b>{} image updated!</b>\n\n📷 New image has been saved and will be used for {} messages.",
        pending.kind.title(),
        pending.kind
    );
    state
        .gateway
        .send_text(msg.chat_id, &html, Some(&back_keyboard()))
        .await?;
    Ok(())
}
