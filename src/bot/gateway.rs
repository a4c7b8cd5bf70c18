//! Messaging gateway boundary.
//!
//! Everything the bot needs from the chat transport goes through [`Gateway`].
//! Inbound updates are normalized into [`Event`] before any handler sees them,
//! so handlers match on a closed set of shapes instead of probing optional fields.

use std::path::Path;

use async_trait::async_trait;

use crate::error::GatewayError;

/// Membership status of a user in a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStatus {
    Creator,
    Administrator,
    Member,
    /// Restricted user; `is_member` is false once they are no longer in the chat.
    Restricted { is_member: bool },
    Left,
    /// Removed by an admin (temporary kick or permanent ban).
    Kicked,
}

impl MemberStatus {
    /// Was actually in the chat (only these departures are announced).
    pub fn is_present(self) -> bool {
        matches!(
            self,
            MemberStatus::Creator | MemberStatus::Administrator | MemberStatus::Member
        )
    }

    /// No longer in the chat.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MemberStatus::Left | MemberStatus::Kicked | MemberStatus::Restricted { is_member: false }
        )
    }

    /// May open the settings menu.
    pub fn can_manage_settings(self) -> bool {
        matches!(self, MemberStatus::Creator | MemberStatus::Administrator)
    }
}

/// The subset of a user profile the bot cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

impl UserInfo {
    /// `@handle` when available, otherwise "first last" trimmed.
    pub fn display_name(&self) -> String {
        match self.username.as_deref() {
            Some(handle) if !handle.is_empty() => format!("@{}", handle),
            _ => format!(
                "{} {}",
                self.first_name,
                self.last_name.as_deref().unwrap_or("")
            )
            .trim()
            .to_string(),
        }
    }
}

/// A member's status transition in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipChange {
    pub chat_id: i64,
    pub user: UserInfo,
    pub old_status: MemberStatus,
    pub new_status: MemberStatus,
    /// Unix timestamp the restriction expires at; 0 means never.
    pub until_timestamp: i64,
}

/// Rich-text annotation kinds the formatter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Code,
}

/// Formatting over `text[offset..offset + length]`, in UTF-16 code units
/// (the indexing Telegram reports).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub offset: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(kind: SpanKind, offset: usize, length: usize) -> Self {
        Self { kind, offset, length }
    }
}

/// One resolution of an uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub file_id: String,
    pub width: u32,
    pub height: u32,
}

/// A text, command or photo message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub user_id: u64,
    pub message_id: i32,
    pub text: Option<String>,
    pub spans: Vec<TextSpan>,
    pub photos: Vec<PhotoVariant>,
}

impl InboundMessage {
    /// Highest-resolution variant of the attached photo, if any.
    pub fn largest_photo(&self) -> Option<&PhotoVariant> {
        self.photos
            .iter()
            .max_by_key(|p| u64::from(p.width) * u64::from(p.height))
    }
}

/// An inline keyboard button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackAction {
    pub callback_id: String,
    pub chat_id: i64,
    pub user_id: u64,
    /// The message carrying the keyboard.
    pub message_id: i32,
    pub data: String,
}

/// Normalized inbound update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MembershipChange(MembershipChange),
    Message(InboundMessage),
    Callback(CallbackAction),
}

/// One fetched update. `event` is `None` for shapes the bot does not handle;
/// the cursor still advances past them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub update_id: u32,
    pub event: Option<Event>,
}

/// Inline keyboard button carrying an opaque action token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: String,
}

/// Ordered rows of ordered buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// One button per row.
    pub fn single_column<L, A>(buttons: impl IntoIterator<Item = (L, A)>) -> Self
    where
        L: Into<String>,
        A: Into<String>,
    {
        Self {
            rows: buttons
                .into_iter()
                .map(|(label, action)| {
                    vec![Button {
                        label: label.into(),
                        action: action.into(),
                    }]
                })
                .collect(),
        }
    }

    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.action.as_str())
    }
}

/// Bytes of a downloaded file plus the name the transport suggests for it.
#[derive(Debug, Clone)]
pub struct FetchedFile {
    pub bytes: Vec<u8>,
    pub name: String,
}

/// Transport used to receive events and emit responses.
///
/// Every outbound call returns `Ok(())` only when the transport acknowledged it.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Long-poll for updates after `cursor`, waiting at most `wait_secs`.
    async fn fetch_events(
        &self,
        cursor: Option<u32>,
        wait_secs: u32,
    ) -> Result<Vec<Delivery>, GatewayError>;

    /// Send an HTML message, optionally with an inline keyboard.
    async fn send_text(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError>;

    /// Upload a local image with an HTML caption.
    async fn send_photo(&self, chat_id: i64, image: &Path, caption: &str)
        -> Result<(), GatewayError>;

    /// Replace the text (and keyboard) of a message the bot sent earlier.
    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError>;

    /// Acknowledge a button press, optionally with a toast.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>)
        -> Result<(), GatewayError>;

    /// Live status lookup.
    async fn get_member_status(&self, chat_id: i64, user_id: u64)
        -> Result<MemberStatus, GatewayError>;

    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile, GatewayError>;
}
