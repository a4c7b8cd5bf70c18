//! Telegram implementation of the messaging gateway.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{
    AllowedUpdate, ChatMemberKind, InlineKeyboardButton, InlineKeyboardMarkup, InputFile,
    MessageEntity, MessageEntityKind, MessageId, ParseMode, UntilDate, Update, UpdateKind, User,
};
use tracing::debug;

use super::gateway::{
    CallbackAction, Delivery, Event, FetchedFile, Gateway, InboundMessage, Keyboard, MemberStatus,
    MembershipChange, PhotoVariant, SpanKind, TextSpan, UserInfo,
};
use crate::error::GatewayError;

/// Headroom on top of the long-poll wait before the HTTP client gives up.
const CLIENT_TIMEOUT_MARGIN_SECS: u64 = 10;

/// Gateway backed by the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: Bot,
}

impl TelegramGateway {
    /// Create a gateway whose HTTP client outlives a `poll_timeout_secs` long poll.
    pub fn new(token: &str, poll_timeout_secs: u32) -> anyhow::Result<Self> {
        let client = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(
                u64::from(poll_timeout_secs) + CLIENT_TIMEOUT_MARGIN_SECS,
            ))
            .build()?;

        Ok(Self {
            bot: Bot::with_client(token, client),
        })
    }

    /// Validate the credentials and return the bot's username.
    pub async fn connect(&self) -> anyhow::Result<String> {
        let me = self.bot.get_me().await?;
        Ok(me.username().to_string())
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn fetch_events(
        &self,
        cursor: Option<u32>,
        wait_secs: u32,
    ) -> Result<Vec<Delivery>, GatewayError> {
        let mut request = self.bot.get_updates().timeout(wait_secs).allowed_updates(vec![
            AllowedUpdate::ChatMember,
            AllowedUpdate::Message,
            AllowedUpdate::CallbackQuery,
        ]);
        if let Some(cursor) = cursor {
            request = request.offset(cursor as i32);
        }

        let updates = request.await?;
        Ok(updates.into_iter().map(to_delivery).collect())
    }

    async fn send_text(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError> {
        let mut request = self
            .bot
            .send_message(ChatId(chat_id), html)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        request.await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        image: &Path,
        caption: &str,
    ) -> Result<(), GatewayError> {
        self.bot
            .send_photo(ChatId(chat_id), InputFile::file(image.to_path_buf()))
            .caption(caption)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError> {
        let mut request = self
            .bot
            .edit_message_text(ChatId(chat_id), MessageId(message_id), html)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_markup(keyboard));
        }
        request.await?;
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        let mut request = self.bot.answer_callback_query(callback_id);
        if let Some(text) = text {
            request = request.text(text);
        }
        request.await?;
        Ok(())
    }

    async fn get_member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, GatewayError> {
        let member = self.bot.get_chat_member(ChatId(chat_id), UserId(user_id)).await?;
        Ok(member_status(&member.kind))
    }

    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile, GatewayError> {
        let file = self.bot.get_file(file_id).await?;

        let mut bytes = Vec::new();
        self.bot.download_file(&file.path, &mut bytes).await?;

        let name = file
            .path
            .rsplit('/')
            .next()
            .unwrap_or(file.path.as_str())
            .to_string();
        debug!("Downloaded {} ({} bytes)", name, bytes.len());

        Ok(FetchedFile { bytes, name })
    }
}

fn to_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.action.clone()))
            .collect::<Vec<_>>()
    }))
}

/// Normalize a raw update; unsupported shapes keep their id but carry no event.
fn to_delivery(update: Update) -> Delivery {
    Delivery {
        update_id: update.id.0,
        event: to_event(update.kind),
    }
}

fn to_event(kind: UpdateKind) -> Option<Event> {
    match kind {
        UpdateKind::ChatMember(change) => Some(Event::MembershipChange(MembershipChange {
            chat_id: change.chat.id.0,
            user: user_info(&change.old_chat_member.user),
            old_status: member_status(&change.old_chat_member.kind),
            new_status: member_status(&change.new_chat_member.kind),
            until_timestamp: until_timestamp(&change.new_chat_member.kind),
        })),
        UpdateKind::Message(msg) => {
            let user = msg.from.as_ref()?;
            Some(Event::Message(InboundMessage {
                chat_id: msg.chat.id.0,
                user_id: user.id.0,
                message_id: msg.id.0,
                text: msg.text().map(String::from),
                spans: msg
                    .entities()
                    .map(|entities| entities.iter().filter_map(text_span).collect())
                    .unwrap_or_default(),
                photos: msg
                    .photo()
                    .map(|sizes| {
                        sizes
                            .iter()
                            .map(|p| PhotoVariant {
                                file_id: p.file.id.clone(),
                                width: p.width,
                                height: p.height,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            }))
        }
        UpdateKind::CallbackQuery(query) => {
            let message = query.message.as_ref()?;
            Some(Event::Callback(CallbackAction {
                callback_id: query.id.clone(),
                chat_id: message.chat().id.0,
                user_id: query.from.id.0,
                message_id: message.id().0,
                data: query.data.clone()?,
            }))
        }
        _ => None,
    }
}

fn user_info(user: &User) -> UserInfo {
    UserInfo {
        id: user.id.0,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    match kind {
        ChatMemberKind::Owner(_) => MemberStatus::Creator,
        ChatMemberKind::Administrator(_) => MemberStatus::Administrator,
        ChatMemberKind::Restricted(restricted) => MemberStatus::Restricted {
            is_member: restricted.is_member,
        },
        ChatMemberKind::Left => MemberStatus::Left,
        ChatMemberKind::Banned(_) => MemberStatus::Kicked,
        _ => MemberStatus::Member,
    }
}

fn until_timestamp(kind: &ChatMemberKind) -> i64 {
    let until = match kind {
        ChatMemberKind::Banned(banned) => &banned.until_date,
        ChatMemberKind::Restricted(restricted) => &restricted.until_date,
        _ => return 0,
    };
    match until {
        UntilDate::Date(date) => date.timestamp(),
        UntilDate::Forever => 0,
    }
}

fn text_span(entity: &MessageEntity) -> Option<TextSpan> {
    let kind = match entity.kind {
        MessageEntityKind::Bold => SpanKind::Bold,
        MessageEntityKind::Italic => SpanKind::Italic,
        MessageEntityKind::Underline => SpanKind::Underline,
        MessageEntityKind::Strikethrough => SpanKind::Strikethrough,
        MessageEntityKind::Code => SpanKind::Code,
        _ => return None,
    };
    Some(TextSpan::new(kind, entity.offset, entity.length))
}
