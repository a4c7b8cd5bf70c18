//! Command and callback handlers.

pub mod settings_menu;

use teloxide::utils::command::BotCommands;

use crate::bot::dispatcher::AppState;
use crate::bot::gateway::InboundMessage;

pub use settings_menu::handle_callback;

/// All bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Customize farewell messages and images")]
    Edit,
}

/// Accept only a bare command, optionally addressed to this bot.
/// The bot mention is case-insensitive; trailing arguments reject the command.
fn parse_command(text: &str, bot_username: &str) -> Option<Command> {
    let text = text.trim();
    if text.contains(char::is_whitespace) {
        return None;
    }
    Command::parse(text, bot_username).ok()
}

/// Route a text or photo message.
///
/// The settings command wins over a pending edit; otherwise the message
/// completes the sender's pending edit, if there is one.
pub async fn handle_message(state: &AppState, msg: &InboundMessage) -> anyhow::Result<()> {
    if let Some(Command::Edit) = msg
        .text
        .as_deref()
        .and_then(|text| parse_command(text, &state.bot_username))
    {
        return settings_menu::open_menu(state, msg.chat_id, msg.user_id).await;
    }

    match state.conversations.consume(msg.user_id) {
        Some(pending) => settings_menu::complete_pending(state, msg, pending).await,
        None => Ok(()),
    }
}
