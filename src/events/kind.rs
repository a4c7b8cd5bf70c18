//! Farewell event kinds and their built-in templates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder replaced with the departing member's display name.
pub const NAME_PLACEHOLDER: &str = "{username}";

/// Why a member is no longer in the chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Leave,
    Kick,
    Ban,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Leave, EventKind::Kick, EventKind::Ban];

    /// Wire/storage name (`leave`, `kick`, `ban`).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Leave => "leave",
            EventKind::Kick => "kick",
            EventKind::Ban => "ban",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "leave" => Some(EventKind::Leave),
            "kick" => Some(EventKind::Kick),
            "ban" => Some(EventKind::Ban),
            _ => None,
        }
    }

    /// Capitalized name for menu titles.
    pub fn title(self) -> &'static str {
        match self {
            EventKind::Leave => "Leave",
            EventKind::Kick => "Kick",
            EventKind::Ban => "Ban",
        }
    }

    /// Built-in HTML template used when the chat has no custom one.
    pub fn default_template(self) -> &'static str {
        match self {
            EventKind::Leave => concat!(
                "<b>Awww… {username}, you're leaving?</b>\n\n",
                "Well, it was <i>cute</i> while it lasted. Byeee~ 💋\n\n",
                "I'm gonna miss you sooo much~ 💔 <i>(not really)</i>\n",
                "But don’t come back crawling and crying afterwards.😘"
            ),
            EventKind::Kick => concat!(
                "<b>Oh? {username} got the boot? 👢</b>\n\n",
                "Well, well, well... someone couldn’t behave~ 😏\n\n",
                "<u>Bye bye~</u>\n",
                "<b>You earned it, b*tch.</b> 😘\n",
                "<i>Teehee~ 💋</i>"
            ),
            EventKind::Ban => concat!(
                "<b>Ooopsie! Thehehe... {username} got banned?!</b> 😢\n\n",
                "I’m <i>devastated.</i> Truly.\n",
                "Like… I’m totally gonna cry about it later… maybe… not. 💅\n\n",
                "<i>Well, well... <u>that’s what happens when you don’t follow the rules~</u></i> 😤\n",
                "<b>Gonna miss you sooo much…</b>\n",
                "<i>Hihi~ 💋🖤</i> <b>no.</b> 😘💋"
            ),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
