//! Departure classification.
//!
//! Telegram reports both temporary kicks and permanent bans as `kicked`;
//! the restriction expiry is the only thing telling them apart.

use super::kind::EventKind;
use crate::bot::gateway::MemberStatus;

/// Expiry values above this are treated as "never expires".
const MAX_TIMESTAMP: i64 = i32::MAX as i64;

/// Map a membership transition to the farewell it should trigger.
///
/// Returns `None` unless the user was actually in the chat before
/// (member, administrator or creator) and is no longer in it now.
pub fn classify(old: MemberStatus, new: MemberStatus, until_timestamp: i64) -> Option<EventKind> {
    if !old.is_present() {
        return None;
    }

    match new {
        MemberStatus::Left => Some(EventKind::Leave),
        MemberStatus::Kicked if until_timestamp == 0 || until_timestamp > MAX_TIMESTAMP => {
            Some(EventKind::Ban)
        }
        MemberStatus::Kicked => Some(EventKind::Kick),
        status if status.is_terminal() => Some(EventKind::Kick),
        _ => None,
    }
}
