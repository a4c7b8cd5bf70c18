//! Per-user pending edit tracking.

use std::sync::Arc;

use dashmap::DashMap;

use crate::events::EventKind;

/// What kind of input the bot is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Photo,
}

/// An edit the user started from the settings menu and has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    /// Chat whose settings the edit applies to.
    pub chat_id: i64,
    pub kind: EventKind,
    pub mode: InputMode,
}

/// At most one pending edit per user, shared across handler tasks.
///
/// Lost on restart.
#[derive(Clone, Default)]
pub struct ConversationStore {
    pending: Arc<DashMap<u64, PendingEdit>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for input from `user_id`. Replaces any earlier edit and returns it.
    pub fn begin(
        &self,
        user_id: u64,
        chat_id: i64,
        kind: EventKind,
        mode: InputMode,
    ) -> Option<PendingEdit> {
        self.pending
            .insert(user_id, PendingEdit { chat_id, kind, mode })
    }

    /// Take the pending edit, leaving the user idle.
    pub fn consume(&self, user_id: u64) -> Option<PendingEdit> {
        self.pending.remove(&user_id).map(|(_, edit)| edit)
    }

    #[cfg(test)]
    pub fn peek(&self, user_id: u64) -> Option<PendingEdit> {
        self.pending.get(&user_id).map(|entry| *entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_consume_once() {
        let store = ConversationStore::new();
        assert!(store.begin(7, -100, EventKind::Leave, InputMode::Text).is_none());

        let edit = store.consume(7).unwrap();
        assert_eq!(edit.chat_id, -100);
        assert_eq!(edit.kind, EventKind::Leave);
        assert_eq!(edit.mode, InputMode::Text);

        assert!(store.consume(7).is_none());
    }

    #[test]
    fn later_edit_replaces_earlier() {
        let store = ConversationStore::new();
        store.begin(7, -100, EventKind::Leave, InputMode::Text);
        let previous = store.begin(7, -100, EventKind::Ban, InputMode::Photo);

        assert_eq!(previous.map(|e| e.kind), Some(EventKind::Leave));
        assert_eq!(
            store.peek(7),
            Some(PendingEdit {
                chat_id: -100,
                kind: EventKind::Ban,
                mode: InputMode::Photo
            })
        );
    }

    #[test]
    fn users_are_independent() {
        let store = ConversationStore::new();
        let shared = store.clone();
        store.begin(1, -100, EventKind::Kick, InputMode::Text);

        assert!(shared.peek(1).is_some());
        assert!(shared.peek(2).is_none());
    }
}
