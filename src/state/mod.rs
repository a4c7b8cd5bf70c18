//! In-memory conversation state.

mod conversation;

pub use conversation::{ConversationStore, InputMode, PendingEdit};
