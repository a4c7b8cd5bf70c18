//! Membership events.

pub mod classifier;
pub mod farewell;
pub mod kind;

pub use farewell::handle_membership_change;
pub use kind::EventKind;
