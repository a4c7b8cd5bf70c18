//! Bot module - Core bot functionality.

pub mod dispatcher;
pub mod gateway;
mod runtime;
pub mod telegram;

#[cfg(test)]
pub mod testing;

pub use dispatcher::AppState;
pub use runtime::{run, PollSettings};
