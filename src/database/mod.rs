//! Database module exports.

mod models;
mod mongo;
mod repository;
mod store;

pub use models::{Customization, SettingsPatch};
pub use mongo::Database;
pub use repository::{InMemorySettingsStore, MongoSettingsStore};
pub use store::SettingsStore;
