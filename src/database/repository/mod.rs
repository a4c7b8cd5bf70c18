//! Settings store backends.

mod memory_repository;
mod settings_repository;

pub use memory_repository::InMemorySettingsStore;
pub use settings_repository::MongoSettingsStore;
