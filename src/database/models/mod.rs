//! Database models.

pub mod admin_record;
pub mod chat_settings;

pub use admin_record::AdminRecord;
pub use chat_settings::{ChatSettings, Customization, SettingsPatch};
