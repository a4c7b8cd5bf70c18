//! Permission checks for the settings menu.
//!
//! ```rust,ignore
//! let perms = Permissions::new(gateway.clone(), store.clone());
//!
//! if perms.can_manage_settings(chat_id, user_id).await {
//!     // show the menu
//! }
//! ```

mod checker;

pub use checker::Permissions;
