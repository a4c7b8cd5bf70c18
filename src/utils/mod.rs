//! Utility functions.

pub mod formatter;

pub use formatter::format_entities;

/// Escape text for Telegram HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
