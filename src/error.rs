//! Error types shared across the bot.
//!
//! Handlers return `anyhow::Result`; these typed errors are what the
//! gateway, the settings store and the image store report.

use thiserror::Error;

/// Failure talking to the messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("telegram request failed: {0}")]
    Transport(#[from] teloxide::RequestError),

    #[error("file download failed: {0}")]
    Download(#[from] teloxide::DownloadError),

    /// The gateway answered but did not acknowledge the request.
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Failure reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Failure writing an uploaded image to local storage.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("image storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("downloaded file is empty")]
    Empty,
}
