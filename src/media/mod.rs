//! Local storage for uploaded farewell images.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::MediaError;
use crate::events::EventKind;

/// Directory holding one image per (kind, chat, upload name).
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write `bytes` as `{kind}_{chat}_{name}` and return the path.
    ///
    /// The directory is created on first use. An existing file with the same
    /// name is overwritten.
    pub async fn save(
        &self,
        kind: EventKind,
        chat_id: i64,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name(kind, chat_id, original_name));
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored {} bytes at {}", bytes.len(), path.display());

        Ok(path)
    }
}

/// Whether a stored image reference still points at a file.
pub async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn file_name(kind: EventKind, chat_id: i64, original_name: &str) -> String {
    // Keep only the final component so a transport-suggested name can't escape the directory.
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("image.jpg");

    format!("{}_{}_{}", kind.as_str(), chat_id, base)
}
