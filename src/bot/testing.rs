//! Recording gateway double for handler and loop tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::dispatcher::AppState;
use super::gateway::{Delivery, FetchedFile, Gateway, Keyboard, MemberStatus};
use crate::database::{Customization, InMemorySettingsStore, SettingsPatch, SettingsStore};
use crate::error::{GatewayError, StoreError};
use crate::events::EventKind;
use crate::media::ImageStore;

/// State over `gateway` and a fresh in-memory store, with uploads under
/// `dir/images` and the fallback image expected at `dir/farewell.svg`.
pub fn test_state(gateway: Arc<MockGateway>, dir: &Path) -> AppState {
    test_state_with_store(gateway, Arc::new(InMemorySettingsStore::new()), dir)
}

/// Same as [`test_state`], over a caller-supplied store.
pub fn test_state_with_store(
    gateway: Arc<MockGateway>,
    settings: Arc<dyn SettingsStore>,
    dir: &Path,
) -> AppState {
    AppState::new(
        gateway,
        settings,
        ImageStore::new(dir.join("images")),
        dir.join("farewell.svg"),
        "yukira_bot".to_string(),
    )
}

/// One outbound call, as the gateway saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: i64,
        html: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        chat_id: i64,
        image: PathBuf,
        caption: String,
    },
    Edit {
        chat_id: i64,
        message_id: i32,
        html: String,
        keyboard: Option<Keyboard>,
    },
    Answer {
        callback_id: String,
        text: Option<String>,
    },
}

/// Scripted [`Gateway`].
///
/// Unknown members, unknown files and sends marked as rejected produce a
/// `Rejected` error. Once the
/// fetch script is exhausted, `drained` is notified and further fetches
/// never return.
#[derive(Default)]
pub struct MockGateway {
    sent: Mutex<Vec<Sent>>,
    statuses: Mutex<HashMap<(i64, u64), MemberStatus>>,
    rejected_photos: Mutex<HashSet<PathBuf>>,
    rejected_text_chats: Mutex<HashSet<i64>>,
    files: Mutex<HashMap<String, FetchedFile>>,
    script: Mutex<VecDeque<Result<Vec<Delivery>, GatewayError>>>,
    cursors: Mutex<Vec<Option<u32>>>,
    pub drained: Notify,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&self, chat_id: i64, user_id: u64, status: MemberStatus) {
        self.statuses.lock().insert((chat_id, user_id), status);
    }

    pub fn reject_photo(&self, image: impl Into<PathBuf>) {
        self.rejected_photos.lock().insert(image.into());
    }

    pub fn reject_text(&self, chat_id: i64) {
        self.rejected_text_chats.lock().insert(chat_id);
    }

    pub fn add_file(&self, file_id: &str, bytes: &[u8], name: &str) {
        self.files.lock().insert(
            file_id.to_string(),
            FetchedFile {
                bytes: bytes.to_vec(),
                name: name.to_string(),
            },
        );
    }

    pub fn push_batch(&self, batch: Vec<Delivery>) {
        self.script.lock().push_back(Ok(batch));
    }

    pub fn push_fetch_error(&self) {
        self.script
            .lock()
            .push_back(Err(GatewayError::Rejected("network down".to_string())));
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().clone()
    }

    pub fn clear_sent(&self) {
        self.sent.lock().clear();
    }

    /// Cursor passed to each `fetch_events` call, in order.
    pub fn cursors(&self) -> Vec<Option<u32>> {
        self.cursors.lock().clone()
    }

    fn record(&self, call: Sent) {
        self.sent.lock().push(call);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_events(
        &self,
        cursor: Option<u32>,
        _wait_secs: u32,
    ) -> Result<Vec<Delivery>, GatewayError> {
        self.cursors.lock().push(cursor);

        let next = self.script.lock().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.drained.notify_one();
                std::future::pending().await
            }
        }
    }

    async fn send_text(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError> {
        self.record(Sent::Text {
            chat_id,
            html: html.to_string(),
            keyboard: keyboard.cloned(),
        });

        if self.rejected_text_chats.lock().contains(&chat_id) {
            return Err(GatewayError::Rejected("chat not found".to_string()));
        }
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        image: &Path,
        caption: &str,
    ) -> Result<(), GatewayError> {
        self.record(Sent::Photo {
            chat_id,
            image: image.to_path_buf(),
            caption: caption.to_string(),
        });

        if self.rejected_photos.lock().contains(image) {
            return Err(GatewayError::Rejected("photo rejected".to_string()));
        }
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i32,
        html: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), GatewayError> {
        self.record(Sent::Edit {
            chat_id,
            message_id,
            html: html.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
    ) -> Result<(), GatewayError> {
        self.record(Sent::Answer {
            callback_id: callback_id.to_string(),
            text: text.map(String::from),
        });
        Ok(())
    }

    async fn get_member_status(
        &self,
        chat_id: i64,
        user_id: u64,
    ) -> Result<MemberStatus, GatewayError> {
        self.statuses
            .lock()
            .get(&(chat_id, user_id))
            .copied()
            .ok_or_else(|| GatewayError::Rejected("member not found".to_string()))
    }

    async fn fetch_file(&self, file_id: &str) -> Result<FetchedFile, GatewayError> {
        self.files
            .lock()
            .get(file_id)
            .cloned()
            .ok_or_else(|| GatewayError::Rejected("file not found".to_string()))
    }
}

/// Store whose every call fails, as if the database were unreachable.
#[derive(Default)]
pub struct FailingStore;

fn offline() -> StoreError {
    StoreError::Database(mongodb::error::Error::custom("database offline"))
}

#[async_trait]
impl SettingsStore for FailingStore {
    async fn get(&self, _chat_id: i64, _kind: EventKind) -> Result<Customization, StoreError> {
        Err(offline())
    }

    async fn set(
        &self,
        _chat_id: i64,
        _kind: EventKind,
        _patch: SettingsPatch,
    ) -> Result<Customization, StoreError> {
        Err(offline())
    }

    async fn reset(&self, _chat_id: i64) -> Result<u64, StoreError> {
        Err(offline())
    }

    async fn add_admin(&self, _chat_id: i64, _user_id: u64) -> Result<(), StoreError> {
        Err(offline())
    }

    async fn remove_admin(&self, _chat_id: i64, _user_id: u64) -> Result<(), StoreError> {
        Err(offline())
    }

    async fn is_admin(&self, _chat_id: i64, _user_id: u64) -> Result<bool, StoreError> {
        Err(offline())
    }
}
