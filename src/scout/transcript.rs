//! Chat transcript persistence.
//!
//! The scout keeps a rolling transcript of the most recent messages. Storage
//! is best-effort: a missing or corrupt transcript never affects replies.

use crate::models::{ChatReply, RunCard};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

/// Number of messages kept when saving.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// File name of the transcript inside the data directory.
pub const TRANSCRIPT_FILE: &str = "hotspot_chat_history.json";

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<RunCard>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            from: Sender::User,
            text: text.into(),
            cards: Vec::new(),
            sent_at: Some(Utc::now()),
        }
    }

    pub fn ai(reply: ChatReply) -> Self {
        Self {
            from: Sender::Ai,
            text: reply.text,
            cards: reply.cards,
            sent_at: Some(Utc::now()),
        }
    }

    /// The message shown before any conversation has happened.
    pub fn greeting() -> Self {
        Self {
            from: Sender::Ai,
            text: "Hi! I am your campus-run scout. Ask about hotspots or drop points.".to_string(),
            cards: Vec::new(),
            sent_at: None,
        }
    }
}

/// Transcript storage failures. Callers treat these as advisory.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transcript I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("transcript is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("transcript store is unavailable")]
    Unavailable,
}

/// Swappable transcript storage.
pub trait TranscriptStore {
    /// Load the stored messages. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, StoreError>;

    /// Replace the stored messages.
    fn save(&self, records: &[ChatMessage]) -> Result<(), StoreError>;
}

/// Most recent `limit` messages, in original order.
pub fn trim_history(records: &[ChatMessage], limit: usize) -> &[ChatMessage] {
    &records[records.len().saturating_sub(limit)..]
}

/// JSON file transcript store.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    path: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `~/.brickyard/hotspot_chat_history.json`, or the
    /// current directory when no home directory is known.
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(".brickyard").join(TRANSCRIPT_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TranscriptStore for FileTranscriptStore {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;

        let records: Vec<ChatMessage> = serde_json::from_str(&content)?;
        Ok(Some(records))
    }

    fn save(&self, records: &[ChatMessage]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(records)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// In-memory transcript store.
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    records: Mutex<Option<Vec<ChatMessage>>>,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TranscriptStore for MemoryTranscriptStore {
    fn load(&self) -> Result<Option<Vec<ChatMessage>>, StoreError> {
        let guard = self.records.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(guard.clone())
    }

    fn save(&self, records: &[ChatMessage]) -> Result<(), StoreError> {
        let mut guard = self.records.lock().map_err(|_| StoreError::Unavailable)?;
        *guard = Some(records.to_vec());
        Ok(())
    }
}

/// Load the most recent `limit` messages, falling back to the greeting when
/// nothing usable is stored.
pub fn load_or_greet(store: &dyn TranscriptStore, limit: usize) -> Vec<ChatMessage> {
    match store.load() {
        Ok(Some(records)) if !records.is_empty() => trim_history(&records, limit).to_vec(),
        Ok(_) => vec![ChatMessage::greeting()],
        Err(e) => {
            debug!("Ignoring transcript read failure: {}", e);
            vec![ChatMessage::greeting()]
        }
    }
}

/// Save the most recent `limit` messages, ignoring failures.
pub fn save_quietly(store: &dyn TranscriptStore, records: &[ChatMessage], limit: usize) {
    if let Err(e) = store.save(trim_history(records, limit)) {
        debug!("Ignoring transcript write failure: {}", e);
    }
}
