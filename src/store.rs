//! Profile and chat history persistence
//!
//! The pipeline never touches storage; the server does, through these two
//! traits. File layout mirrors one directory per user:
//!
//! ```text
//! <root>/<user-key>/profile.json   - UserRecord
//! <root>/<user-key>/history.jsonl  - ChatTurn per line (append-only)
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::profile::UserRecord;

/// Number of turns returned alongside the profile
pub const RECENT_TURNS: usize = 10;

/// One question/answer exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub question: String,
    pub response: String,
    #[serde(default)]
    pub sutra_references: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn put(&self, record: UserRecord) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ChatHistory: Send + Sync {
    async fn append(&self, email: &str, turn: &ChatTurn) -> Result<(), StoreError>;
    /// Most recent `limit` turns, oldest first
    async fn recent(&self, email: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError>;
}

fn tail(mut turns: Vec<ChatTurn>, limit: usize) -> Vec<ChatTurn> {
    let skip = turns.len().saturating_sub(limit);
    turns.drain(..skip);
    turns
}

// ═══════════════════════════════════════════════════════════════
// IN-MEMORY
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct MemoryStore {
    profiles: RwLock<HashMap<String, UserRecord>>,
    history: RwLock<HashMap<String, Vec<ChatTurn>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.profiles.read().await.get(email).cloned())
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        self.profiles
            .write()
            .await
            .insert(record.email.clone(), record);
        Ok(())
    }
}

#[async_trait]
impl ChatHistory for MemoryStore {
    async fn append(&self, email: &str, turn: &ChatTurn) -> Result<(), StoreError> {
        self.history
            .write()
            .await
            .entry(email.to_string())
            .or_default()
            .push(turn.clone());
        Ok(())
    }

    async fn recent(&self, email: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let turns = self
            .history
            .read()
            .await
            .get(email)
            .cloned()
            .unwrap_or_default();
        Ok(tail(turns, limit))
    }
}

// ═══════════════════════════════════════════════════════════════
// FILE-BACKED
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn user_dir(&self, email: &str) -> PathBuf {
        self.root.join(user_key(email))
    }
}

/// Filesystem-safe directory name for a user. Bytes outside `[a-z0-9.-]`
/// (including `%`) are percent-encoded, so distinct emails never share a
/// directory. Always prefixed so a key can never be "." or "..".
fn user_key(email: &str) -> String {
    let mut key = String::from("user-");
    for b in email.trim().to_lowercase().bytes() {
        if b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-' {
            key.push(b as char);
        } else {
            key.push_str(&format!("%{:02X}", b));
        }
    }
    key
}

fn same_user(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[async_trait]
impl ProfileStore for FileStore {
    async fn get(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let path = self.user_dir(email).join("profile.json");
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let record: UserRecord = serde_json::from_str(&content)?;
                if !same_user(&record.email, email) {
                    tracing::warn!(path = %path.display(), "profile belongs to another user");
                    return Ok(None);
                }
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        let dir = self.user_dir(&record.email);
        tokio::fs::create_dir_all(&dir).await?;
        let content = serde_json::to_string_pretty(&record)?;
        tokio::fs::write(dir.join("profile.json"), content).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatHistory for FileStore {
    async fn append(&self, email: &str, turn: &ChatTurn) -> Result<(), StoreError> {
        let dir = self.user_dir(email);
        tokio::fs::create_dir_all(&dir).await?;

        let mut line = serde_json::to_string(turn)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("history.jsonl"))
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn recent(&self, email: &str, limit: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let path = self.user_dir(email).join("history.jsonl");
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // Skip lines that fail to parse (partial writes)
        let turns = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
        Ok(tail(turns, limit))
    }
}
