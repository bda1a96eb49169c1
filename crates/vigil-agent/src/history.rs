//! Conversation history storage
//!
//! Each context keeps an ordered list of conversation turns. The agent
//! reads a bounded window of recent turns when building its prompt and
//! appends both sides of a completed exchange.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vigil_common::Result;

/// One stored conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who spoke, "user" or "agent".
    pub role: String,

    /// What was said.
    pub content: String,

    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        HistoryEntry {
            role: role.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Storage for per-context conversation history.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append a turn to a context's history.
    async fn append(&self, context_id: &str, entry: HistoryEntry) -> Result<()>;

    /// Fetch up to the last `n` turns for a context, oldest first.
    async fn fetch_last_n(&self, context_id: &str, n: usize) -> Result<Vec<HistoryEntry>>;
}

/// In-memory history store backed by a per-context map.
pub struct MemoryHistoryStore {
    entries: Arc<RwLock<HashMap<String, Vec<HistoryEntry>>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        MemoryHistoryStore {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, context_id: &str, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries
            .entry(context_id.to_string())
            .or_default()
            .push(entry);
        Ok(())
    }

    async fn fetch_last_n(&self, context_id: &str, n: usize) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.read().await;
        let turns = match entries.get(context_id) {
            Some(turns) => turns,
            None => return Ok(Vec::new()),
        };
        let start = turns.len().saturating_sub(n);
        Ok(turns[start..].to_vec())
    }
}
