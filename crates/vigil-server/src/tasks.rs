//! Task storage
//!
//! Tasks survive across requests so clients can poll them by id after
//! the triggering request has returned.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use vigil_a2a::Task;
use vigil_common::Result;

/// Storage for A2A tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Look up a task by id.
    async fn get(&self, task_id: &str) -> Result<Option<Task>>;

    /// Insert or replace a task.
    async fn save(&self, task: Task) -> Result<()>;
}

/// In-memory task store backed by a map.
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        InMemoryTaskStore {
            tasks: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get(&self, task_id: &str) -> Result<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(task_id).cloned())
    }

    async fn save(&self, task: Task) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task);
        Ok(())
    }
}
