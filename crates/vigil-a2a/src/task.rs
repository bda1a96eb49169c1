//! Task lifecycle types for the A2A surface
//!
//! A task tracks one unit of agent work across messages. Status updates are
//! streamed to clients as [`TaskStatusUpdateEvent`]s while the task runs.

use crate::message::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states a task moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Submitted,
    Working,
    InputRequired,
    Completed,
    Canceled,
    Failed,
    Rejected,
    AuthRequired,
    Unknown,
}

impl TaskState {
    /// Whether this state ends the task
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Canceled | TaskState::Failed | TaskState::Rejected
        )
    }
}

/// Current status of a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    pub timestamp: DateTime<Utc>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        TaskStatus {
            state,
            message: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_message(state: TaskState, message: Message) -> Self {
        TaskStatus {
            state,
            message: Some(message),
            timestamp: Utc::now(),
        }
    }
}

fn task_kind() -> String {
    "task".to_string()
}

/// A unit of agent work tracked across messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub context_id: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,
    #[serde(default = "task_kind")]
    pub kind: String,
}

/// Create a submitted task from an inbound message
///
/// Task and context ids come from the message when present, otherwise fresh
/// ones are generated. The triggering message seeds the task history.
pub fn new_task(message: &Message) -> Task {
    let id = message
        .task_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let context_id = message
        .context_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    Task {
        id,
        context_id,
        status: TaskStatus::new(TaskState::Submitted),
        history: vec![message.clone()],
        kind: task_kind(),
    }
}

fn status_update_kind() -> String {
    "status-update".to_string()
}

/// Status change notification emitted while a task runs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusUpdateEvent {
    pub task_id: String,
    pub context_id: String,
    pub status: TaskStatus,
    pub r#final: bool,
    #[serde(default = "status_update_kind")]
    pub kind: String,
}

impl TaskStatusUpdateEvent {
    pub fn new(task_id: &str, context_id: &str, status: TaskStatus, r#final: bool) -> Self {
        TaskStatusUpdateEvent {
            task_id: task_id.to_string(),
            context_id: context_id.to_string(),
            status,
            r#final,
            kind: status_update_kind(),
        }
    }
}
