//! Task event plumbing
//!
//! The executor publishes task lifecycle events onto an [`EventQueue`].
//! Request handlers consume them to build responses and SSE streams.

use crate::tasks::TaskStore;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use vigil_a2a::{Message, Task, TaskState, TaskStatus, TaskStatusUpdateEvent};
use vigil_common::Result;

/// A task lifecycle event.
#[derive(Debug, Clone)]
pub enum TaskEvent {
    /// A new task was created.
    Task(Task),

    /// A task changed status.
    StatusUpdate(TaskStatusUpdateEvent),
}

/// Sending half of a task event channel.
#[derive(Clone)]
pub struct EventQueue {
    sender: UnboundedSender<TaskEvent>,
}

impl EventQueue {
    pub fn new() -> (Self, UnboundedReceiver<TaskEvent>) {
        let (sender, receiver) = unbounded_channel();
        (EventQueue { sender }, receiver)
    }

    /// Publish an event. Dropped silently if the consumer hung up.
    pub fn enqueue(&self, event: TaskEvent) {
        let _ = self.sender.send(event);
    }
}

/// Applies status changes to a stored task and publishes the matching
/// update events.
pub struct TaskUpdater {
    queue: EventQueue,
    store: Arc<dyn TaskStore>,
    task_id: String,
    context_id: String,
}

impl TaskUpdater {
    pub fn new(
        queue: EventQueue,
        store: Arc<dyn TaskStore>,
        task_id: &str,
        context_id: &str,
    ) -> Self {
        TaskUpdater {
            queue,
            store,
            task_id: task_id.to_string(),
            context_id: context_id.to_string(),
        }
    }

    /// Move the task to `state`, record `message` in its history, and
    /// publish a status update. The update is final when `state` is
    /// terminal.
    pub async fn update_status(&self, state: TaskState, message: Message) -> Result<()> {
        let status = TaskStatus::with_message(state, message.clone());

        if let Some(mut task) = self.store.get(&self.task_id).await? {
            task.history.push(message);
            task.status = status.clone();
            self.store.save(task).await?;
        }

        self.queue.enqueue(TaskEvent::StatusUpdate(TaskStatusUpdateEvent::new(
            &self.task_id,
            &self.context_id,
            status,
            state.is_terminal(),
        )));
        Ok(())
    }
}
