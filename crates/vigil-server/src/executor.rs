//! Agent execution
//!
//! Bridges inbound A2A requests to the crime agent: builds the payload,
//! tracks the task through the store, and translates agent progress into
//! task status updates.

use crate::events::{EventQueue, TaskEvent, TaskUpdater};
use crate::tasks::TaskStore;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use vigil_a2a::{Message, Task, TaskState, new_agent_text_message, new_task};
use vigil_agent::{AgentInvoker, AgentUpdate};
use vigil_common::{Result, VigilError};

/// What a request hands to the executor.
pub struct RequestContext {
    /// The inbound message.
    pub message: Message,

    /// The task the message refers to, when it names an existing one.
    pub task: Option<Task>,
}

/// Executes agent work for inbound requests.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    /// Run the agent for a request, publishing progress on `queue`.
    async fn execute(&self, context: RequestContext, queue: EventQueue) -> Result<()>;

    /// Cancel a running task.
    async fn cancel(&self, task_id: &str) -> Result<()>;
}

/// Drives the crime agent and reports task status transitions.
pub struct CrimeAgentExecutor {
    agent: Arc<dyn AgentInvoker>,
    store: Arc<dyn TaskStore>,
}

impl CrimeAgentExecutor {
    pub fn new(agent: Arc<dyn AgentInvoker>, store: Arc<dyn TaskStore>) -> Self {
        CrimeAgentExecutor { agent, store }
    }
}

#[async_trait]
impl AgentExecutor for CrimeAgentExecutor {
    async fn execute(&self, context: RequestContext, queue: EventQueue) -> Result<()> {
        let message = &context.message;
        let user_id = message
            .metadata
            .as_ref()
            .and_then(|m| m.get("user_id"))
            .and_then(|v| v.as_str());
        let role = message.role.as_str();
        let query = message.text();

        let payload = serde_json::json!({
            "user": user_id,
            "role": role,
            "msg": query,
        })
        .to_string();
        info!("Payload:{}", payload);

        let task = match context.task {
            Some(task) => task,
            None => {
                let task = new_task(message);
                self.store.save(task.clone()).await?;
                queue.enqueue(TaskEvent::Task(task.clone()));
                task
            }
        };

        let updater = TaskUpdater::new(
            queue.clone(),
            self.store.clone(),
            &task.id,
            &task.context_id,
        );

        let (tx, mut rx) = unbounded_channel();
        let agent = self.agent.clone();
        let agent_payload = payload.clone();
        let context_id = task.context_id.clone();
        let handle =
            tokio::spawn(async move { agent.invoke(&agent_payload, &context_id, tx).await });

        while let Some(update) = rx.recv().await {
            match update {
                AgentUpdate::Working { message } => {
                    updater
                        .update_status(
                            TaskState::Working,
                            new_agent_text_message(
                                &message,
                                Some(task.context_id.clone()),
                                Some(task.id.clone()),
                            ),
                        )
                        .await?;
                }
                AgentUpdate::Completed { content } => {
                    info!("Agent Response:{}", content);
                    updater
                        .update_status(
                            TaskState::Completed,
                            new_agent_text_message(
                                &content,
                                Some(task.context_id.clone()),
                                Some(task.id.clone()),
                            ),
                        )
                        .await?;
                    break;
                }
            }
        }

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow::anyhow!("agent task panicked: {}", e)),
        };

        if let Err(e) = result {
            let error_message = format!("Crime emergency error: {}", e);
            updater
                .update_status(
                    TaskState::Failed,
                    new_agent_text_message(
                        &error_message,
                        Some(task.context_id.clone()),
                        Some(task.id.clone()),
                    ),
                )
                .await?;
            return Err(VigilError::Agent(error_message));
        }

        Ok(())
    }

    async fn cancel(&self, _task_id: &str) -> Result<()> {
        Err(VigilError::Task("cancel is not supported".to_string()))
    }
}
