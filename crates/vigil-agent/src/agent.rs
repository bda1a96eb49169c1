//! Crime response agent
//!
//! Parses the orchestrator payload, assembles the prompt from recent
//! history, and drives the tool-calling loop until the model produces
//! a final answer.

use crate::history::{HistoryEntry, HistoryStore};
use crate::llm::{AiService, ChatMessage, LLMService};
use crate::prompts;
use crate::tools::{AiTool, CallCopsTool};
use anyhow::{Error, anyhow};
use async_trait::async_trait;
use genai::chat::{ContentPart, MessageContent};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};
use vigil_common::{HISTORY_WINDOW, MAX_TOOL_ITERATIONS};

/// Progress reported by an agent while it works on a query.
#[derive(Debug, Clone)]
pub enum AgentUpdate {
    /// The agent is still working on the query.
    Working { message: String },

    /// The agent produced its final answer.
    Completed { content: String },
}

/// Orchestrator payload carried in the message text.
#[derive(Debug, Deserialize)]
struct InvokePayload {
    user: Option<String>,
    role: Option<String>,
    msg: Option<String>,
}

/// Split the raw query into (user, role, message text).
///
/// Non-JSON input is treated as the message itself.
fn parse_payload(query: &str) -> (Option<String>, String, String) {
    match serde_json::from_str::<InvokePayload>(query) {
        Ok(payload) => {
            let role = payload.role.unwrap_or_else(|| "user".to_string());
            let msg = payload.msg.unwrap_or_else(|| query.to_string());
            (payload.user, role, msg)
        }
        Err(_) => (None, "user".to_string(), query.to_string()),
    }
}

/// Agents that can be driven by the task executor.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    /// Process a query for a context, reporting progress on `updates`.
    async fn invoke(
        &self,
        query: &str,
        context_id: &str,
        updates: UnboundedSender<AgentUpdate>,
    ) -> anyhow::Result<()>;
}

/// Crime emergency and complaint agent.
pub struct CrimeAgent {
    llm: LLMService,
    history: Arc<dyn HistoryStore>,
}

impl CrimeAgent {
    /// Create the agent with its emergency tools registered.
    pub fn new(model: &str, history: Arc<dyn HistoryStore>) -> Result<Self, Error> {
        let tools: Vec<Box<dyn AiTool>> = vec![Box::new(CallCopsTool)];
        let llm = LLMService::new(None, tools, model)?;
        info!("{} ready with tools: {:?}", prompts::NAME, llm.list_tools());
        Ok(CrimeAgent { llm, history })
    }

    /// Run the model until it produces text, executing tool calls along
    /// the way.
    async fn run_tool_loop(&self, mut messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        let mut iteration_count = 0;

        loop {
            iteration_count += 1;
            if iteration_count > MAX_TOOL_ITERATIONS {
                return Err(anyhow!("Maximum tool execution iterations reached"));
            }

            debug!(
                "Tool loop iteration {}, conversation has {} messages",
                iteration_count,
                messages.len()
            );

            match self.llm.generate_response(&messages).await? {
                MessageContent::ToolCalls(tool_calls) => {
                    messages.push(ChatMessage::Assistant {
                        content: "Tool calls requested".to_string(),
                    });

                    for tool_call in tool_calls {
                        let tool_name = &tool_call.fn_name;
                        debug!(
                            "Executing tool: {} with args: {:?}",
                            tool_name, tool_call.fn_arguments
                        );

                        let tool_result = if let Some(tool) = self.llm.find_tool(tool_name) {
                            match tool.execute(tool_call.fn_arguments.clone()).await {
                                Ok(result) => result.to_string(),
                                Err(e) => format!("Error executing tool {}: {}", tool_name, e),
                            }
                        } else {
                            format!(
                                "Tool '{}' not found. Available tools: {:?}",
                                tool_name,
                                self.llm.list_tools()
                            )
                        };

                        messages.push(ChatMessage::Tool {
                            tool_name: tool_name.clone(),
                            content: tool_result,
                            call_id: Some(tool_call.call_id.clone()),
                        });
                    }
                }
                MessageContent::Text(text) => return Ok(text),
                MessageContent::Parts(parts) => {
                    let combined_text = parts
                        .into_iter()
                        .filter_map(|part| match part {
                            ContentPart::Text(text) => Some(text),
                            _ => None,
                        })
                        .collect::<Vec<_>>()
                        .join(" ");
                    if combined_text.is_empty() {
                        return Err(anyhow!("Model returned no usable text"));
                    }
                    return Ok(combined_text);
                }
                MessageContent::ToolResponses(_) => {
                    return Err(anyhow!("Unexpected tool responses from model"));
                }
            }
        }
    }
}

#[async_trait]
impl AgentInvoker for CrimeAgent {
    async fn invoke(
        &self,
        query: &str,
        context_id: &str,
        updates: UnboundedSender<AgentUpdate>,
    ) -> anyhow::Result<()> {
        let (user_id, role, user_query) = parse_payload(query);
        info!(
            "Invoke: user={:?}, context={}, role={}, query={}",
            user_id, context_id, role, user_query
        );

        // The receiver may hang up once it has what it needs.
        let _ = updates.send(AgentUpdate::Working {
            message: "Crime Agent is assessing the emergency...".to_string(),
        });

        let history = self
            .history
            .fetch_last_n(context_id, HISTORY_WINDOW)
            .await?;
        info!("Fetch Conversation History:{:?}", history);

        let instruction = prompts::render_instruction(&history);
        let messages = vec![
            ChatMessage::System {
                content: instruction,
            },
            ChatMessage::User {
                content: user_query.clone(),
            },
        ];

        let content = self.run_tool_loop(messages).await?;

        self.history
            .append(context_id, HistoryEntry::new(role, user_query))
            .await?;
        self.history
            .append(context_id, HistoryEntry::new("agent", content.clone()))
            .await?;

        info!("Answer received from the agent");
        let _ = updates.send(AgentUpdate::Completed { content });

        Ok(())
    }
}
