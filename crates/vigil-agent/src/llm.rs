//! LLM service for interacting with chat models
//!
//! Wraps the genai client with tool registration and a single-shot
//! response API. Tool-calling iteration lives in [`crate::agent`].

use crate::tools::AiTool;
use anyhow::{Error, anyhow};
use async_trait::async_trait;
use genai::Client as GenaiClient;
use genai::chat::{ChatMessage as GenaiChatMessage, MessageContent, Tool};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A single turn in a model conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
    },
    Tool {
        tool_name: String,
        content: String,
        call_id: Option<String>,
    },
}

impl ChatMessage {
    pub fn to_genai(&self) -> GenaiChatMessage {
        match self {
            ChatMessage::System { content } => GenaiChatMessage::system(content),
            ChatMessage::User { content } => GenaiChatMessage::user(content),
            ChatMessage::Assistant { content } => GenaiChatMessage::assistant(content),
            ChatMessage::Tool { content, .. } => {
                // genai has no dedicated tool-result constructor yet
                GenaiChatMessage::assistant(format!("Tool result: {}", content))
            }
        }
    }
}

/// A trait for AI services that can generate responses
#[async_trait]
pub trait AiService: Send + Sync {
    /// Generate a response to a conversation
    async fn generate_response(&self, messages: &[ChatMessage]) -> anyhow::Result<MessageContent>;
}

/// A service for interacting with LLMs
pub struct LLMService {
    /// System prompt to use for context
    system_prompt: Option<String>,

    /// Available tools
    pub tools: Vec<Box<dyn AiTool>>,

    /// Model to use
    model: String,

    /// Underlying client for the LLM
    client: GenaiClient,
}

impl LLMService {
    /// Create a new LLM service
    pub fn new(
        system_prompt: Option<&str>,
        tools: Vec<Box<dyn AiTool>>,
        model: &str,
    ) -> Result<Self, Error> {
        let client = GenaiClient::builder()
            .with_chat_options(genai::chat::ChatOptions {
                capture_content: Some(true),
                capture_reasoning_content: Some(true),
                capture_tool_calls: Some(true),
                capture_usage: Some(true),
                ..Default::default()
            })
            .build();

        Ok(LLMService {
            model: model.to_string(),
            client,
            system_prompt: system_prompt.map(|s| s.to_string()),
            tools,
        })
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Find a tool by name
    pub fn find_tool(&self, tool_name: &str) -> Option<&dyn AiTool> {
        self.tools
            .iter()
            .find(|t| t.name() == tool_name)
            .map(|b| b.as_ref())
    }

    /// Convert tools to genai Tool format
    pub fn get_genai_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| {
                Tool::new(tool.name())
                    .with_description(tool.description())
                    .with_schema(tool.schema())
            })
            .collect()
    }
}

#[async_trait]
impl AiService for LLMService {
    async fn generate_response(&self, messages: &[ChatMessage]) -> anyhow::Result<MessageContent> {
        debug!("Generating response for {} messages", messages.len());
        debug!("LLM service has {} tools available", self.tools.len());

        let genai_messages: Vec<GenaiChatMessage> =
            messages.iter().map(|msg| msg.to_genai()).collect();

        let mut chat_req = genai::chat::ChatRequest::new(genai_messages);

        if !self.tools.is_empty() {
            chat_req = chat_req.with_tools(self.get_genai_tools());
        }

        // Only inject the configured system prompt when the conversation
        // does not already carry one.
        if let Some(prompt) = &self.system_prompt {
            let has_system = messages
                .iter()
                .any(|msg| matches!(msg, ChatMessage::System { .. }));
            if !has_system {
                chat_req = chat_req.with_system(prompt.clone());
            }
        }

        debug!("Executing chat request to model: {}", self.model);

        let response = self
            .client
            .exec_chat(&self.model, chat_req, None)
            .await
            .map_err(|e| anyhow!("GenAI API error: {}", e))?;

        debug!(
            "Response received with {} content items",
            response.content.len()
        );
        if let Some(content) = response.content.first() {
            match content {
                MessageContent::Text(text) => {
                    info!("LLM returned text response: {}", text);
                }
                MessageContent::ToolCalls(calls) => {
                    info!("LLM returned {} tool calls", calls.len());
                    for call in calls {
                        debug!(
                            "Tool call: name='{}', id='{}', args={:?}",
                            call.fn_name, call.call_id, call.fn_arguments
                        );
                    }
                }
                MessageContent::Parts(parts) => {
                    info!("LLM returned {} parts", parts.len());
                }
                MessageContent::ToolResponses(responses) => {
                    info!("LLM returned {} tool responses", responses.len());
                }
            }
        }

        response
            .content
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("No content in chat response"))
    }
}
