//! A2A messages and their content parts

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

/// One content part of a message
///
/// Only text parts are produced and consumed here; the `kind` tag keeps the
/// wire shape open for other part types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Text { text: String },
}

fn message_kind() -> String {
    "message".to_string()
}

/// A single conversational message on the A2A wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default = "message_kind")]
    pub kind: String,
}

impl Message {
    /// Concatenated text content of all text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build an agent-authored text message tied to a task
pub fn new_agent_text_message(
    text: impl Into<String>,
    context_id: Option<String>,
    task_id: Option<String>,
) -> Message {
    Message {
        role: Role::Agent,
        parts: vec![Part::Text { text: text.into() }],
        message_id: Uuid::new_v4().to_string(),
        task_id,
        context_id,
        metadata: None,
        kind: message_kind(),
    }
}
