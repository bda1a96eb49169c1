//! Vigil A2A - wire types for the agent-to-agent protocol
//!
//! This crate defines the data model of the A2A surface: the agent card
//! served at `/.well-known/agent.json`, the messages and tasks exchanged
//! over JSON-RPC, and the status update events streamed while a task runs.

pub mod card;
pub mod message;
pub mod rpc;
pub mod task;

// Re-export commonly used items
pub use card::{AgentCapabilities, AgentCard, AgentSkill};
pub use message::{Message, Part, Role, new_agent_text_message};
pub use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MessageSendParams, TaskIdParams};
pub use task::{Task, TaskState, TaskStatus, TaskStatusUpdateEvent, new_task};
