//! LLM-backed crime response agent.
//!
//! This crate wires a chat model to the emergency tools and the
//! conversation history store. The [`CrimeAgent`] drives a tool-calling
//! loop over the model and reports progress through [`AgentUpdate`]s.

pub mod agent;
pub mod history;
pub mod llm;
pub mod prompts;
pub mod tools;

pub use agent::{AgentInvoker, AgentUpdate, CrimeAgent};
pub use history::{HistoryEntry, HistoryStore, MemoryHistoryStore};
pub use llm::LLMService;
pub use tools::AiTool;
