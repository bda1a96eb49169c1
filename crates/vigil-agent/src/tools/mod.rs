//! Tools available to the crime agent
//!
//! Tools are implemented as traits that can be registered with an LLM
//! service. The model decides when to call them during a conversation.

pub mod call_cops;

use anyhow::Error;
use async_trait::async_trait;
use serde_json::Value;

pub use call_cops::CallCopsTool;

/// A tool that can be used by an AI assistant
#[async_trait]
pub trait AiTool: Send + Sync {
    /// The name of the tool
    fn name(&self) -> &str;

    /// A description of what the tool does
    fn description(&self) -> &str;

    /// The JSON schema for the tool's parameters
    fn schema(&self) -> Value;

    /// Execute the tool with the given parameters
    async fn execute(&self, params: Value) -> Result<Value, Error>;

    /// Convert to a genai Tool
    fn to_genai_tool(&self) -> genai::chat::Tool {
        genai::chat::Tool::new(self.name())
            .with_description(self.description())
            .with_schema(self.schema())
    }
}
