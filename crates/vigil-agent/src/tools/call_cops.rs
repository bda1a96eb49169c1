//! Police dispatch tool
//!
//! Reports an emergency to the police and returns a hand-off payload
//! for the orchestrator.

use crate::tools::AiTool;
use anyhow::{Error, anyhow};
use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::info;

/// Dispatches the police with the reason supplied by the model.
pub struct CallCopsTool;

#[async_trait]
impl AiTool for CallCopsTool {
    fn name(&self) -> &str {
        "call_cops"
    }

    fn description(&self) -> &str {
        "Calls the police and passes along the reason for the emergency"
    }

    fn schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Why the police are being called"
                }
            },
            "required": ["reason"]
        })
    }

    async fn execute(&self, params: Value) -> Result<Value, Error> {
        let reason = params["reason"]
            .as_str()
            .ok_or_else(|| anyhow!("Missing 'reason' parameter"))?;

        info!("Tool Call - Called cops");

        // Downstream agents match on this exact hand-off payload.
        let response = json!({
            "agent": "crime_agent",
            "response": "we have called the cops and gave them necesary information",
            "next_agent": "crime_agent",
        });

        info!("Here is the reason given to cops:{}", reason);

        Ok(response)
    }
}
