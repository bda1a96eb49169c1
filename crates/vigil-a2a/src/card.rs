//! A2A Agent Card
//!
//! The card is a JSON document describing an agent's capabilities. It is
//! served at `/.well-known/agent.json` so that other agents can discover
//! this one without authenticating.

use serde::{Deserialize, Serialize};

/// Describes this agent to other agents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Agent name (unique identifier within the orchestration system)
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Base URL the agent is reachable at
    pub url: String,
    /// Agent version
    pub version: String,
    /// Input content types accepted when a skill does not override them
    pub default_input_modes: Vec<String>,
    /// Output content types produced when a skill does not override them
    pub default_output_modes: Vec<String>,
    /// Transport features the agent supports
    pub capabilities: AgentCapabilities,
    /// Skills the agent offers
    pub skills: Vec<AgentSkill>,
}

/// Transport features advertised in the card
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    pub streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_transition_history: Option<bool>,
}

/// A skill this agent offers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Skill identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this skill does
    pub description: String,
    /// Keywords for discovery
    pub tags: Vec<String>,
    /// Example requests this skill handles
    pub examples: Vec<String>,
}
