//! Common constants used across Vigil

/// Default bind address for the agent service
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default port for the crime agent service
pub const DEFAULT_PORT: u16 = 8003;

/// Scope an M2M token must carry to reach the crime agent
pub const DEFAULT_REQUIRED_SCOPE: &str = "crime_agent";

/// Number of past conversation turns surfaced to the instruction prompt
pub const HISTORY_WINDOW: usize = 8;

/// Upper bound on tool-call round trips within one agent invocation
pub const MAX_TOOL_ITERATIONS: usize = 10;

/// Common model identifiers
pub mod models {
    // Anthropic models
    pub const CLAUDE_SONNET_4: &str = "claude-sonnet-4-20250514";
    pub const CLAUDE_3_7_SONNET: &str = "claude-3-7-sonnet-20250219";
}
