//! Vigil Common Error Types
//!
//! Centralized error handling for all Vigil components

use std::fmt;

/// Main error type for Vigil operations
#[derive(Debug)]
pub enum VigilError {
    /// Generic error with message
    Generic(String),
    /// IO-related errors
    Io(std::io::Error),
    /// Serialization/deserialization errors
    Serde(serde_json::Error),
    /// Configuration errors
    Config(String),
    /// Agent/LLM related errors
    Agent(String),
    /// Task lifecycle errors
    Task(String),
    /// Conversation history errors
    History(String),
}

impl fmt::Display for VigilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VigilError::Generic(msg) => write!(f, "Vigil error: {}", msg),
            VigilError::Io(err) => write!(f, "IO error: {}", err),
            VigilError::Serde(err) => write!(f, "Serialization error: {}", err),
            VigilError::Config(msg) => write!(f, "Configuration error: {}", msg),
            VigilError::Agent(msg) => write!(f, "Agent error: {}", msg),
            VigilError::Task(msg) => write!(f, "Task error: {}", msg),
            VigilError::History(msg) => write!(f, "History error: {}", msg),
        }
    }
}

impl std::error::Error for VigilError {}

/// Convenience result type for Vigil operations
pub type Result<T> = std::result::Result<T, VigilError>;

// Implement From traits for common error types
impl From<std::io::Error> for VigilError {
    fn from(err: std::io::Error) -> Self {
        VigilError::Io(err)
    }
}

impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        VigilError::Serde(err)
    }
}

impl From<anyhow::Error> for VigilError {
    fn from(err: anyhow::Error) -> Self {
        VigilError::Generic(err.to_string())
    }
}
