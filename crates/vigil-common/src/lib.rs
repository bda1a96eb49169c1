//! Vigil Common - Shared utilities and types
//!
//! This crate provides the error type, configuration structs, and constants
//! used across all Vigil components.

pub mod config;
pub mod constants;
pub mod error;

// Re-export commonly used items
pub use config::{AuthConfig, ServerConfig};
pub use constants::*;
pub use error::{Result, VigilError};
