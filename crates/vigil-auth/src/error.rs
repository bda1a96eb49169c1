//! Authentication and authorization failures
//!
//! Every rejection the auth gate can produce, with the detail string that
//! ends up in the response body.

use std::fmt;

/// Why the auth gate rejected a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer credential on the request
    MissingCredential,
    /// The credential failed provider validation
    InvalidCredential(String),
    /// The credential validated but lacks the required scope
    InsufficientScope(String),
}

impl AuthError {
    /// Wire-facing detail string for the rejection body
    pub fn detail(&self) -> String {
        match self {
            AuthError::MissingCredential => "Missing bearer token".to_string(),
            AuthError::InvalidCredential(reason) => format!("Invalid token: {}", reason),
            AuthError::InsufficientScope(scope) => format!("Missing required scope: {}", scope),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail())
    }
}

impl std::error::Error for AuthError {}
