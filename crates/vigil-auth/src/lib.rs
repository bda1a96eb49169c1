//! Vigil Auth - machine-to-machine token validation
//!
//! Everything the auth gate needs to decide a request: the claims model with
//! scope normalization, the validation error taxonomy, and the token
//! validator that checks credentials against the identity provider's
//! published signing keys.

pub mod claims;
pub mod error;
pub mod validator;

// Re-export commonly used items
pub use claims::{ScopeClaim, TokenClaims};
pub use error::AuthError;
pub use validator::{JwksValidator, TokenValidator};
