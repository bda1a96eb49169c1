//! M2M bearer-token gate
//!
//! Every route except the `/.well-known` discovery surface requires a
//! valid machine-to-machine token carrying the configured scope.
//! Requests that pass are forwarded unmodified.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use vigil_auth::{AuthError, TokenValidator};

/// Shared state for the auth middleware.
#[derive(Clone)]
pub struct AuthGate {
    validator: Arc<dyn TokenValidator>,
    required_scope: String,
}

impl AuthGate {
    pub fn new(validator: Arc<dyn TokenValidator>, required_scope: impl Into<String>) -> Self {
        AuthGate {
            validator,
            required_scope: required_scope.into(),
        }
    }
}

/// Extract the bearer token from the Authorization header.
///
/// Returns `None` for a missing header, a non-Bearer scheme, or an
/// empty token.
fn bearer_token(request: &Request) -> Option<&str> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

fn reject(error: &AuthError) -> Response {
    let status = match error {
        AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::UNAUTHORIZED,
    };
    (status, Json(json!({ "detail": error.detail() }))).into_response()
}

/// Middleware enforcing M2M bearer-token authentication.
pub async fn m2m_auth(State(gate): State<AuthGate>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if path.starts_with("/.well-known") {
        info!("Accessing public endpoint: {}", path);
        return next.run(request).await;
    }

    let token = match bearer_token(&request) {
        Some(token) => token.to_string(),
        None => {
            info!("Missing or invalid Authorization header");
            return reject(&AuthError::MissingCredential);
        }
    };

    info!("Received token, validating...");

    let claims = match gate.validator.validate(&token).await {
        Ok(claims) => {
            info!("VALID M2M token for Agent: {}", gate.required_scope);
            claims
        }
        Err(e) => {
            info!("Invalid M2M token: {}", e);
            return reject(&e);
        }
    };

    if !claims.has_scope(&gate.required_scope) {
        info!(
            "Token missing required scope '{}', token scopes: {:?}",
            gate.required_scope,
            claims.scopes()
        );
        return reject(&AuthError::InsufficientScope(gate.required_scope.clone()));
    }

    info!("Token scope verified, continuing request");
    next.run(request).await
}
