//! Configuration types and utilities for Vigil

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REQUIRED_SCOPE};
use crate::error::{Result, VigilError};
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL advertised in the agent card
    pub fn public_url(&self) -> String {
        // The card advertises a reachable hostname even when bound to all interfaces
        let host = if self.host == "0.0.0.0" {
            "localhost"
        } else {
            &self.host
        };
        format!("http://{}:{}/", host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Identity provider configuration for M2M token validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Project identifier at the identity provider, also the expected token audience
    pub project_id: String,
    /// JWKS document URL (derived from the project id when not set)
    pub jwks_url: Option<String>,
    /// Scope a token must carry to reach this agent
    pub required_scope: String,
}

impl AuthConfig {
    /// Load the provider settings from the environment
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("DESCOPE_PROJECT_ID")
            .map_err(|_| VigilError::Config("DESCOPE_PROJECT_ID is not set".to_string()))?;
        let jwks_url = std::env::var("DESCOPE_JWKS_URL").ok();
        let required_scope = std::env::var("AGENT_REQUIRED_SCOPE")
            .unwrap_or_else(|_| DEFAULT_REQUIRED_SCOPE.to_string());

        Ok(Self {
            project_id,
            jwks_url,
            required_scope,
        })
    }

    /// JWKS URL to fetch the provider's signing keys from
    pub fn jwks_url(&self) -> String {
        self.jwks_url.clone().unwrap_or_else(|| {
            format!(
                "https://api.descope.com/{}/.well-known/jwks.json",
                self.project_id
            )
        })
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            jwks_url: None,
            required_scope: DEFAULT_REQUIRED_SCOPE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8003,
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:8003");
    }

    #[test]
    fn test_public_url_rewrites_wildcard_host() {
        let config = ServerConfig::default();
        assert_eq!(config.public_url(), "http://localhost:8003/");

        let config = ServerConfig {
            host: "crime.internal".to_string(),
            port: 9000,
        };
        assert_eq!(config.public_url(), "http://crime.internal:9000/");
    }

    #[test]
    fn test_jwks_url_derived_from_project() {
        let config = AuthConfig {
            project_id: "P2abc".to_string(),
            jwks_url: None,
            required_scope: DEFAULT_REQUIRED_SCOPE.to_string(),
        };
        assert_eq!(
            config.jwks_url(),
            "https://api.descope.com/P2abc/.well-known/jwks.json"
        );
    }

    #[test]
    fn test_jwks_url_override() {
        let config = AuthConfig {
            project_id: "P2abc".to_string(),
            jwks_url: Some("https://issuer.example.com/keys".to_string()),
            required_scope: DEFAULT_REQUIRED_SCOPE.to_string(),
        };
        assert_eq!(config.jwks_url(), "https://issuer.example.com/keys");
    }
}
