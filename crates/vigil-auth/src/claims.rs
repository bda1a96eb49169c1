//! Token claims and scope normalization

use serde::{Deserialize, Serialize};

/// The `scope` claim as identity providers actually emit it
///
/// Some providers emit a single space-delimited string, others a JSON array
/// of scope strings. Both shapes normalize through [`TokenClaims::scopes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScopeClaim {
    Single(String),
    Sequence(Vec<String>),
}

/// Claims carried by a validated M2M token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeClaim>,
}

impl TokenClaims {
    /// Normalize the scope claim into a list of scope strings
    ///
    /// A string claim is split on whitespace, a sequence claim is used as-is,
    /// and an absent claim yields no scopes.
    pub fn scopes(&self) -> Vec<String> {
        match &self.scope {
            Some(ScopeClaim::Single(raw)) => {
                raw.split_whitespace().map(str::to_string).collect()
            }
            Some(ScopeClaim::Sequence(list)) => list.clone(),
            None => Vec::new(),
        }
    }

    /// Whether the token carries the given scope
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes().iter().any(|s| s == scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_with(scope: Option<ScopeClaim>) -> TokenClaims {
        TokenClaims {
            sub: "AK1".to_string(),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
            scope,
        }
    }

    #[test]
    fn test_string_scope_splits_on_whitespace() {
        let claims = claims_with(Some(ScopeClaim::Single(
            "crime_agent billing".to_string(),
        )));
        assert_eq!(claims.scopes(), vec!["crime_agent", "billing"]);
        assert!(claims.has_scope("crime_agent"));
        assert!(claims.has_scope("billing"));
        assert!(!claims.has_scope("medical_agent"));
    }

    #[test]
    fn test_sequence_scope_used_as_is() {
        let claims = claims_with(Some(ScopeClaim::Sequence(vec![
            "billing".to_string(),
            "crime_agent".to_string(),
        ])));
        assert_eq!(claims.scopes(), vec!["billing", "crime_agent"]);
        assert!(claims.has_scope("crime_agent"));
    }

    #[test]
    fn test_missing_scope_yields_no_scopes() {
        let claims = claims_with(None);
        assert!(claims.scopes().is_empty());
        assert!(!claims.has_scope("crime_agent"));
    }

    #[test]
    fn test_empty_and_whitespace_strings() {
        let claims = claims_with(Some(ScopeClaim::Single(String::new())));
        assert!(claims.scopes().is_empty());

        let claims = claims_with(Some(ScopeClaim::Single("  crime_agent   ".to_string())));
        assert_eq!(claims.scopes(), vec!["crime_agent"]);
    }

    #[test]
    fn test_scope_claim_deserializes_both_shapes() {
        let claims: TokenClaims = serde_json::from_value(json!({
            "sub": "AK1",
            "exp": 2_000_000_000u64,
            "iat": 1_700_000_000u64,
            "scope": "crime_agent"
        }))
        .unwrap();
        assert_eq!(
            claims.scope,
            Some(ScopeClaim::Single("crime_agent".to_string()))
        );

        let claims: TokenClaims = serde_json::from_value(json!({
            "sub": "AK1",
            "exp": 2_000_000_000u64,
            "iat": 1_700_000_000u64,
            "scope": ["crime_agent", "billing"]
        }))
        .unwrap();
        assert_eq!(
            claims.scope,
            Some(ScopeClaim::Sequence(vec![
                "crime_agent".to_string(),
                "billing".to_string()
            ]))
        );

        let claims: TokenClaims = serde_json::from_value(json!({
            "sub": "AK1",
            "exp": 2_000_000_000u64,
            "iat": 1_700_000_000u64
        }))
        .unwrap();
        assert_eq!(claims.scope, None);
    }
}
