//! Token records, identities, and bearer header parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AuthError;

/// Attribute key conventionally holding the client identifier.
pub const CLIENT_ID: &str = "client_id";

/// Identity bound to a token: an ordered map of string attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(BTreeMap<String, String>);

impl Identity {
    /// Identity with only a `client_id` attribute.
    pub fn with_client_id(client_id: impl Into<String>) -> Self {
        Self(BTreeMap::from([(CLIENT_ID.to_string(), client_id.into())]))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn client_id(&self) -> Option<&str> {
        self.get(CLIENT_ID)
    }
}

/// A configured token and the identity it grants.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token: String,
    pub identity: Identity,
}

impl TokenRecord {
    pub fn new(token: impl Into<String>, identity: Identity) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRecord")
            .field("token", &"[REDACTED]")
            .field("identity", &self.identity)
            .finish()
    }
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; surrounding whitespace is
/// ignored.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?.trim();
    let (scheme, token) = header.split_once(' ').unwrap_or((header, ""));

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            bearer_token(Some("Bearer tk-abcdef123456")),
            Ok("tk-abcdef123456")
        );
        assert_eq!(bearer_token(Some("bearer  tk-1 ")), Ok("tk-1"));
        assert_eq!(bearer_token(Some("BEARER tk-1")), Ok("tk-1"));
    }

    #[test]
    fn test_bearer_token_rejections() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(
            bearer_token(Some("Basic dXNlcjpwYXNz")),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(
            bearer_token(Some("tk-abcdef123456")),
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(bearer_token(Some("Bearer")), Err(AuthError::EmptyToken));
        assert_eq!(bearer_token(Some("Bearer    ")), Err(AuthError::EmptyToken));
        assert_eq!(bearer_token(Some("")), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_identity_accessors() {
        let identity: Identity =
            serde_json::from_str(r#"{ "client_id": "lorem_ipsum", "team": "quotes" }"#).unwrap();
        assert_eq!(identity.client_id(), Some("lorem_ipsum"));
        assert_eq!(identity.get("team"), Some("quotes"));
        assert_eq!(identity.get("missing"), None);
    }

    #[test]
    fn test_identity_serializes_as_map() {
        let identity = Identity::with_client_id("lorem_ipsum");
        assert_eq!(
            serde_json::to_value(&identity).unwrap(),
            serde_json::json!({ "client_id": "lorem_ipsum" })
        );
    }

    #[test]
    fn test_token_record_redacted_in_debug() {
        let record = TokenRecord::new("tk-abcdef123456", Identity::with_client_id("lorem_ipsum"));
        let debug_str = format!("{:?}", record);
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("lorem_ipsum"));
        assert!(!debug_str.contains("tk-abcdef123456"));
    }
}
