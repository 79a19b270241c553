//! Static token verifier.

use std::collections::HashSet;

use tracing::debug;

use super::{AuthError, Identity, TokenRecord, bearer_token};

/// Verifier backed by a fixed token table.
///
/// Every configured token is compared against the presented one with a
/// constant-time comparison, and the scan never stops early, so response
/// time does not depend on which entry matched or where a mismatch occurs.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    records: Vec<TokenRecord>,
}

impl StaticTokenVerifier {
    /// Build a verifier from a token table.
    ///
    /// Empty and duplicate tokens are rejected.
    pub fn new(records: impl IntoIterator<Item = TokenRecord>) -> Result<Self, AuthError> {
        let records: Vec<TokenRecord> = records.into_iter().collect();

        let mut seen = HashSet::new();
        for record in &records {
            let client = record.identity.client_id().unwrap_or("<unnamed>");
            if record.token.trim().is_empty() {
                return Err(AuthError::InvalidRecord(format!(
                    "empty token for client '{}'",
                    client
                )));
            }
            if !seen.insert(record.token.as_str()) {
                return Err(AuthError::DuplicateToken(client.to_string()));
            }
        }

        Ok(Self { records })
    }

    /// Number of configured tokens.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Verify a bare token and return the bound identity.
    pub fn verify(&self, token: &str) -> Result<&Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        let mut matched = None;
        for record in &self.records {
            let equal = constant_time_eq(record.token.as_bytes(), token.as_bytes());
            if equal && matched.is_none() {
                matched = Some(&record.identity);
            }
        }

        match matched {
            Some(identity) => {
                debug!("Token accepted for client {:?}", identity.client_id());
                Ok(identity)
            }
            None => Err(AuthError::UnknownToken),
        }
    }

    /// Verify a raw `Authorization` header value.
    pub fn verify_header(&self, header: Option<&str>) -> Result<&Identity, AuthError> {
        self.verify(bearer_token(header)?)
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("tokens", &self.records.len())
            .finish()
    }
}

/// Compare two byte strings in time proportional to the longer one only.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = a.len() ^ b.len();
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    std::hint::black_box(diff) == 0
}
