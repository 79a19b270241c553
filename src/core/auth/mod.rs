//! Static bearer-token authentication.
//!
//! The auth gate maps opaque token strings to client identities. It is
//! configured once at startup from [`AuthConfig`](crate::core::config::AuthConfig)
//! and consulted by the HTTP transport before any JSON-RPC dispatch.
//! Each request is evaluated on its own; there is no session, expiry or
//! revocation.

mod error;
mod token;
mod verifier;

pub use error::AuthError;
pub use token::{Identity, TokenRecord, bearer_token};
pub use verifier::StaticTokenVerifier;
