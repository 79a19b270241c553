//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::auth::{Identity, StaticTokenVerifier, TokenRecord};
use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Static bearer-token table. Empty means no authentication.
    pub auth: AuthConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Usage instructions sent to clients on initialize.
    pub instructions: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Static token table: token -> identity attributes.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub tokens: BTreeMap<String, Identity>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let clients: Vec<_> = self
            .tokens
            .values()
            .map(|identity| identity.client_id().unwrap_or("<unnamed>"))
            .collect();
        f.debug_struct("AuthConfig")
            .field("tokens", &"[REDACTED]")
            .field("clients", &clients)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "cotacao-mcp-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            instructions: "Stock quote server. Call the `cotacao` tool with a ticker symbol \
                           (e.g. PETR4) to get its current price."
                .to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl AuthConfig {
    /// Whether a token table is configured.
    pub fn is_enabled(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Add a token, rejecting one that is already configured.
    pub fn insert(&mut self, token: impl Into<String>, identity: Identity) -> Result<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::config("auth token must not be empty"));
        }
        if self.tokens.contains_key(&token) {
            return Err(Error::config(format!(
                "auth token for client '{}' is configured more than once",
                identity.client_id().unwrap_or("<unnamed>")
            )));
        }
        self.tokens.insert(token, identity);
        Ok(())
    }

    /// Parse the `MCP_AUTH_TOKENS` format: comma-separated `token:client_id`.
    pub fn merge_token_list(&mut self, list: &str) -> Result<()> {
        for (index, entry) in list.split(',').map(str::trim).enumerate() {
            if entry.is_empty() {
                continue;
            }
            let (token, client_id) = entry
                .rsplit_once(':')
                .map(|(t, c)| (t.trim(), c.trim()))
                .filter(|(t, c)| !t.is_empty() && !c.is_empty())
                .ok_or_else(|| {
                    Error::config(format!(
                        "MCP_AUTH_TOKENS entry {} must have the form token:client_id",
                        index + 1
                    ))
                })?;
            self.insert(token, Identity::with_client_id(client_id))?;
        }
        Ok(())
    }

    /// Load a JSON token file: `{ "<token>": { "<attribute>": "<value>" } }`.
    pub fn merge_token_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read token file {}: {}", path.display(), e))
        })?;
        let tokens: BTreeMap<String, Identity> = serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("invalid token file {}: {}", path.display(), e))
        })?;
        for (token, identity) in tokens {
            self.insert(token, identity)?;
        }
        Ok(())
    }

    /// Build the verifier, or `None` when no token is configured.
    pub fn verifier(&self) -> Result<Option<StaticTokenVerifier>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        let records = self
            .tokens
            .iter()
            .map(|(token, identity)| TokenRecord::new(token.clone(), identity.clone()));
        Ok(Some(StaticTokenVerifier::new(records)?))
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_AUTH_TOKENS`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env()?;

        // Load the static token table
        if let Ok(list) = std::env::var("MCP_AUTH_TOKENS") {
            config.auth.merge_token_list(&list)?;
        }
        if let Ok(path) = std::env::var("MCP_AUTH_TOKENS_FILE") {
            config.auth.merge_token_file(Path::new(&path))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.name, "cotacao-mcp-server");
        assert_eq!(config.logging.level, "info");
        assert!(!config.auth.is_enabled());
        assert!(config.auth.verifier().unwrap().is_none());
    }

    #[test]
    fn test_merge_token_list() {
        let mut auth = AuthConfig::default();
        auth.merge_token_list("tk-abcdef123456:lorem_ipsum, tk-other:dolor,")
            .unwrap();

        assert_eq!(auth.tokens.len(), 2);
        assert_eq!(
            auth.tokens["tk-abcdef123456"].client_id(),
            Some("lorem_ipsum")
        );
        assert_eq!(auth.tokens["tk-other"].client_id(), Some("dolor"));
    }

    #[test]
    fn test_merge_token_list_rejects_malformed_entry() {
        let mut auth = AuthConfig::default();
        let err = auth.merge_token_list("tk-ok:client,no-client").unwrap_err();
        assert!(err.to_string().contains("entry 2"));

        let mut auth = AuthConfig::default();
        assert!(auth.merge_token_list(":client").is_err());
    }

    #[test]
    fn test_duplicate_token_is_config_error() {
        let mut auth = AuthConfig::default();
        let err = auth.merge_token_list("tk-1:a,tk-1:b").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(!err.to_string().contains("tk-1"));
    }

    #[test]
    fn test_merge_token_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "tk-abcdef123456": {{ "client_id": "lorem_ipsum", "team": "quotes" }} }}"#
        )
        .unwrap();

        let mut auth = AuthConfig::default();
        auth.merge_token_file(file.path()).unwrap();

        let identity = &auth.tokens["tk-abcdef123456"];
        assert_eq!(identity.client_id(), Some("lorem_ipsum"));
        assert_eq!(identity.get("team"), Some("quotes"));

        let verifier = auth.verifier().unwrap().unwrap();
        assert_eq!(verifier.len(), 1);
    }

    #[test]
    fn test_merge_token_file_errors() {
        let mut auth = AuthConfig::default();
        assert!(
            auth.merge_token_file(Path::new("/nonexistent/tokens.json"))
                .is_err()
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = auth.merge_token_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid token file"));
    }

    #[test]
    fn test_auth_redacted_in_debug() {
        let mut auth = AuthConfig::default();
        auth.insert("super_secret_token", Identity::with_client_id("lorem_ipsum"))
            .unwrap();
        let debug_str = format!("{:?}", auth);
        assert!(debug_str.contains("REDACTED"));
        assert!(debug_str.contains("lorem_ipsum"));
        assert!(!debug_str.contains("super_secret_token"));
    }

    #[test]
    fn test_auth_tokens_not_serialized() {
        let mut config = Config::default();
        config
            .auth
            .insert("super_secret_token", Identity::with_client_id("lorem_ipsum"))
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super_secret_token"));
        assert!(json.contains("cotacao-mcp-server"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_invalid_port_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_TRANSPORT");
            std::env::set_var("MCP_HTTP_PORT", "80a");
        }
        let result = Config::from_env();
        unsafe {
            std::env::remove_var("MCP_HTTP_PORT");
        }
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("80a")));
    }

    #[test]
    fn test_auth_tokens_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_AUTH_TOKENS", "tk-abcdef123456:lorem_ipsum");
            std::env::remove_var("MCP_AUTH_TOKENS_FILE");
        }
        let config = Config::from_env().unwrap();
        assert!(config.auth.is_enabled());
        assert_eq!(
            config.auth.tokens["tk-abcdef123456"].client_id(),
            Some("lorem_ipsum")
        );
        unsafe {
            std::env::remove_var("MCP_AUTH_TOKENS");
        }
    }

    #[test]
    fn test_no_auth_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_AUTH_TOKENS");
            std::env::remove_var("MCP_AUTH_TOKENS_FILE");
        }
        let config = Config::from_env().unwrap();
        assert!(!config.auth.is_enabled());
    }
}
