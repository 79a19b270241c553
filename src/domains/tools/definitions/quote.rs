//! Stock quote tool definition.
//!
//! `cotacao` takes a ticker symbol and returns its price. Prices come from a
//! [`QuoteSource`]; the server ships only [`FixedQuoteSource`], which never
//! touches the network and always answers with [`FIXED_QUOTE`].

use std::sync::Arc;

use rmcp::model::JsonObject;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::descriptor::{ParameterSpec, ToolDescriptor, ValueType};
use crate::domains::tools::error::BoxError;
use crate::domains::tools::handlers::ToolHandler;

/// Price returned by the fixed quote source.
pub const FIXED_QUOTE: f64 = 250.00;

// ============================================================================
// Quote Sources
// ============================================================================

/// Source of stock prices.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    /// Current price for `ticker` (already trimmed and non-empty).
    async fn price(&self, ticker: &str) -> Result<f64, BoxError>;
}

/// Quote source answering every ticker with the same price.
#[derive(Debug, Clone, Copy)]
pub struct FixedQuoteSource {
    price: f64,
}

impl FixedQuoteSource {
    pub fn new(price: f64) -> Self {
        Self { price }
    }
}

impl Default for FixedQuoteSource {
    fn default() -> Self {
        Self::new(FIXED_QUOTE)
    }
}

#[async_trait::async_trait]
impl QuoteSource for FixedQuoteSource {
    async fn price(&self, _ticker: &str) -> Result<f64, BoxError> {
        Ok(self.price)
    }
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the quote tool.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteParams {
    /// Ticker symbol, e.g. `PETR4`.
    pub ticker: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Quote tool - returns the price of the given ticker.
#[derive(Clone)]
pub struct QuoteTool {
    source: Arc<dyn QuoteSource>,
}

impl QuoteTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "cotacao";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Retorna a cotação da ação (ticker) informada";

    /// Create the tool backed by the given quote source.
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Declared signature: `cotacao(ticker: string) -> number`.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, ValueType::Number).with_param(
            ParameterSpec::new(
                "ticker",
                ValueType::String,
                "Ticker symbol of the stock, e.g. PETR4",
            )
            .non_blank(),
        )
    }

    /// Execute the tool logic.
    ///
    /// The source only ever sees the trimmed ticker, and only finite prices
    /// are returned.
    #[instrument(skip_all, fields(ticker = %params.ticker))]
    pub async fn execute(&self, params: &QuoteParams) -> Result<f64, BoxError> {
        let ticker = params.ticker.trim();
        if ticker.is_empty() {
            return Err("ticker must not be empty".into());
        }

        info!("Quote tool called for ticker: {}", ticker);

        let price = self.source.price(ticker).await?;
        if !price.is_finite() {
            return Err(format!("quote source returned a non-finite price for {}", ticker).into());
        }
        Ok(price)
    }
}

impl Default for QuoteTool {
    fn default() -> Self {
        Self::new(Arc::new(FixedQuoteSource::default()))
    }
}

#[async_trait::async_trait]
impl ToolHandler for QuoteTool {
    async fn call(&self, arguments: &JsonObject) -> Result<Value, BoxError> {
        let params: QuoteParams = serde_json::from_value(Value::Object(arguments.clone()))?;
        let price = self.execute(&params).await?;
        Ok(Value::from(price))
    }
}

// ============================================================================
// Tests
// ============================================================================
