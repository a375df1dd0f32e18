use crate::config;
use anyhow::Result;
use std::future::Future;

/// Supplies the raw inputs of one symbol's evaluation: a price quote and the
/// vendor's chain body, untouched.
pub trait OptionChainSource {
    fn fetch_underlying_price(&self, symbol: &str) -> impl Future<Output = Result<f64>> + Send;

    fn fetch_option_chain(&self, symbol: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Used when no API key is configured: a flat price and a chain with no data
#[derive(Debug, Clone, Copy, Default)]
pub struct StubSource;

impl OptionChainSource for StubSource {
    async fn fetch_underlying_price(&self, _symbol: &str) -> Result<f64> {
        Ok(config::STUB_UNDERLYING_PRICE)
    }

    async fn fetch_option_chain(&self, _symbol: &str) -> Result<String> {
        Ok(config::STUB_CHAIN_BODY.to_string())
    }
}
