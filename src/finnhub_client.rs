use crate::config;
use crate::error::ChainError;
use crate::source::OptionChainSource;
use anyhow::{Context, Result};
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{debug, warn};

// -----------------------------------------------
// FINNHUB CLIENT
// -----------------------------------------------
pub struct FinnhubClient {
    client: Client,
    api_key: String,
}

impl FinnhubClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            api_key: api_key.into(),
        })
    }

    /// GET with exponential backoff on transport errors, rate limits and server errors.
    /// Other client errors and non-JSON bodies fail on the first attempt.
    async fn fetch_json(&self, url: &str) -> Result<String> {
        RetryIf::spawn(retry_delays(), || self.fetch_once(url), is_transient).await
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ChainError::from)
            .context("Request send failed")?;

        let status = res.status();

        if status.is_success() {
            let text = res
                .text()
                .await
                .map_err(ChainError::from)
                .context("Failed to read body")?;

            let trimmed = text.trim();
            if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                let preview: String = text.chars().take(200).collect();
                anyhow::bail!("Non-JSON response: {}", preview);
            }

            Ok(text)
        } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            warn!(%status, "retryable response from Finnhub");
            Err(ChainError::Unavailable(status.to_string()).into())
        } else {
            let body = res.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            anyhow::bail!("Client error {}: {}", status, preview)
        }
    }
}

fn retry_delays() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(config::RETRY_BACKOFF_BASE)
        .factor(config::RETRY_BACKOFF_FACTOR_MS)
        .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
        .take(config::RETRY_MAX_RETRIES)
}

fn is_transient(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ChainError>()
        .is_some_and(ChainError::is_transient)
}

impl OptionChainSource for FinnhubClient {
    async fn fetch_underlying_price(&self, symbol: &str) -> Result<f64> {
        let url = config::finnhub_quote_url(symbol, &self.api_key);
        let text = self.fetch_json(&url).await?;
        let price = parse_quote_price(&text)?;

        debug!(symbol, price, "fetched quote");
        Ok(price)
    }

    async fn fetch_option_chain(&self, symbol: &str) -> Result<String> {
        let url = config::finnhub_option_chain_url(symbol, &self.api_key);
        let text = self
            .fetch_json(&url)
            .await
            .with_context(|| format!("Failed to fetch option chain for {}", symbol))?;

        debug!(symbol, bytes = text.len(), "fetched option chain");
        Ok(text)
    }
}

/// Current price from a quote body (field "c"); a missing field reads as 0.0
pub fn parse_quote_price(text: &str) -> Result<f64, ChainError> {
    let doc: Value =
        serde_json::from_str(text).map_err(|e| ChainError::Parse(format!("quote body: {}", e)))?;

    Ok(doc.get("c").and_then(Value::as_f64).unwrap_or(0.0))
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Rotating Accept-Language headers
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    Client::builder()
        .default_headers(headers)
        .user_agent(config::USER_AGENT)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local server answering every request with the same response; counts requests
    async fn serve_fixed(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);

                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/api/v1/quote?symbol=MSFT", addr), hits)
    }

    #[test]
    fn test_parse_quote_price() {
        assert_eq!(parse_quote_price(r#"{"c": 412.3, "h": 415.0}"#).unwrap(), 412.3);
        assert_eq!(parse_quote_price(r#"{"h": 415.0}"#).unwrap(), 0.0);
        assert!(matches!(parse_quote_price("<html>"), Err(ChainError::Parse(_))));
    }

    #[test]
    fn test_client_builds() {
        assert!(FinnhubClient::new("demo").is_ok());
    }

    #[test]
    fn test_retry_delays() {
        let delays: Vec<u128> = retry_delays().map(|d| d.as_millis()).collect();
        assert_eq!(delays, vec![200, 400, 800]);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (url, hits) = serve_fixed("401 Unauthorized", r#"{"error":"bad token"}"#).await;
        let client = FinnhubClient::new("bad").unwrap();

        let err = client.fetch_json(&url).await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_json_body_is_not_retried() {
        let (url, hits) = serve_fixed("200 OK", "<html>maintenance</html>").await;
        let client = FinnhubClient::new("demo").unwrap();

        let err = client.fetch_json(&url).await.unwrap_err();
        assert!(err.to_string().contains("Non-JSON"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let (url, hits) = serve_fixed("503 Service Unavailable", "{}").await;
        let client = FinnhubClient::new("demo").unwrap();

        let err = client.fetch_json(&url).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ChainError>(), Some(ChainError::Unavailable(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 1 + config::RETRY_MAX_RETRIES);
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let (url, hits) = serve_fixed("200 OK", r#"{"c": 101.5}"#).await;
        let client = FinnhubClient::new("demo").unwrap();

        let body = client.fetch_json(&url).await.unwrap();
        assert_eq!(parse_quote_price(&body).unwrap(), 101.5);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
