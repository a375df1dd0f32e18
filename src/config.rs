use crate::scorer::ScoringWeights;
use std::time::Duration;

// -----------------------------------------------
// FINNHUB API ENDPOINTS
// -----------------------------------------------
pub const FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";

pub fn finnhub_quote_url(symbol: &str, token: &str) -> String {
    format!(
        "{}/quote?symbol={}&token={}",
        FINNHUB_BASE_URL,
        urlencoding::encode(symbol),
        urlencoding::encode(token)
    )
}

pub fn finnhub_option_chain_url(symbol: &str, token: &str) -> String {
    format!(
        "{}/stock/option-chain?symbol={}&token={}",
        FINNHUB_BASE_URL,
        urlencoding::encode(symbol),
        urlencoding::encode(token)
    )
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
// Delay before retry n is BASE^n * FACTOR_MS: 200ms, 400ms, 800ms
pub const RETRY_BACKOFF_BASE: u64 = 2;
pub const RETRY_BACKOFF_FACTOR_MS: u64 = 100;
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
/// Retries after the first attempt, so at most 1 + RETRY_MAX_RETRIES requests
pub const RETRY_MAX_RETRIES: usize = 3;

// -----------------------------------------------
// CONCURRENCY LIMITS
// -----------------------------------------------
pub const DEFAULT_MAX_CONCURRENT: usize = 5;
pub const MAX_CONCURRENT_CEILING: usize = 50;

// -----------------------------------------------
// STUB SOURCE
// -----------------------------------------------
pub const STUB_UNDERLYING_PRICE: f64 = 100.0;
pub const STUB_CHAIN_BODY: &str = "{}";

// -----------------------------------------------
// OUTPUT
// -----------------------------------------------
pub const DEFAULT_OUTPUT_PATH: &str = "best_options.json";
pub const DEFAULT_LOG_DIR: &str = "./logs";
pub const LOG_FILE_NAME: &str = "greeks-scout.log";
pub const DEFAULT_CONSOLE_LOG_LEVEL: &str = "warn";
pub const DEFAULT_FILE_LOG_LEVEL: &str = "info";

pub const DEFAULT_TICKERS: &[&str] = &["MSFT", "AAPL", "NVDA"];

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Everything a batch run needs, gathered from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub tickers: Vec<String>,
    pub weights: ScoringWeights,
    pub max_concurrent: usize,
    pub output_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            api_key: get_api_key(),
            tickers: get_tickers(),
            weights: get_weights(),
            max_concurrent: get_max_concurrent(),
            output_path: get_output_path(),
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Finnhub API key; blank counts as missing
pub fn get_api_key() -> Option<String> {
    env_var("FINNHUB_API_KEY")
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

/// Tickers to evaluate, from GREEKS_TICKERS or the defaults
pub fn get_tickers() -> Vec<String> {
    match env_var("GREEKS_TICKERS") {
        Some(raw) => normalize_tickers(raw.split(',')),
        None => normalize_tickers(DEFAULT_TICKERS.iter().copied()),
    }
}

/// Trim, upper-case, drop blanks and duplicates; first occurrence keeps its place
pub fn normalize_tickers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for ticker in raw {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() && !tickers.contains(&ticker) {
            tickers.push(ticker);
        }
    }
    tickers
}

pub fn get_weights() -> ScoringWeights {
    ScoringWeights {
        delta: parse_weight(env_var("GREEKS_W_DELTA").as_deref()),
        gamma: parse_weight(env_var("GREEKS_W_GAMMA").as_deref()),
        vega: parse_weight(env_var("GREEKS_W_VEGA").as_deref()),
        theta: parse_weight(env_var("GREEKS_W_THETA").as_deref()),
    }
}

/// Weight from an env value; absent or invalid falls back to 1.0
pub fn parse_weight(raw: Option<&str>) -> f64 {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|w| w.is_finite())
        .unwrap_or(1.0)
}

pub fn get_max_concurrent() -> usize {
    parse_max_concurrent(env_var("GREEKS_MAX_CONCURRENT").as_deref())
}

/// Clamp between 1 and the ceiling
pub fn parse_max_concurrent(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .map(|n| n.clamp(1, MAX_CONCURRENT_CEILING))
        .unwrap_or(DEFAULT_MAX_CONCURRENT)
}

pub fn get_output_path() -> String {
    env_var("GREEKS_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string())
}

pub fn get_log_dir() -> String {
    env_var("GREEKS_LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())
}

pub fn get_console_log_level() -> String {
    env_var("GREEKS_CONSOLE_LOG")
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_CONSOLE_LOG_LEVEL.to_string())
}
