use std::fmt;

#[derive(Debug)]
pub enum ChainError {
    InvalidDocument(String),
    Request(String),
    /// 429 or 5xx from the vendor; worth retrying
    Unavailable(String),
    Parse(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChainError::InvalidDocument(msg) => write!(f, "Invalid chain document: {}", msg),
            ChainError::Request(msg) => write!(f, "Request error: {}", msg),
            ChainError::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ChainError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ChainError {}

impl ChainError {
    /// Transport failures and vendor overload; everything else fails fast
    pub fn is_transient(&self) -> bool {
        matches!(self, ChainError::Request(_) | ChainError::Unavailable(_))
    }
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::Request(err.to_string())
    }
}

// A body that serde_json cannot read is not a chain document at all
impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::InvalidDocument(err.to_string())
    }
}
