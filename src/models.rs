use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Resolve a vendor type string ("call", "PUT", ...) to a contract side
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_uppercase().as_str() {
            "CALL" => Some(OptionType::Call),
            "PUT" => Some(OptionType::Put),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized option contract, one per call or put entry in the chosen expiration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    #[serde(rename = "type")]
    pub option_type: OptionType,

    pub expiration: NaiveDate,

    pub strike: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,

    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,

    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl OptionContract {
    /// True when none of strike, delta, gamma, vega, theta or IV is known
    pub fn carries_no_signal(&self) -> bool {
        self.strike.is_none()
            && self.delta.is_none()
            && self.gamma.is_none()
            && self.vega.is_none()
            && self.theta.is_none()
            && self.implied_volatility.is_none()
    }

    pub fn with_score(self, score: Option<f64>) -> Self {
        Self { score, ..self }
    }

    /// Mid price, unknown unless both sides of the quote are known
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => None,
        }
    }
}

/// Summary of the winning contract for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestOption {
    pub symbol: String,

    #[serde(rename = "type")]
    pub option_type: OptionType,

    pub expiration: NaiveDate,
    pub strike: Option<f64>,
    pub mid: Option<f64>,
    pub delta: Option<f64>,
    pub theta: Option<f64>,

    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: Option<f64>,

    #[serde(rename = "greeksScore")]
    pub score: f64,
}

impl BestOption {
    /// Build the summary from a scored contract; unscored contracts yield None
    pub fn from_contract(symbol: impl Into<String>, contract: &OptionContract) -> Option<Self> {
        let score = contract.score?;
        Some(Self {
            symbol: symbol.into(),
            option_type: contract.option_type,
            expiration: contract.expiration,
            strike: contract.strike,
            mid: contract.mid(),
            delta: contract.delta,
            theta: contract.theta,
            implied_volatility: contract.implied_volatility,
            score,
        })
    }
}

/// Outcome of evaluating one symbol in a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolReport {
    pub symbol: String,

    #[serde(rename = "underlyingPrice")]
    pub underlying_price: Option<f64>,

    #[serde(rename = "contractsCount")]
    pub contracts_count: usize,

    pub best: Option<BestOption>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SymbolReport {
    pub fn failed(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            underlying_price: None,
            contracts_count: 0,
            best: None,
            error: Some(error.into()),
        }
    }

    /// One-line label used by the CLI summary
    pub fn status_label(&self) -> String {
        match &self.best {
            Some(best) => format!(
                "{} {} strike {} score {:.3}",
                best.option_type,
                best.expiration,
                best.strike.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string()),
                best.score
            ),
            None => "no option data".to_string(),
        }
    }
}
