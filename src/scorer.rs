use crate::models::OptionContract;
use serde::{Deserialize, Serialize};

/// Weights of the composite Greeks score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            delta: 1.0,
            gamma: 1.0,
            vega: 1.0,
            theta: 1.0,
        }
    }
}

/// Composite score of one contract, None when any of delta, gamma, vega, theta is unknown.
///
/// Gamma, vega and theta are rescaled by the underlying price so contracts on
/// differently priced underlyings stay comparable. Theta is penalized by magnitude.
/// `price` must be positive; callers check this before scoring.
pub fn score(contract: &OptionContract, price: f64, weights: &ScoringWeights) -> Option<f64> {
    debug_assert!(price > 0.0, "underlying price must be positive, got {}", price);

    let delta = contract.delta?;
    let gamma = contract.gamma?;
    let vega = contract.vega?;
    let theta = contract.theta?;

    let norm_gamma = gamma * price;
    let norm_vega = vega / price;
    let norm_theta = theta / price;

    Some(
        weights.delta * delta.abs() + weights.gamma * norm_gamma + weights.vega * norm_vega
            - weights.theta * norm_theta.abs(),
    )
}

/// Attach a score to every contract; unscorable ones keep `score: None`
pub fn score_chain(
    contracts: Vec<OptionContract>,
    price: f64,
    weights: &ScoringWeights,
) -> Vec<OptionContract> {
    contracts
        .into_iter()
        .map(|contract| {
            let s = score(&contract, price, weights);
            contract.with_score(s)
        })
        .collect()
}
