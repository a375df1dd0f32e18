use crate::chain;
use crate::error::ChainError;
use crate::expiry;
use crate::models::{BestOption, OptionContract, SymbolReport};
use crate::scorer::{self, ScoringWeights};
use crate::selector;
use crate::source::OptionChainSource;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

/// Outcome of the synchronous engine for one symbol
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub contracts: Vec<OptionContract>,
    pub best: Option<BestOption>,
}

/// Parse, score and select for one symbol.
///
/// `today` drives the target expiration. A price that is not finite and
/// positive leaves the chain unscored, so no best option is reported.
pub fn evaluate_symbol(
    symbol: &str,
    raw_chain: &str,
    price: f64,
    today: NaiveDate,
    weights: &ScoringWeights,
) -> Result<Evaluation, ChainError> {
    let target = expiry::target_expiration(today);
    let contracts = chain::parse_chain(raw_chain, target)?;

    if !(price.is_finite() && price > 0.0) {
        warn!(symbol, price, "non-positive underlying price, skipping scoring");
        return Ok(Evaluation { contracts, best: None });
    }

    let contracts = scorer::score_chain(contracts, price, weights);
    let best = selector::select_best(&contracts).and_then(|c| BestOption::from_contract(symbol, c));

    Ok(Evaluation { contracts, best })
}

/// Context shared by every task of a batch run
#[derive(Debug, Clone, Copy)]
pub struct RunContext {
    pub today: NaiveDate,
    pub weights: ScoringWeights,
}

/// Fetch and evaluate one symbol; every failure ends up in the report
pub async fn process_symbol<S: OptionChainSource>(
    source: &S,
    symbol: &str,
    ctx: &RunContext,
) -> SymbolReport {
    let price = match source.fetch_underlying_price(symbol).await {
        Ok(price) => price,
        Err(e) => {
            warn!(symbol, error = %e, "price fetch failed");
            return SymbolReport::failed(symbol, format!("{:#}", e));
        }
    };

    let raw = match source.fetch_option_chain(symbol).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(symbol, error = %e, "option chain fetch failed");
            return SymbolReport {
                underlying_price: Some(price),
                ..SymbolReport::failed(symbol, format!("{:#}", e))
            };
        }
    };

    match evaluate_symbol(symbol, &raw, price, ctx.today, &ctx.weights) {
        Ok(evaluation) => {
            info!(
                symbol,
                price,
                contracts = evaluation.contracts.len(),
                found = evaluation.best.is_some(),
                "evaluated option chain"
            );
            SymbolReport {
                symbol: symbol.to_string(),
                underlying_price: Some(price),
                contracts_count: evaluation.contracts.len(),
                best: evaluation.best,
                error: None,
            }
        }
        Err(e) => {
            warn!(symbol, error = %e, "option chain rejected");
            SymbolReport {
                underlying_price: Some(price),
                ..SymbolReport::failed(symbol, e.to_string())
            }
        }
    }
}

// -----------------------------------------------
// BATCH EVALUATION WITH CONCURRENCY CONTROL
// -----------------------------------------------

/// Evaluate all symbols concurrently, at most `max_concurrent` at a time.
/// Reports come back in input order.
pub async fn process_all<S>(
    source: Arc<S>,
    symbols: Vec<String>,
    ctx: RunContext,
    max_concurrent: usize,
) -> Vec<SymbolReport>
where
    S: OptionChainSource + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles = vec![];

    for symbol in symbols {
        let source = Arc::clone(&source);
        let sem = Arc::clone(&semaphore);
        let task_symbol = symbol.clone();

        let handle = tokio::spawn(async move {
            let _permit = match sem.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return SymbolReport::failed(task_symbol, format!("Semaphore error: {}", e)),
            };

            process_symbol(source.as_ref(), &task_symbol, &ctx).await
        });

        handles.push((symbol, handle));
    }

    let mut reports = vec![];
    for (symbol, handle) in handles {
        match handle.await {
            Ok(report) => reports.push(report),
            Err(e) => reports.push(SymbolReport::failed(symbol, format!("Task error: {}", e))),
        }
    }

    reports
}
