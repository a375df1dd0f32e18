pub mod fields;
pub mod shapes;

use crate::error::ChainError;
use crate::expiry::days_between;
use crate::models::{OptionContract, OptionType};
use chrono::NaiveDate;
use fields::{NumericField, TYPE_ALIASES};
use serde_json::{Map, Value};
use shapes::{BLOCK_LISTS, ContractsPayload};
use tracing::debug;

pub use shapes::locate_payload;

/// An expiration block found in the document, contracts not yet parsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpirationCandidate<'a> {
    pub expiration: NaiveDate,
    pub payload: ContractsPayload<'a>,
}

/// Parse a raw vendor body into the contracts of the expiration nearest `target`
pub fn parse_chain(raw: &str, target: NaiveDate) -> Result<Vec<OptionContract>, ChainError> {
    let doc: Value = serde_json::from_str(raw)?;
    parse_chain_value(&doc, target)
}

/// Same as [`parse_chain`] for an already decoded document.
///
/// Only a non-object root is an error; every other mismatch is skipped.
pub fn parse_chain_value(doc: &Value, target: NaiveDate) -> Result<Vec<OptionContract>, ChainError> {
    let root = doc.as_object().ok_or_else(|| {
        ChainError::InvalidDocument(format!("expected a JSON object at the root, got {}", kind_of(doc)))
    })?;

    let candidates = collect_candidates(root);

    let Some(chosen) = choose_expiration(&candidates, target) else {
        debug!(%target, "no expiration blocks found");
        return Ok(Vec::new());
    };

    let contracts = extract_contracts(chosen);
    debug!(
        %target,
        chosen = %chosen.expiration,
        candidates = candidates.len(),
        contracts = contracts.len(),
        "parsed option chain"
    );

    Ok(contracts)
}

/// Gather (expiration, payload) pairs from the first block list that yields any
pub fn collect_candidates(root: &Map<String, Value>) -> Vec<ExpirationCandidate<'_>> {
    for list in BLOCK_LISTS {
        let Some(blocks) = list.probe(root) else {
            continue;
        };

        let candidates: Vec<ExpirationCandidate> = blocks
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|block| {
                let expiration = fields::probe_expiration(block)?;
                let payload = locate_payload(block)?;
                Some(ExpirationCandidate { expiration, payload })
            })
            .collect();

        if !candidates.is_empty() {
            return candidates;
        }
    }

    Vec::new()
}

/// Earliest expiration on or after `target`, else the one nearest to it.
/// Ties go to the candidate seen first.
pub fn choose_expiration<'c, 'a>(
    candidates: &'c [ExpirationCandidate<'a>],
    target: NaiveDate,
) -> Option<&'c ExpirationCandidate<'a>> {
    candidates
        .iter()
        .filter(|c| c.expiration >= target)
        .min_by_key(|c| c.expiration)
        .or_else(|| {
            candidates
                .iter()
                .min_by_key(|c| days_between(c.expiration, target))
        })
}

/// Normalize every usable contract of the chosen candidate
pub fn extract_contracts(candidate: &ExpirationCandidate) -> Vec<OptionContract> {
    candidate
        .payload
        .entries()
        .into_iter()
        .filter_map(|(inferred, entry)| build_contract(entry, inferred, candidate.expiration))
        .collect()
}

fn build_contract(
    entry: &Map<String, Value>,
    inferred: Option<OptionType>,
    expiration: NaiveDate,
) -> Option<OptionContract> {
    let option_type = match inferred {
        Some(option_type) => option_type,
        None => OptionType::from_label(fields::probe_text(entry, TYPE_ALIASES)?)?,
    };

    let contract = OptionContract {
        option_type,
        expiration,
        strike: NumericField::Strike.read(entry),
        bid: NumericField::Bid.read(entry),
        ask: NumericField::Ask.read(entry),
        delta: NumericField::Delta.read(entry),
        gamma: NumericField::Gamma.read(entry),
        vega: NumericField::Vega.read(entry),
        theta: NumericField::Theta.read(entry),
        implied_volatility: NumericField::ImpliedVolatility.read(entry),
        score: None,
    };

    (!contract.carries_no_signal()).then_some(contract)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidates_for(dates: &[NaiveDate]) -> Vec<ExpirationCandidate<'static>> {
        dates
            .iter()
            .map(|&expiration| ExpirationCandidate {
                expiration,
                payload: ContractsPayload::Mixed(&[]),
            })
            .collect()
    }

    #[test]
    fn test_choose_earliest_on_or_after_target() {
        let target = date(2026, 1, 16);
        let candidates = candidates_for(&[
            date(2025, 12, 19),
            date(2026, 2, 20),
            date(2026, 1, 23),
            date(2026, 1, 9),
        ]);

        let chosen = choose_expiration(&candidates, target).unwrap();
        assert_eq!(chosen.expiration, date(2026, 1, 23));
    }

    #[test]
    fn test_choose_exact_target() {
        let target = date(2026, 1, 16);
        let candidates = candidates_for(&[date(2026, 2, 20), date(2026, 1, 16)]);

        assert_eq!(choose_expiration(&candidates, target).unwrap().expiration, target);
    }

    #[test]
    fn test_choose_nearest_when_all_before_target() {
        let target = date(2026, 1, 16);
        let candidates = candidates_for(&[date(2025, 11, 21), date(2026, 1, 2), date(2025, 12, 19)]);

        let chosen = choose_expiration(&candidates, target).unwrap();
        assert_eq!(chosen.expiration, date(2026, 1, 2));
    }

    #[test]
    fn test_choose_none_without_candidates() {
        assert!(choose_expiration(&[], date(2026, 1, 16)).is_none());
    }

    #[test]
    fn test_build_contract_type_field() {
        let exp = date(2026, 1, 16);
        let doc = json!({ "contractType": "call", "strike": 100 });
        let contract = build_contract(doc.as_object().unwrap(), None, exp).unwrap();
        assert_eq!(contract.option_type, OptionType::Call);

        // "type" is present as a string, so "contractType" is never consulted
        let doc = json!({ "type": "straddle", "contractType": "PUT", "strike": 100 });
        assert!(build_contract(doc.as_object().unwrap(), None, exp).is_none());

        let doc = json!({ "strike": 100 });
        assert!(build_contract(doc.as_object().unwrap(), None, exp).is_none());
    }

    #[test]
    fn test_build_contract_label_overrides_type_field() {
        let doc = json!({ "type": "PUT", "delta": 0.4 });
        let contract =
            build_contract(doc.as_object().unwrap(), Some(OptionType::Call), date(2026, 1, 16)).unwrap();
        assert_eq!(contract.option_type, OptionType::Call);
    }

    #[test]
    fn test_build_contract_bid_ask_alone_is_no_signal() {
        let doc = json!({ "type": "CALL", "bid": 1.0, "ask": 1.2 });
        assert!(build_contract(doc.as_object().unwrap(), None, date(2026, 1, 16)).is_none());
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        let err = parse_chain_value(&json!([1, 2, 3]), date(2026, 1, 16)).unwrap_err();
        assert!(matches!(err, ChainError::InvalidDocument(_)));
    }
}
