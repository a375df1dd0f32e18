use crate::models::OptionContract;

/// Highest-scoring contract; the first one wins a tie.
///
/// Contracts without a score are ignored, and so are contracts scored exactly
/// zero: a zero score is read as "no signal" rather than a low one.
// TODO: a legitimately tiny score of 0.0 is indistinguishable from "no signal" here;
// revisit once scores carry an explicit validity flag.
pub fn select_best(contracts: &[OptionContract]) -> Option<&OptionContract> {
    contracts
        .iter()
        .filter_map(|c| c.score.filter(|s| s.is_finite() && *s != 0.0).map(|s| (c, s)))
        .fold(None::<(&OptionContract, f64)>, |best, (c, s)| match best {
            Some((_, best_score)) if best_score >= s => best,
            _ => Some((c, s)),
        })
        .map(|(c, _)| c)
}
