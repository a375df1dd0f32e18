pub mod chain;
pub mod config;
pub mod error;
pub mod expiry;
pub mod finnhub_client;
pub mod logging;
pub mod models;
pub mod processor;
pub mod scorer;
pub mod selector;
pub mod source;

// Re-exports for convenience
pub use chain::{parse_chain, parse_chain_value};
pub use error::ChainError;
pub use expiry::target_expiration;
pub use finnhub_client::FinnhubClient;
pub use models::{BestOption, OptionContract, OptionType, SymbolReport};
pub use processor::{RunContext, evaluate_symbol, process_all};
pub use scorer::{ScoringWeights, score};
pub use selector::select_best;
pub use source::{OptionChainSource, StubSource};
