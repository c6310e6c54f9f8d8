//! # Basket Miner - Association Rule Mining for Rust
//!
//! Basket Miner discovers frequent co-occurrence patterns across multi-item
//! transactions and turns them into ranked "if A then B" recommendation
//! rules. It implements the classic Apriori algorithm: level-wise candidate
//! generation with subset pruning, support counting over the full batch, and
//! statistically defined rule filtering by support, confidence, and lift.
//!
//! ## Quick Start
//!
//! ```rust
//! use basket_miner::{mine_rules, MiningParams};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transactions = vec![
//!     vec!["milk", "bread"],
//!     vec!["milk", "bread", "eggs"],
//!     vec!["bread", "eggs"],
//!     vec!["milk", "bread", "eggs"],
//! ];
//!
//! let params = MiningParams::builder()
//!     .min_support(0.5)
//!     .min_confidence(0.75)
//!     .min_lift(1.0)
//!     .build()?;
//!
//! let rules = mine_rules(transactions, &params)?;
//! for rule in &rules {
//!     // e.g. "{milk} => {bread} (support 0.7500, confidence 1.0000, lift 1.0000)"
//!     println!("{rule}");
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Key Properties
//!
//! - **Pure and deterministic**: `mine_rules` is a pure function from
//!   (transactions, thresholds) to a rule list; identical input yields an
//!   identical list, including order. Callers own presentation and caching.
//! - **Inclusive thresholds**: support, confidence, and lift comparisons all
//!   retain ties (`>=`), so borderline itemsets and rules survive.
//! - **Apriori pruning**: candidates with any infrequent subset are discarded
//!   before the data is scanned again.
//! - **Parallel counting**: support counting over large transaction sets is
//!   partitioned across worker threads and merged, with results identical to
//!   a sequential scan.
//!
//! ## Architecture
//!
//! Data flows strictly forward through immutable stages:
//!
//! - **`transactions`**: normalization - per-transaction dedup, sorted
//!   vocabulary, dense item-id encoding ([`TransactionSet`]).
//! - **`miner`**: the level-wise [`Apriori`] miner producing a
//!   [`FrequentItemsets`] table.
//! - **`rules`**: antecedent/consequent enumeration ([`generate`]) and
//!   threshold filtering with deterministic ranking ([`filter_and_rank`]).
//! - **`params`**: validated [`MiningParams`] thresholds.
//! - **`error`**: [`MinerError`] and the crate [`Result`] alias.
//!
//! The stages are public, so a mined table can be reused across several
//! threshold sweeps without re-scanning the data; [`mine_rules`] composes
//! them for the common case.

pub mod error;
pub mod itemset;
pub mod miner;
pub mod params;
pub mod prelude;
pub mod rules;
pub mod transactions;

pub use error::{MinerError, Result};
pub use itemset::FrequentItemsets;
pub use miner::Apriori;
pub use params::{MiningParams, MiningParamsBuilder};
pub use rules::{filter_and_rank, generate, Rule};
pub use transactions::{distinct_items, Item, TransactionSet};

use tracing::instrument;

/// Mines ranked association rules from a batch of transactions.
///
/// The single entry point of the crate: normalizes the raw transactions,
/// mines frequent itemsets at `min_support`, enumerates every
/// antecedent/consequent split of itemsets with at least
/// max(2, `min_length`) items, and returns the rules meeting
/// `min_confidence` and `min_lift`, ranked by lift descending, confidence
/// descending, then canonical item order.
///
/// Duplicate items within one raw transaction collapse; callers are expected
/// to have dropped missing-value sentinels. An empty transaction batch
/// yields an empty rule list.
///
/// # Errors
///
/// Fails fast with [`MinerError::InvalidParameter`] if any threshold is out
/// of range, before any mining pass runs.
#[instrument(skip_all, fields(
    min_support = params.min_support,
    min_confidence = params.min_confidence,
    min_lift = params.min_lift,
))]
pub fn mine_rules<T, I, J>(transactions: I, params: &MiningParams) -> Result<Vec<Rule<T>>>
where
    T: Item,
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = T>,
{
    params.validate()?;

    let dataset = TransactionSet::from_transactions(transactions);
    let table = Apriori::new(params.clone()).mine(&dataset)?;
    let candidates = generate(&table, &dataset, params.min_length)?;
    Ok(filter_and_rank(
        candidates,
        params.min_confidence,
        params.min_lift,
    ))
}
