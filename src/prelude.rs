//! Prelude for commonly used types and functions in basket-miner.

pub use crate::error::{MinerError, Result};
pub use crate::itemset::FrequentItemsets;
pub use crate::miner::Apriori;
pub use crate::params::{MiningParams, MiningParamsBuilder};
pub use crate::rules::{filter_and_rank, generate, Rule};
pub use crate::transactions::{distinct_items, Item, TransactionSet};
pub use crate::mine_rules;
