//! Level-wise Apriori frequent itemset mining.
//!
//! Mining proceeds one itemset size at a time. Level 1 counts every distinct
//! item; each later level joins the previous level's frequent itemsets into
//! size-k candidates, discards candidates with an infrequent subset before
//! touching the data (the Apriori property), then counts the survivors in a
//! single pass over the transactions. Counting is a commutative, associative
//! reduction over per-partition states, so large transaction sets are split
//! across scoped worker threads and the partial counts merged.

use tracing::{debug, instrument};

use crate::error::Result;
use crate::itemset::{is_subset_of, FrequentItemsets};
use crate::params::MiningParams;
use crate::transactions::{Item, ItemId, TransactionSet};

/// Transaction count below which the support scan stays sequential.
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// Apriori frequent itemset miner.
///
/// # Example
///
/// ```rust
/// use basket_miner::{Apriori, MiningParams, TransactionSet};
///
/// let dataset = TransactionSet::from_transactions(vec![
///     vec!["milk", "bread"],
///     vec!["milk", "bread", "eggs"],
///     vec!["bread", "eggs"],
/// ]);
/// let params = MiningParams::builder().min_support(0.6).build().unwrap();
///
/// let table = Apriori::new(params).mine(&dataset).unwrap();
/// assert!(table.len() >= 2); // at least {bread} and {milk} or {eggs} pairs
/// ```
#[derive(Debug, Clone)]
pub struct Apriori {
    params: MiningParams,
}

impl Apriori {
    /// Creates a miner with the given thresholds.
    pub fn new(params: MiningParams) -> Self {
        Self { params }
    }

    /// Mines all itemsets whose support meets `min_support` (inclusive).
    ///
    /// An empty transaction set yields an empty table. The returned table
    /// contains every frequent size from 1 up to the termination level, so
    /// subset supports needed for rule metrics are always present.
    #[instrument(
        skip_all,
        fields(
            n_transactions = dataset.len(),
            n_items = dataset.item_count(),
            min_support = self.params.min_support,
        )
    )]
    pub fn mine<T: Item>(&self, dataset: &TransactionSet<T>) -> Result<FrequentItemsets> {
        self.params.validate()?;

        let n = dataset.len();
        let mut table = FrequentItemsets::new(n);
        if n == 0 {
            debug!("empty transaction set, nothing to mine");
            return Ok(table);
        }

        let transactions = dataset.encoded();
        let meets_support = |count: u64| count as f64 / n as f64 >= self.params.min_support;

        // Level 1: one counter per vocabulary id.
        let mut item_counts = vec![0u64; dataset.item_count()];
        for transaction in transactions {
            for &id in transaction {
                item_counts[id as usize] += 1;
            }
        }
        let mut level: Vec<Vec<ItemId>> = item_counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| meets_support(count))
            .map(|(id, _)| vec![id as ItemId])
            .collect();
        for itemset in &level {
            table.insert(itemset.clone(), item_counts[itemset[0] as usize]);
        }
        debug!(level = 1, frequent = level.len(), "level complete");

        let mut k = 2;
        while !level.is_empty() && self.params.max_length.map_or(true, |max| k <= max) {
            let joined = join_level(&level);
            let candidates: Vec<Vec<ItemId>> = joined
                .into_iter()
                .filter(|candidate| all_subsets_frequent(candidate, &table))
                .collect();
            if candidates.is_empty() {
                debug!(level = k, "no candidates survived pruning");
                break;
            }

            let counts = count_supports(&candidates, transactions);
            let mut next_level = Vec::new();
            for (candidate, count) in candidates.into_iter().zip(counts) {
                if meets_support(count) {
                    table.insert(candidate.clone(), count);
                    next_level.push(candidate);
                }
            }
            debug!(level = k, frequent = next_level.len(), "level complete");

            level = next_level;
            k += 1;
        }

        debug!(
            frequent_itemsets = table.len(),
            max_len = table.max_itemset_len(),
            "mining complete"
        );
        Ok(table)
    }
}

/// Joins a sorted level of size-(k−1) itemsets into size-k candidates.
///
/// Two itemsets join when they share their first k−2 items; the candidate is
/// that prefix plus both final items. Over a lexicographically sorted level
/// this produces each candidate exactly once, in sorted order.
fn join_level(level: &[Vec<ItemId>]) -> Vec<Vec<ItemId>> {
    let prefix_len = level.first().map_or(0, |itemset| itemset.len() - 1);
    let mut candidates = Vec::new();
    for (i, left) in level.iter().enumerate() {
        for right in &level[i + 1..] {
            if left[..prefix_len] != right[..prefix_len] {
                break;
            }
            let mut candidate = left.clone();
            candidate.push(right[prefix_len]);
            candidates.push(candidate);
        }
    }
    candidates
}

/// Returns true if every size-(k−1) subset of `candidate` is frequent.
fn all_subsets_frequent(candidate: &[ItemId], table: &FrequentItemsets) -> bool {
    let mut subset = Vec::with_capacity(candidate.len() - 1);
    for skip in 0..candidate.len() {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &id)| id),
        );
        if !table.contains(&subset) {
            return false;
        }
    }
    true
}

/// Partial support counts for one transaction partition.
///
/// Counts are positional over the candidate list, which makes the merge an
/// element-wise sum.
struct SupportCounts {
    counts: Vec<u64>,
}

impl SupportCounts {
    /// Counts candidate supersets within one partition of transactions.
    fn scan(candidates: &[Vec<ItemId>], transactions: &[Vec<ItemId>]) -> Self {
        let mut counts = vec![0u64; candidates.len()];
        for transaction in transactions {
            for (slot, candidate) in counts.iter_mut().zip(candidates) {
                if is_subset_of(candidate, transaction) {
                    *slot += 1;
                }
            }
        }
        Self { counts }
    }

    /// Merges partition states by element-wise addition.
    fn merge(states: Vec<Self>) -> Self {
        let mut merged = states
            .first()
            .map_or_else(Vec::new, |s| vec![0u64; s.counts.len()]);
        for state in states {
            for (slot, count) in merged.iter_mut().zip(state.counts) {
                *slot += count;
            }
        }
        Self { counts: merged }
    }
}

/// Counts, for each candidate, the transactions containing it.
///
/// Splits the scan across worker threads when the transaction count makes it
/// worthwhile; the per-partition states merge by summation, so the result is
/// identical to a sequential scan.
fn count_supports(candidates: &[Vec<ItemId>], transactions: &[Vec<ItemId>]) -> Vec<u64> {
    let workers = num_cpus::get().min(transactions.len().max(1));
    if workers <= 1 || transactions.len() < PARALLEL_SCAN_THRESHOLD {
        return SupportCounts::scan(candidates, transactions).counts;
    }

    let chunk_size = (transactions.len() + workers - 1) / workers;
    let states = std::thread::scope(|scope| {
        let handles: Vec<_> = transactions
            .chunks(chunk_size)
            .map(|partition| scope.spawn(move || SupportCounts::scan(candidates, partition)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("support scan worker panicked"))
            .collect::<Vec<_>>()
    });
    SupportCounts::merge(states).counts
}
