//! Canonical itemsets and the frequent itemset table.

use std::collections::HashMap;

use crate::transactions::{Item, ItemId, TransactionSet};

/// Returns true if `itemset` is a subset of `transaction`.
///
/// Both slices must be strictly ascending; the check is a single merge walk,
/// O(|itemset| + |transaction|).
pub(crate) fn is_subset_of(itemset: &[ItemId], transaction: &[ItemId]) -> bool {
    let mut t = transaction.iter();
    'outer: for needle in itemset {
        for candidate in t.by_ref() {
            if candidate == needle {
                continue 'outer;
            }
            if candidate > needle {
                return false;
            }
        }
        return false;
    }
    true
}

/// Support counts for every frequent itemset, accumulated across all mining
/// levels.
///
/// Grows monotonically while mining runs and is immutable afterwards. Keys
/// are canonical (strictly ascending) id vectors; supports are derived on
/// demand as count / transaction total.
#[derive(Debug, Clone)]
pub struct FrequentItemsets {
    counts: HashMap<Vec<ItemId>, u64>,
    total_transactions: usize,
    max_itemset_len: usize,
}

impl FrequentItemsets {
    pub(crate) fn new(total_transactions: usize) -> Self {
        Self {
            counts: HashMap::new(),
            total_transactions,
            max_itemset_len: 0,
        }
    }

    pub(crate) fn insert(&mut self, itemset: Vec<ItemId>, count: u64) {
        self.max_itemset_len = self.max_itemset_len.max(itemset.len());
        self.counts.insert(itemset, count);
    }

    /// Number of frequent itemsets in the table.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no itemset met the support threshold.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of transactions the supports are measured against.
    pub fn total_transactions(&self) -> usize {
        self.total_transactions
    }

    /// Size of the largest frequent itemset.
    pub fn max_itemset_len(&self) -> usize {
        self.max_itemset_len
    }

    pub(crate) fn count(&self, itemset: &[ItemId]) -> Option<u64> {
        self.counts.get(itemset).copied()
    }

    /// Support of an itemset, or `None` if it is not frequent.
    pub(crate) fn support(&self, itemset: &[ItemId]) -> Option<f64> {
        self.count(itemset)
            .map(|c| c as f64 / self.total_transactions as f64)
    }

    pub(crate) fn contains(&self, itemset: &[ItemId]) -> bool {
        self.counts.contains_key(itemset)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Vec<ItemId>, u64)> {
        self.counts.iter().map(|(k, &v)| (k, v))
    }

    /// Decoded view of the table: every frequent itemset with its support,
    /// ordered by size then canonical item order.
    ///
    /// `dataset` must be the transaction set this table was mined from.
    pub fn itemsets<T: Item>(&self, dataset: &TransactionSet<T>) -> Vec<(Vec<T>, f64)> {
        let mut decoded: Vec<_> = self
            .counts
            .iter()
            .map(|(ids, &count)| {
                (
                    dataset.decode(ids),
                    count as f64 / self.total_transactions as f64,
                )
            })
            .collect();
        decoded.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
        decoded
    }
}
