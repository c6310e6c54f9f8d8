//! Transaction normalization and item interning.
//!
//! Raw transactions arrive as iterables of item tokens with possible
//! duplicates. [`TransactionSet`] collapses duplicates, builds a sorted
//! distinct-item vocabulary, and re-encodes every transaction as a sorted
//! vector of dense item ids. Because the vocabulary is sorted before ids are
//! assigned, id order agrees with item order, so a sorted id vector is the
//! canonical form of an itemset for the rest of the pipeline.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Dense index into a [`TransactionSet`]'s vocabulary.
pub(crate) type ItemId = u32;

/// An opaque item token.
///
/// The total order supplies the canonical itemset representation; ordering
/// and equality must be stable for the duration of a mining run. Blanket
/// implemented for any qualifying type, so `&str`, `String`, integers, and
/// similar tokens work out of the box.
pub trait Item: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Item for T {}

/// A normalized, immutable batch of transactions.
///
/// # Example
///
/// ```rust
/// use basket_miner::TransactionSet;
///
/// let dataset = TransactionSet::from_transactions(vec![
///     vec!["milk", "bread", "bread"], // duplicates collapse
///     vec!["bread", "eggs"],
/// ]);
///
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.items(), &["bread", "eggs", "milk"]);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionSet<T: Item> {
    /// Sorted distinct items; an item's vocabulary index is its id.
    vocab: Vec<T>,
    /// Each transaction as a strictly ascending vector of item ids.
    encoded: Vec<Vec<ItemId>>,
}

impl<T: Item> TransactionSet<T> {
    /// Normalizes raw transactions into an interned, immutable set.
    ///
    /// Duplicate items within one transaction collapse; transaction order is
    /// preserved. Empty transactions are kept (they still count toward the
    /// support denominator).
    pub fn from_transactions<I, J>(transactions: I) -> Self
    where
        I: IntoIterator<Item = J>,
        J: IntoIterator<Item = T>,
    {
        let deduped: Vec<BTreeSet<T>> = transactions
            .into_iter()
            .map(|t| t.into_iter().collect())
            .collect();

        let mut vocab: Vec<T> = deduped
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<T>>()
            .into_iter()
            .collect();
        vocab.shrink_to_fit();

        let encoded = {
            let ids: BTreeMap<&T, ItemId> = vocab
                .iter()
                .enumerate()
                .map(|(i, item)| (item, i as ItemId))
                .collect();

            // BTreeSet iteration is ascending, so each encoded vector is
            // already sorted and canonical.
            deduped
                .iter()
                .map(|t| t.iter().map(|item| ids[item]).collect())
                .collect()
        };

        Self { vocab, encoded }
    }

    /// Number of transactions, including empty ones.
    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    /// Returns true if the set holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }

    /// The sorted distinct items observed across all transactions.
    pub fn items(&self) -> &[T] {
        &self.vocab
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.vocab.len()
    }

    pub(crate) fn encoded(&self) -> &[Vec<ItemId>] {
        &self.encoded
    }

    /// Decodes a sorted id slice back into item tokens, preserving order.
    pub(crate) fn decode(&self, ids: &[ItemId]) -> Vec<T> {
        ids.iter().map(|&id| self.vocab[id as usize].clone()).collect()
    }
}

/// Collects the distinct items appearing in any transaction, sorted.
///
/// Pure helper for presentation layers that offer per-item selection; the
/// same vocabulary is available as [`TransactionSet::items`] once a set has
/// been built.
pub fn distinct_items<T, I, J>(transactions: I) -> BTreeSet<T>
where
    T: Item,
    I: IntoIterator<Item = J>,
    J: IntoIterator<Item = T>,
{
    transactions.into_iter().flatten().collect()
}
