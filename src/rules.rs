//! Association rule generation, filtering, and ranking.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MinerError, Result};
use crate::itemset::FrequentItemsets;
use crate::transactions::{Item, TransactionSet};

/// An association rule `antecedent ⇒ consequent` with its metrics.
///
/// Antecedent and consequent are disjoint, each sorted in canonical item
/// order, and their union is a frequent itemset. `support` is the support of
/// the union; `confidence` is support(union) / support(antecedent); `lift` is
/// confidence / support(consequent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<T> {
    /// The "if" side of the rule.
    pub antecedent: Vec<T>,
    /// The "then" side of the rule.
    pub consequent: Vec<T>,
    /// Fraction of transactions containing antecedent and consequent together.
    pub support: f64,
    /// Conditional probability of the consequent given the antecedent.
    pub confidence: f64,
    /// Observed co-occurrence relative to independence; > 1 means positive
    /// association.
    pub lift: f64,
}

impl<T> Rule<T> {
    /// Total number of items across both sides.
    pub fn len(&self) -> usize {
        self.antecedent.len() + self.consequent.len()
    }

    /// Returns true if the rule has no items; never the case for generated
    /// rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: fmt::Display> fmt::Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        write!(f, "{{")?;
        join(f, &self.antecedent)?;
        write!(f, "}} => {{")?;
        join(f, &self.consequent)?;
        write!(
            f,
            "}} (support {:.4}, confidence {:.4}, lift {:.4})",
            self.support, self.confidence, self.lift
        )
    }
}

/// Enumerates every antecedent/consequent split of the frequent itemsets.
///
/// Each itemset of size ≥ max(2, `min_length`) contributes one rule per
/// non-empty proper subset taken as the antecedent. The output is unfiltered;
/// apply [`filter_and_rank`] to get the final rule list.
///
/// `dataset` must be the transaction set the table was mined from; it
/// supplies the item tokens for the emitted rules.
///
/// Relies on the miner's output invariant that every subset of a frequent
/// itemset is itself in the table; a missing subset is reported as
/// [`MinerError::InvariantViolation`] rather than skipped.
pub fn generate<T: Item>(
    table: &FrequentItemsets,
    dataset: &TransactionSet<T>,
    min_length: usize,
) -> Result<Vec<Rule<T>>> {
    let floor = min_length.max(2);

    let mut eligible: Vec<_> = table
        .iter()
        .filter(|(itemset, _)| itemset.len() >= floor)
        .collect();
    // Canonical itemset order keeps subset enumeration deterministic.
    eligible.sort_unstable_by(|a, b| a.0.cmp(b.0));

    let mut rules = Vec::new();
    for (itemset, count) in eligible {
        let union_support = count as f64 / table.total_transactions() as f64;
        let k = itemset.len();

        for mask in 1..(1u64 << k) - 1 {
            let mut antecedent = Vec::with_capacity(mask.count_ones() as usize);
            let mut consequent = Vec::with_capacity(k - mask.count_ones() as usize);
            for (bit, &id) in itemset.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    antecedent.push(id);
                } else {
                    consequent.push(id);
                }
            }

            let antecedent_support = table.support(&antecedent).ok_or_else(|| {
                MinerError::invariant(format!(
                    "subset {antecedent:?} of frequent itemset {itemset:?} missing from table"
                ))
            })?;
            let consequent_support = table.support(&consequent).ok_or_else(|| {
                MinerError::invariant(format!(
                    "subset {consequent:?} of frequent itemset {itemset:?} missing from table"
                ))
            })?;
            // A tabulated antecedent always has nonzero support; skip the
            // split rather than divide by zero if that ever breaks.
            if antecedent_support == 0.0 {
                continue;
            }

            let confidence = union_support / antecedent_support;
            let lift = confidence / consequent_support;
            rules.push(Rule {
                antecedent: dataset.decode(&antecedent),
                consequent: dataset.decode(&consequent),
                support: union_support,
                confidence,
                lift,
            });
        }
    }

    debug!(candidate_rules = rules.len(), "rule enumeration complete");
    Ok(rules)
}

/// Filters rules by the confidence and lift thresholds (inclusive) and sorts
/// the survivors deterministically.
///
/// Order: lift descending, then confidence descending, then canonical
/// (antecedent, consequent) ascending. The result is reproducible regardless
/// of the enumeration order upstream.
pub fn filter_and_rank<T: Item>(
    rules: Vec<Rule<T>>,
    min_confidence: f64,
    min_lift: f64,
) -> Vec<Rule<T>> {
    let mut kept: Vec<_> = rules
        .into_iter()
        .filter(|rule| rule.confidence >= min_confidence && rule.lift >= min_lift)
        .collect();
    kept.sort_by(|a, b| {
        b.lift
            .total_cmp(&a.lift)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    debug!(rules = kept.len(), "filtering and ranking complete");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::Apriori;
    use crate::params::MiningParams;

    fn grocery_dataset() -> TransactionSet<&'static str> {
        TransactionSet::from_transactions(vec![
            vec!["milk", "bread"],
            vec!["milk", "bread", "eggs"],
            vec!["bread", "eggs"],
            vec!["milk", "bread", "eggs"],
        ])
    }

    fn grocery_table(dataset: &TransactionSet<&'static str>) -> FrequentItemsets {
        let params = MiningParams::builder().min_support(0.5).build().unwrap();
        Apriori::new(params).mine(dataset).unwrap()
    }

    fn find<'a>(
        rules: &'a [Rule<&'static str>],
        antecedent: &[&str],
        consequent: &[&str],
    ) -> &'a Rule<&'static str> {
        rules
            .iter()
            .find(|r| r.antecedent == antecedent && r.consequent == consequent)
            .unwrap()
    }

    #[test]
    fn computes_confidence_and_lift() {
        let dataset = grocery_dataset();
        let table = grocery_table(&dataset);
        let rules = generate(&table, &dataset, 2).unwrap();

        // {milk} => {bread}: support 0.75, confidence 0.75/0.75 = 1.0,
        // lift 1.0 / 1.0 = 1.0.
        let rule = find(&rules, &["milk"], &["bread"]);
        assert!((rule.support - 0.75).abs() < 1e-12);
        assert!((rule.confidence - 1.0).abs() < 1e-12);
        assert!((rule.lift - 1.0).abs() < 1e-12);

        // {bread} => {milk}: confidence 0.75, lift 0.75/0.75 = 1.0.
        let rule = find(&rules, &["bread"], &["milk"]);
        assert!((rule.confidence - 0.75).abs() < 1e-12);
        assert!((rule.lift - 1.0).abs() < 1e-12);

        // {eggs, milk} => {bread}: support 0.5, confidence 1.0, lift 1.0.
        let rule = find(&rules, &["eggs", "milk"], &["bread"]);
        assert!((rule.support - 0.5).abs() < 1e-12);
        assert!((rule.confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn split_count_per_itemset() {
        let dataset = grocery_dataset();
        let table = grocery_table(&dataset);
        let rules = generate(&table, &dataset, 2).unwrap();

        // 3 pairs contribute 2 splits each, the triple contributes 2^3 - 2.
        assert_eq!(rules.len(), 3 * 2 + 6);
        for rule in &rules {
            assert!(!rule.antecedent.is_empty());
            assert!(!rule.consequent.is_empty());
            assert!(rule.len() >= 2);
        }
    }

    #[test]
    fn min_length_raises_the_floor() {
        let dataset = grocery_dataset();
        let table = grocery_table(&dataset);
        let rules = generate(&table, &dataset, 3).unwrap();

        // Only the triple qualifies.
        assert_eq!(rules.len(), 6);
        assert!(rules.iter().all(|r| r.len() == 3));
    }

    #[test]
    fn missing_subset_is_an_invariant_violation() {
        let dataset = grocery_dataset();
        let mut table = FrequentItemsets::new(4);
        // A pair without its singleton subsets: a corrupt miner output.
        table.insert(vec![0, 2], 3);

        let err = generate(&table, &dataset, 2).unwrap_err();
        assert!(matches!(err, MinerError::InvariantViolation(_)));
    }

    #[test]
    fn filter_applies_inclusive_thresholds() {
        let dataset = grocery_dataset();
        let table = grocery_table(&dataset);
        let rules = generate(&table, &dataset, 2).unwrap();

        let ranked = filter_and_rank(rules, 1.0, 0.0);
        assert!(!ranked.is_empty());
        for rule in &ranked {
            assert!(rule.confidence >= 1.0);
        }
        // {bread} => {milk} sits at confidence 0.75 and must be gone.
        assert!(!ranked
            .iter()
            .any(|r| r.antecedent == ["bread"] && r.consequent == ["milk"]));
    }

    #[test]
    fn ranking_orders_by_lift_confidence_then_items() {
        let mk = |antecedent: &[&'static str], consequent: &[&'static str], confidence, lift| {
            Rule {
                antecedent: antecedent.to_vec(),
                consequent: consequent.to_vec(),
                support: 0.5,
                confidence,
                lift,
            }
        };
        let rules = vec![
            mk(&["b"], &["c"], 0.9, 1.0),
            mk(&["a"], &["c"], 0.9, 2.0),
            mk(&["a"], &["b"], 0.5, 2.0),
            mk(&["a"], &["d"], 0.9, 2.0),
        ];

        let ranked = filter_and_rank(rules, 0.0, 0.0);
        let order: Vec<_> = ranked
            .iter()
            .map(|r| (r.antecedent[0], r.consequent[0]))
            .collect();
        assert_eq!(
            order,
            vec![("a", "c"), ("a", "d"), ("a", "b"), ("b", "c")]
        );
    }

    #[test]
    fn display_renders_both_sides_and_metrics() {
        let rule = Rule {
            antecedent: vec!["eggs", "milk"],
            consequent: vec!["bread"],
            support: 0.5,
            confidence: 1.0,
            lift: 1.0,
        };
        assert_eq!(
            rule.to_string(),
            "{eggs, milk} => {bread} (support 0.5000, confidence 1.0000, lift 1.0000)"
        );
    }

    #[test]
    fn rules_serialize_to_json() {
        let rule = Rule {
            antecedent: vec!["milk"],
            consequent: vec!["bread"],
            support: 0.75,
            confidence: 1.0,
            lift: 1.0,
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["antecedent"][0], "milk");
        assert_eq!(json["lift"], 1.0);
    }
}
