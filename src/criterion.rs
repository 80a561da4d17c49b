//! Impurity and split cost.

use crate::error::ForestError;
use crate::sample::{Label, Sample};
use std::collections::HashMap;

/// Selectable node-impurity metric.
///
/// Only `Gini` is implemented. `Shannon` and `Mcc` are declared so the
/// config surface matches what a caller might reasonably expect from a
/// classification forest, but selecting either is rejected with
/// `ForestError::Unimplemented` at `train` time, per spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    Gini,
    Shannon,
    Mcc,
}

impl Metric {
    pub fn validate(self) -> Result<(), ForestError> {
        match self {
            Metric::Gini => Ok(()),
            Metric::Shannon => Err(ForestError::Unimplemented("shannon entropy")),
            Metric::Mcc => Err(ForestError::Unimplemented(
                "matthews correlation coefficient as a split metric",
            )),
        }
    }

    /// Gini impurity `1 - sum(p_k^2)` over the label distribution of
    /// `samples`. Zero for a pure (or empty, though that path is never
    /// taken) node.
    ///
    /// Ignores `self`: callers reach this only after `validate` has already
    /// confirmed the metric is `Gini`, so there is nothing left to dispatch
    /// on in a function that runs once per candidate threshold per node.
    pub fn impurity(self, samples: &[&Sample]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }

        let mut counts: HashMap<Label, usize> = HashMap::new();
        for s in samples {
            *counts.entry(s.label()).or_insert(0) += 1;
        }

        let n = samples.len() as f64;
        let sum_sq: f64 = counts
            .values()
            .map(|&c| {
                let p = c as f64 / n;
                p * p
            })
            .sum();

        1.0 - sum_sq
    }

    /// Cardinality-weighted split cost. Either side may be empty; the cost
    /// then degenerates to the impurity of the non-empty side so a maximal
    /// threshold (empty right side) doesn't produce a spurious
    /// division-by-zero artifact.
    pub fn cost(self, left: &[&Sample], right: &[&Sample]) -> f64 {
        let l = left.len();
        let r = right.len();
        debug_assert!(l + r > 0, "cost called on two empty sides");

        if l == 0 {
            return self.impurity(right);
        }
        if r == 0 {
            return self.impurity(left);
        }

        let n = (l + r) as f64;
        (l as f64 / n) * self.impurity(left) + (r as f64 / n) * self.impurity(right)
    }
}

/// Majority class in `samples`, with uniform-random tie-break among classes
/// sharing the maximum count.
///
/// # Panics
///
/// In debug builds, `debug_assert!`s that `samples` is non-empty: callers
/// must never invoke this on an empty slice (spec.md §4.5 treats it as an
/// unreachable invariant, not a recoverable error).
pub fn majority_class(samples: &[&Sample], rng: &mut impl rand::Rng) -> Label {
    debug_assert!(!samples.is_empty(), "majority_class called on empty set");

    let mut counts: HashMap<Label, usize> = HashMap::new();
    for s in samples {
        *counts.entry(s.label()).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    let mut tied: Vec<Label> = counts
        .into_iter()
        .filter(|&(_, c)| c == max_count)
        .map(|(label, _)| label)
        .collect();
    tied.sort_unstable();

    use rand::seq::SliceRandom;
    *tied
        .choose(rng)
        .expect("tied set cannot be empty when samples is non-empty")
}
