//! OOB Evaluator: joins per-tree out-of-bag predictions into a single
//! (truth, predicted) array, plus the scoring derivatives computed from it.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::forest::Forest;
use crate::sample::{Label, TrainingSet};

/// One row's out-of-bag verdict: the true label, the majority-voted
/// predicted label among trees that didn't see this row, and that
/// majority's vote share.
#[derive(Debug, Clone, Copy)]
pub struct OobPrediction {
    pub truth: Label,
    pub predicted: Label,
    pub prob: f64,
}

/// For each row that was out-of-bag for at least one tree, gather that
/// tree's vote, then take the majority (randomly tie-broken) across those
/// votes. Rows that were in-bag for every tree are simply absent from the
/// result — not an error, just improbable.
fn collect_oob_predictions(
    rng: &mut impl Rng,
    forest: &Forest,
    training_set: &TrainingSet,
) -> Vec<OobPrediction> {
    let mut votes: HashMap<usize, Vec<Label>> = HashMap::new();

    for entry in &forest.entries {
        for &row in &entry.oob_indices {
            let prediction = entry.tree.predict(training_set.row(row));
            votes.entry(row).or_default().push(prediction);
        }
    }

    let mut rows: Vec<usize> = votes.keys().copied().collect();
    rows.sort_unstable();

    rows.into_iter()
        .map(|row| {
            let labels = &votes[&row];
            let (predicted, prob) = majority_label(labels, rng);
            OobPrediction {
                truth: training_set.row(row).label(),
                predicted,
                prob,
            }
        })
        .collect()
}

fn majority_label(labels: &[Label], rng: &mut impl Rng) -> (Label, f64) {
    debug_assert!(!labels.is_empty(), "majority_label called on an empty vote list");

    let mut counts: HashMap<Label, usize> = HashMap::new();
    for &l in labels {
        *counts.entry(l).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    let mut tied: Vec<Label> = counts
        .iter()
        .filter(|&(_, &c)| c == max_count)
        .map(|(&l, _)| l)
        .collect();
    tied.sort_unstable();

    let chosen = *tied.choose(rng).expect("tied set non-empty by construction");
    (chosen, max_count as f64 / labels.len() as f64)
}

/// `(truth, predicted)` pairs, one per row that was OOB for at least one
/// tree.
pub fn predict_oob(rng: &mut impl Rng, forest: &Forest, training_set: &TrainingSet) -> Vec<(Label, Label)> {
    collect_oob_predictions(rng, forest, training_set)
        .into_iter()
        .map(|p| (p.truth, p.predicted))
        .collect()
}

/// `(score, is_target)` pairs for class `target`, ready to hand to an
/// external ROC/AUC routine: `score` is the OOB majority's vote share when
/// it predicted `target`, or its complement otherwise.
pub fn roc_auc_pairs(
    rng: &mut impl Rng,
    forest: &Forest,
    training_set: &TrainingSet,
    target: Label,
) -> Vec<(f64, bool)> {
    collect_oob_predictions(rng, forest, training_set)
        .into_iter()
        .map(|p| {
            let score = if p.predicted == target { p.prob } else { 1.0 - p.prob };
            (score, p.truth == target)
        })
        .collect()
}

pub fn accuracy(pairs: &[(Label, Label)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let correct = pairs.iter().filter(|(truth, pred)| truth == pred).count();
    correct as f64 / pairs.len() as f64
}

/// Matthews correlation coefficient for one-vs-rest of `target`. Returns
/// `0.0` when the denominator is zero, per spec's documented convention.
pub fn mcc(pairs: &[(Label, Label)], target: Label) -> f64 {
    let mut tp = 0u64;
    let mut tn = 0u64;
    let mut fp = 0u64;
    let mut fn_ = 0u64;

    for &(truth, pred) in pairs {
        match (truth == target, pred == target) {
            (true, true) => tp += 1,
            (true, false) => fn_ += 1,
            (false, true) => fp += 1,
            (false, false) => tn += 1,
        }
    }

    let numerator = (tp * tn) as f64 - (fp * fn_) as f64;
    let denom_sq = (tp + fp) as f64 * (tp + fn_) as f64 * (tn + fp) as f64 * (tn + fn_) as f64;
    if denom_sq == 0.0 {
        return 0.0;
    }
    numerator / denom_sq.sqrt()
}
