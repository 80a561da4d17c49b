//! Predictor: single-tree traversal plus forest-level probability, label,
//! and margin aggregation.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::forest::Forest;
use crate::sample::{Label, Sample};

/// `probability(label) = count(label) / n_trees`. Labels with zero votes
/// are simply absent from the map.
pub fn predict_proba(forest: &Forest, sample: &Sample) -> HashMap<Label, f64> {
    let mut counts: HashMap<Label, usize> = HashMap::new();
    for entry in &forest.entries {
        *counts.entry(entry.tree.predict(sample)).or_insert(0) += 1;
    }

    let n_trees = forest.n_trees() as f64;
    counts
        .into_iter()
        .map(|(label, c)| (label, c as f64 / n_trees))
        .collect()
}

fn tied_at_max(probs: &HashMap<Label, f64>) -> (f64, Vec<Label>) {
    let max_p = probs
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let mut tied: Vec<Label> = probs
        .iter()
        .filter(|&(_, &p)| p == max_p)
        .map(|(&l, _)| l)
        .collect();
    tied.sort_unstable();
    (max_p, tied)
}

/// Labels tied at the maximum probability; one is picked uniformly at
/// random.
pub fn predict_label(forest: &Forest, sample: &Sample, rng: &mut impl Rng) -> (Label, f64) {
    let probs = predict_proba(forest, sample);
    let (max_p, tied) = tied_at_max(&probs);
    let chosen = *tied
        .choose(rng)
        .expect("forest must have produced at least one vote");
    (chosen, max_p)
}

/// As `predict_label`, plus the margin between the chosen label's
/// probability and the next-highest competitor.
///
/// Matches the reference behavior exactly: "next-highest competitor" is
/// computed over the tied-candidate set, not the full label distribution.
/// When more than one label ties for the maximum, every other tied
/// candidate shares the same probability as the chosen one, so the margin
/// collapses to `0.0`; when the maximum is unique, there is no "other" tied
/// candidate and the margin is the chosen probability itself. See
/// `predict_label_margin_global` for the alternative definition computed
/// over the full distribution.
pub fn predict_label_margin(forest: &Forest, sample: &Sample, rng: &mut impl Rng) -> (Label, f64, f64) {
    let probs = predict_proba(forest, sample);
    let (max_p, tied) = tied_at_max(&probs);
    let chosen = *tied
        .choose(rng)
        .expect("forest must have produced at least one vote");

    let other_max = tied
        .iter()
        .filter(|&&l| l != chosen)
        .map(|&l| probs[&l])
        .fold(0.0, f64::max);

    (chosen, max_p, max_p - other_max)
}

/// Alternative margin definition: the gap to the highest-probability label
/// other than the chosen one, taken over the *full* distribution rather
/// than just the tied-candidate set. Exposed per spec.md §9's open
/// question so a caller who wants the more intuitive reading has it
/// without forking the crate.
pub fn predict_label_margin_global(forest: &Forest, sample: &Sample, rng: &mut impl Rng) -> (Label, f64, f64) {
    let probs = predict_proba(forest, sample);
    let (max_p, tied) = tied_at_max(&probs);
    let chosen = *tied
        .choose(rng)
        .expect("forest must have produced at least one vote");

    let other_max = probs
        .iter()
        .filter(|&(&l, _)| l != chosen)
        .map(|(_, &p)| p)
        .fold(0.0, f64::max);

    (chosen, max_p, max_p - other_max)
}

/// Batched `predict_label` over `samples`, preserving input order. Fans
/// out across `ncores` workers when the batch is large enough to be worth
/// it, pre-drawing one seed per sample from `master_rng` so the tie-break
/// draws stay reproducible regardless of how the batch is scheduled —
/// the same seed-then-dispatch trick `forest::build_forest` uses for trees.
pub fn predict_many(
    master_rng: &mut impl Rng,
    forest: &Forest,
    samples: &[&Sample],
    ncores: usize,
) -> Vec<(Label, f64)> {
    let seeds: Vec<u32> = (0..samples.len()).map(|_| master_rng.gen()).collect();

    if samples.len() < 64 || ncores <= 1 {
        return samples
            .iter()
            .zip(seeds.iter())
            .map(|(&s, &seed)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
                predict_label(forest, s, &mut rng)
            })
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ncores)
        .build()
        .expect("failed to build prediction worker pool");
    pool.install(|| {
        samples
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&s, &seed)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
                predict_label(forest, s, &mut rng)
            })
            .collect()
    })
}

/// Batched `predict_label_margin`, same ordering/parallelism story as
/// `predict_many`.
pub fn predict_many_margin(
    master_rng: &mut impl Rng,
    forest: &Forest,
    samples: &[&Sample],
    ncores: usize,
) -> Vec<(Label, f64, f64)> {
    let seeds: Vec<u32> = (0..samples.len()).map(|_| master_rng.gen()).collect();

    if samples.len() < 64 || ncores <= 1 {
        return samples
            .iter()
            .zip(seeds.iter())
            .map(|(&s, &seed)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
                predict_label_margin(forest, s, &mut rng)
            })
            .collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ncores)
        .build()
        .expect("failed to build prediction worker pool");
    pool.install(|| {
        samples
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(&s, &seed)| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
                predict_label_margin(forest, s, &mut rng)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criterion::Metric;
    use crate::sample::TrainingSet;
    use crate::tree::TreeBuilder;
    use rand::SeedableRng;
    use std::collections::HashMap as Map;

    fn sample(v: i64, label: Label) -> Sample {
        let mut f = Map::new();
        f.insert(0, v);
        Sample::new(f, label)
    }

    fn single_class_forest() -> Forest {
        let dataset = TrainingSet::new((0..10).map(|_| sample(1, 7)).collect());
        let builder = TreeBuilder::new(1, 10, 1, Metric::Gini);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut entries = Vec::new();
        for _ in 0..5 {
            let (tree, oob) = builder.build(&mut rng, &dataset);
            entries.push(crate::forest::TreeEntry {
                tree,
                oob_indices: oob,
            });
        }
        Forest { entries }
    }

    /// S2 from spec.md §8: single-class training data.
    #[test]
    fn single_class_forest_predicts_with_probability_one() {
        let forest = single_class_forest();
        let query = sample(1, 99);
        let probs = predict_proba(&forest, &query);

        assert_eq!(probs.len(), 1);
        assert_eq!(probs[&7], 1.0);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let (label, prob) = predict_label(&forest, &query, &mut rng);
        assert_eq!(label, 7);
        assert_eq!(prob, 1.0);
    }

    /// Probability-sum property from spec.md §8 property 5.
    #[test]
    fn probabilities_sum_to_one() {
        let forest = single_class_forest();
        let query = sample(1, 0);
        let probs = predict_proba(&forest, &query);
        let total: f64 = probs.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn margin_is_zero_when_multiple_labels_tie() {
        // Two trees, two different leaves: 0.5/0.5 split.
        let mut entries = Vec::new();
        entries.push(crate::forest::TreeEntry {
            tree: crate::tree::Tree::Leaf(0),
            oob_indices: vec![],
        });
        entries.push(crate::forest::TreeEntry {
            tree: crate::tree::Tree::Leaf(1),
            oob_indices: vec![],
        });
        let forest = Forest { entries };
        let query = sample(0, 0);

        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let (_, prob, margin) = predict_label_margin(&forest, &query, &mut rng);
        assert_eq!(prob, 0.5);
        assert_eq!(margin, 0.0);
    }

    #[test]
    fn margin_equals_probability_when_maximum_is_unique() {
        let forest = single_class_forest();
        let query = sample(1, 0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (label, prob, margin) = predict_label_margin(&forest, &query, &mut rng);
        assert_eq!(label, 7);
        assert_eq!(prob, 1.0);
        assert_eq!(margin, 1.0);
    }

    #[test]
    fn predict_many_preserves_input_order() {
        let forest = single_class_forest();
        let queries: Vec<Sample> = (0..5).map(|i| sample(i, 0)).collect();
        let refs: Vec<&Sample> = queries.iter().collect();

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let results = predict_many(&mut rng, &forest, &refs, 1);
        assert_eq!(results.len(), 5);
        for (label, prob) in results {
            assert_eq!(label, 7);
            assert_eq!(prob, 1.0);
        }
    }
}
