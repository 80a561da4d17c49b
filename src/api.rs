//! Thin façade wiring the engine's components to spec.md §6's external
//! interface shape: one entry point per verb (`train`, `predict_*`,
//! `predict_oob`, the scoring derivatives, `save`/`restore`), each just
//! validating/resolving its config and delegating to the module that owns
//! the actual algorithm.

use rand::Rng;

use crate::config::ForestConfig;
use crate::error::ForestError;
use crate::forest::{build_forest, Forest};
use crate::oob;
use crate::predict;
use crate::sample::{Label, Sample, TrainingSet};

/// Resolve and validate `config` against `dataset`, draw the per-tree seed
/// stream from `master_rng`, and grow the forest. Validation happens before
/// any worker is dispatched, per spec.md §7.
pub fn train(
    master_rng: &mut impl Rng,
    config: &ForestConfig,
    dataset: &TrainingSet,
) -> Result<Forest, ForestError> {
    if dataset.is_empty() {
        return Err(ForestError::invalid("training set must be non-empty"));
    }
    let card_features = crate::features::non_constant_features(
        &(0..dataset.n_samples()).map(|i| dataset.row(i)).collect::<Vec<_>>(),
    )
    .len()
    .max(1);

    let resolved = config.resolve(dataset.n_samples(), card_features)?;
    build_forest(master_rng, &resolved, dataset)
}

pub fn predict_proba(forest: &Forest, sample: &Sample) -> std::collections::HashMap<Label, f64> {
    predict::predict_proba(forest, sample)
}

pub fn predict_label(forest: &Forest, sample: &Sample, rng: &mut impl Rng) -> (Label, f64) {
    predict::predict_label(forest, sample, rng)
}

pub fn predict_label_margin(forest: &Forest, sample: &Sample, rng: &mut impl Rng) -> (Label, f64, f64) {
    predict::predict_label_margin(forest, sample, rng)
}

pub fn predict_many(
    master_rng: &mut impl Rng,
    forest: &Forest,
    samples: &[&Sample],
    ncores: usize,
) -> Vec<(Label, f64)> {
    predict::predict_many(master_rng, forest, samples, ncores)
}

pub fn predict_many_margin(
    master_rng: &mut impl Rng,
    forest: &Forest,
    samples: &[&Sample],
    ncores: usize,
) -> Vec<(Label, f64, f64)> {
    predict::predict_many_margin(master_rng, forest, samples, ncores)
}

pub fn predict_oob(rng: &mut impl Rng, forest: &Forest, training_set: &TrainingSet) -> Vec<(Label, Label)> {
    oob::predict_oob(rng, forest, training_set)
}

pub fn accuracy(pairs: &[(Label, Label)]) -> f64 {
    oob::accuracy(pairs)
}

pub fn mcc(pairs: &[(Label, Label)], target: Label) -> f64 {
    oob::mcc(pairs, target)
}

pub fn roc_auc_pairs(
    rng: &mut impl Rng,
    forest: &Forest,
    training_set: &TrainingSet,
    target: Label,
) -> Vec<(f64, bool)> {
    oob::roc_auc_pairs(rng, forest, training_set, target)
}

pub fn drop_oob(forest: Forest) -> Forest {
    forest.drop_oob()
}

#[cfg(feature = "serde")]
pub fn save(path: impl AsRef<std::path::Path>, forest: &Forest) -> Result<(), ForestError> {
    crate::persist::save(path, forest)
}

#[cfg(feature = "serde")]
pub fn restore(path: impl AsRef<std::path::Path>) -> Result<Forest, ForestError> {
    crate::persist::restore(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RatioOrCount;
    use crate::criterion::Metric;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn sample(pairs: &[(u32, i64)], label: Label) -> Sample {
        Sample::new(pairs.iter().cloned().collect::<HashMap<_, _>>(), label)
    }

    /// S1 from spec.md §8: trivial AND-like separable data, trained through
    /// the public façade end to end.
    #[test]
    fn s1_and_like_training_points_predict_their_own_label() {
        let samples = vec![
            sample(&[(0, 1), (1, 1)], 1),
            sample(&[(0, 1)], 0),
            sample(&[(1, 1)], 0),
            sample(&[], 0),
        ];
        let dataset = TrainingSet::new(samples);

        let config = ForestConfig::new(11)
            .with_max_features(RatioOrCount::Count(2))
            .with_max_samples(RatioOrCount::Count(4))
            .with_min_node_size(1)
            .with_metric(Metric::Gini);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let forest = train(&mut rng, &config, &dataset).unwrap();

        let mut correct = 0;
        for i in 0..dataset.n_samples() {
            let mut pred_rng = ChaCha8Rng::seed_from_u64(i as u64);
            let (label, _) = predict_label(&forest, dataset.row(i), &mut pred_rng);
            if label == dataset.row(i).label() {
                correct += 1;
            }
        }
        assert_eq!(correct, dataset.n_samples(), "expected perfect training accuracy on separable data");
    }

    /// S2 from spec.md §8: a single-class dataset always predicts that
    /// class with probability 1.0, and every tree is a bare leaf.
    #[test]
    fn s2_single_class_dataset_is_unanimous() {
        let samples: Vec<_> = (0..10).map(|_| sample(&[(0, 1)], 7)).collect();
        let dataset = TrainingSet::new(samples);

        let config = ForestConfig::new(9)
            .with_max_features(RatioOrCount::Count(1))
            .with_max_samples(RatioOrCount::Count(10))
            .with_min_node_size(1)
            .with_metric(Metric::Gini);

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let forest = train(&mut rng, &config, &dataset).unwrap();

        for entry in &forest.entries {
            assert!(entry.tree.is_leaf());
        }

        let query = sample(&[(0, 1)], 0);
        let probs = predict_proba(&forest, &query);
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[&7], 1.0);
    }

    /// S3 from spec.md §8: a feature that is constant across the whole
    /// training set is never chosen as a split feature anywhere in the
    /// forest.
    #[test]
    fn s3_constant_feature_is_never_split_on() {
        let samples: Vec<_> = (0..50)
            .map(|i| {
                let v = (i % 4) as i64;
                sample(&[(3, v), (5, 42)], v as u32)
            })
            .collect();
        let dataset = TrainingSet::new(samples);

        let config = ForestConfig::new(15)
            .with_max_features(RatioOrCount::Count(2))
            .with_max_samples(RatioOrCount::Count(50))
            .with_min_node_size(2)
            .with_metric(Metric::Gini);

        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let forest = train(&mut rng, &config, &dataset).unwrap();

        fn walk(tree: &crate::tree::Tree, forbidden: u32) {
            if let crate::tree::Tree::Internal { feature, left, right, .. } = tree {
                assert_ne!(*feature, forbidden);
                walk(left, forbidden);
                walk(right, forbidden);
            }
        }
        for entry in &forest.entries {
            walk(&entry.tree, 5);
        }
    }

    /// S6 from spec.md §8: ratio-or-count resolution via the façade's
    /// `train` entry point (empty/invalid ratios rejected at the boundary).
    #[test]
    fn s6_invalid_ratio_rejected_before_training_starts() {
        let samples: Vec<_> = (0..20).map(|i| sample(&[(0, (i % 3) as i64)], (i % 2) as u32)).collect();
        let dataset = TrainingSet::new(samples);

        let config = ForestConfig::new(5)
            .with_max_features(RatioOrCount::Ratio(1.5))
            .with_max_samples(RatioOrCount::Count(20))
            .with_min_node_size(1);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(train(&mut rng, &config, &dataset).is_err());
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let dataset = TrainingSet::new(vec![]);
        let config = ForestConfig::new(5);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(train(&mut rng, &config, &dataset).is_err());
    }
}
