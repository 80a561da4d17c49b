//! Tree data structure and the recursive CART-style tree builder.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bootstrap::bootstrap;
use crate::criterion::{majority_class, Metric};
use crate::features::non_constant_features;
use crate::sample::{FeatureIndex, Label, Sample, TrainingSet, Value};
use crate::split::{all_candidates, SplitScratch};

/// A binary classification tree.
///
/// Every internal node has exactly two children; a freshly grown tree has
/// at least one node (a pure or single-row bootstrap collapses to one
/// `Leaf`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tree {
    Leaf(Label),
    Internal {
        feature: FeatureIndex,
        threshold: Value,
        left: Box<Tree>,
        right: Box<Tree>,
    },
}

impl Tree {
    /// Walk from the root, going left iff `value_of(sample, feature) <=
    /// threshold`. Iterative rather than recursive: prediction is the hot
    /// path, and unlike tree growth the depth of an already-trained tree
    /// isn't bounded by anything the builder enforced.
    pub fn predict(&self, sample: &Sample) -> Label {
        let mut node = self;
        loop {
            match node {
                Tree::Leaf(label) => return *label,
                Tree::Internal {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if sample.value_of(*feature) <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Tree::Leaf(_))
    }
}

/// Grows one tree from a bootstrap of `dataset` under the two forest
/// randomizations (row bootstrap, per-node feature subsampling).
pub struct TreeBuilder {
    pub max_features: usize,
    pub max_samples: usize,
    pub min_node_size: usize,
    pub metric: Metric,
}

impl TreeBuilder {
    pub fn new(max_features: usize, max_samples: usize, min_node_size: usize, metric: Metric) -> Self {
        TreeBuilder {
            max_features,
            max_samples,
            min_node_size,
            metric,
        }
    }

    /// Draw a bootstrap of `dataset`, grow a tree from it, and return the
    /// tree alongside the sorted row indices that never appeared in the
    /// bootstrap (the tree's out-of-bag set).
    pub fn build(&self, rng: &mut impl Rng, dataset: &TrainingSet) -> (Tree, Vec<usize>) {
        let (in_bag_rows, oob_indices) = bootstrap(rng, self.max_samples, dataset.n_samples());
        let in_bag = dataset.select(&in_bag_rows);

        let mut scratch = SplitScratch::new();
        let tree = self.grow(&in_bag, rng, &mut scratch);
        (tree, oob_indices)
    }

    fn grow<'a>(&self, samples: &[&'a Sample], rng: &mut impl Rng, scratch: &mut SplitScratch<'a>) -> Tree {
        if samples.len() <= self.min_node_size {
            return Tree::Leaf(majority_class(samples, rng));
        }

        let mut features = non_constant_features(samples);
        features.shuffle(rng);
        features.truncate(self.max_features.min(features.len()));

        if features.is_empty() {
            return Tree::Leaf(majority_class(samples, rng));
        }

        let mut records = all_candidates(samples, &features, self.metric, scratch);

        let min_cost = records
            .iter()
            .fold(f64::INFINITY, |acc, r| acc.min(r.cost));
        let tied: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.cost == min_cost)
            .map(|(i, _)| i)
            .collect();
        let chosen_idx = *tied
            .choose(rng)
            .expect("at least one split candidate always exists for a non-empty feature list");
        let chosen = records.swap_remove(chosen_idx);

        if chosen.left.is_empty() {
            log::debug!(
                "degenerate split on feature {} at threshold {} (empty left side), falling back to a leaf",
                chosen.feature,
                chosen.threshold
            );
            return Tree::Leaf(majority_class(&chosen.right, rng));
        }
        if chosen.right.is_empty() {
            log::debug!(
                "degenerate split on feature {} at threshold {} (empty right side), falling back to a leaf",
                chosen.feature,
                chosen.threshold
            );
            return Tree::Leaf(majority_class(&chosen.left, rng));
        }

        if min_cost == 0.0 {
            log::debug!(
                "pure split on feature {} at threshold {}, both children are leaves",
                chosen.feature,
                chosen.threshold
            );
            let left_label = majority_class(&chosen.left, rng);
            let right_label = majority_class(&chosen.right, rng);
            return Tree::Internal {
                feature: chosen.feature,
                threshold: chosen.threshold,
                left: Box::new(Tree::Leaf(left_label)),
                right: Box::new(Tree::Leaf(right_label)),
            };
        }

        let left = self.grow(&chosen.left, rng, scratch);
        let right = self.grow(&chosen.right, rng, scratch);
        Tree::Internal {
            feature: chosen.feature,
            threshold: chosen.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
