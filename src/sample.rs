//! Sparse sample storage.
//!
//! Features absent from a sample's map are defined to have value `0`. This
//! default is load-bearing for both the feature analyzer (which must always
//! consider `0` a possible value) and the splitter (samples missing a
//! feature bucket with the samples that have it set to `0`).

use std::collections::HashMap;

pub type Label = u32;
pub type FeatureIndex = u32;
pub type Value = i64;

/// One labeled training or query point.
///
/// Immutable after construction: there is no setter, only `new` and
/// `value_of`.
#[derive(Debug, Clone)]
pub struct Sample {
    features: HashMap<FeatureIndex, Value>,
    label: Label,
}

impl Sample {
    pub fn new(features: HashMap<FeatureIndex, Value>, label: Label) -> Self {
        Sample { features, label }
    }

    /// Sparse default-zero lookup. Unknown feature indices legitimately
    /// return 0; there is no bounds checking to speak of.
    #[inline]
    pub fn value_of(&self, feature: FeatureIndex) -> Value {
        self.features.get(&feature).copied().unwrap_or(0)
    }

    #[inline]
    pub fn label(&self) -> Label {
        self.label
    }

    /// Feature indices explicitly present in this sample's sparse map.
    /// Does not include indices that are implicitly zero by omission.
    pub fn feature_keys(&self) -> impl Iterator<Item = &FeatureIndex> {
        self.features.keys()
    }
}

/// An indexable, row-stable array of samples.
///
/// This is a thin newtype over `Vec<Sample>`; row indices handed out by
/// `TrainingSet` (and consumed by the bootstrap sampler and OOB evaluator)
/// are simply positions into the underlying vector and never change for the
/// lifetime of a training run.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    samples: Vec<Sample>,
}

impl TrainingSet {
    pub fn new(samples: Vec<Sample>) -> Self {
        TrainingSet { samples }
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn row(&self, i: usize) -> &Sample {
        &self.samples[i]
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    /// Materialize a sub-selection of rows as borrowed references, in the
    /// given order (duplicates allowed — this is exactly what a bootstrap
    /// multiset needs).
    pub fn select<'a>(&'a self, rows: &[usize]) -> Vec<&'a Sample> {
        rows.iter().map(|&i| &self.samples[i]).collect()
    }
}

impl std::ops::Index<usize> for TrainingSet {
    type Output = Sample;
    fn index(&self, i: usize) -> &Sample {
        &self.samples[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zero_for_absent_feature() {
        let mut f = HashMap::new();
        f.insert(0, 1);
        let s = Sample::new(f, 1);
        assert_eq!(s.value_of(0), 1);
        assert_eq!(s.value_of(1), 0);
        assert_eq!(s.value_of(999), 0);
    }

    #[test]
    fn training_set_row_indices_stable() {
        let ts = TrainingSet::new(vec![
            Sample::new(HashMap::new(), 0),
            Sample::new(HashMap::new(), 1),
        ]);
        assert_eq!(ts.row(0).label(), 0);
        assert_eq!(ts.row(1).label(), 1);
        assert_eq!(ts.n_samples(), 2);
    }
}
