//! Feature Analyzer: enumerate the features that can actually discriminate
//! a sample set.

use std::collections::{BTreeMap, BTreeSet};

use crate::sample::{FeatureIndex, Sample, Value};

/// For each feature that appears in any of `samples`, collect its distinct
/// observed values (always including `0`, the sparse default) and drop
/// features whose value set turns out to be a singleton.
///
/// Returned in ascending feature-index order with ascending value-set order,
/// which keeps the result deterministic for a given input regardless of
/// hash-map iteration order, and is convenient for the splitter's ascending
/// threshold scan.
pub fn non_constant_features(samples: &[&Sample]) -> Vec<(FeatureIndex, Vec<Value>)> {
    let mut observed: BTreeMap<FeatureIndex, BTreeSet<Value>> = BTreeMap::new();

    for sample in samples {
        for &feature in sample.feature_keys() {
            observed
                .entry(feature)
                .or_insert_with(BTreeSet::new)
                .insert(sample.value_of(feature));
        }
    }

    for values in observed.values_mut() {
        values.insert(0);
    }

    observed
        .into_iter()
        .filter(|(_, values)| values.len() > 1)
        .map(|(feature, values)| (feature, values.into_iter().collect()))
        .collect()
}
