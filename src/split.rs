//! Splitter: for a candidate feature, evaluate every threshold via a
//! streaming sorted-bucket scan and return one record per threshold.

use std::collections::HashMap;

use crate::criterion::Metric;
use crate::sample::{FeatureIndex, Sample, Value};

/// One (feature, threshold, left, right, cost) record.
///
/// `left`/`right` are the actual partitioned sample references for this
/// threshold, not a recipe for re-partitioning later — whichever record the
/// tree builder selects is used directly for recursion.
pub struct SplitCandidate<'a> {
    pub feature: FeatureIndex,
    pub threshold: Value,
    pub left: Vec<&'a Sample>,
    pub right: Vec<&'a Sample>,
    pub cost: f64,
}

/// Per-tree scratch space for the bucket scan, reused across every node in
/// a tree's recursion so the splitter doesn't reallocate a fresh hash map
/// at every call.
#[derive(Default)]
pub struct SplitScratch<'a> {
    buckets: HashMap<Value, Vec<&'a Sample>>,
}

impl<'a> SplitScratch<'a> {
    pub fn new() -> Self {
        SplitScratch {
            buckets: HashMap::new(),
        }
    }

    /// Order `samples` by ascending bucket value (the values in `sorted_values`,
    /// which must already be sorted ascending) without a general-purpose
    /// sort: each sample falls into exactly one `O(1)`-lookup bucket.
    fn sort_by_feature(&mut self, samples: &[&'a Sample], feature: FeatureIndex, sorted_values: &[Value]) -> Vec<&'a Sample> {
        self.buckets.clear();
        for &s in samples {
            self.buckets.entry(s.value_of(feature)).or_default().push(s);
        }

        let mut ordered = Vec::with_capacity(samples.len());
        for &v in sorted_values {
            if let Some(bucket) = self.buckets.get(&v) {
                ordered.extend(bucket.iter().copied());
            }
        }
        ordered
    }

    fn bucket_len(&self, v: Value) -> usize {
        self.buckets.get(&v).map_or(0, |b| b.len())
    }
}

/// Evaluate every threshold for one feature. `values` is the feature's
/// ascending, zero-inclusive observed value set from the feature analyzer.
pub fn split_candidates<'a>(
    samples: &[&'a Sample],
    feature: FeatureIndex,
    values: &[Value],
    metric: Metric,
    scratch: &mut SplitScratch<'a>,
) -> Vec<SplitCandidate<'a>> {
    let ordered = scratch.sort_by_feature(samples, feature, values);

    let mut records = Vec::with_capacity(values.len());
    let mut cursor = 0usize;
    for &threshold in values {
        cursor += scratch.bucket_len(threshold);
        let (left, right) = ordered.split_at(cursor);
        let left = left.to_vec();
        let right = right.to_vec();
        let cost = metric.cost(&left, &right);
        records.push(SplitCandidate {
            feature,
            threshold,
            left,
            right,
            cost,
        });
    }
    records
}

/// Concatenation across all candidate features of all threshold records.
pub fn all_candidates<'a>(
    samples: &[&'a Sample],
    features: &[(FeatureIndex, Vec<Value>)],
    metric: Metric,
    scratch: &mut SplitScratch<'a>,
) -> Vec<SplitCandidate<'a>> {
    let mut out = Vec::new();
    for (feature, values) in features {
        out.extend(split_candidates(samples, *feature, values, metric, scratch));
    }
    out
}
