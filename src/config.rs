//! Hyperparameter resolution and validation.

use crate::criterion::Metric;
use crate::error::ForestError;

/// `max_features`/`max_samples` accept either an exact positive count or a
/// fractional proportion in `(0, 1]`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RatioOrCount {
    Count(usize),
    Ratio(f64),
}

impl RatioOrCount {
    /// Resolve against `upper_bound` (the card_features or training-set
    /// size this parameter is relative to).
    ///
    /// An exact `Count` is used as-is, even past `upper_bound` — bootstrap
    /// sampling with replacement tolerates `max_samples > N` by design, so
    /// only the fractional branch is clamped.
    pub fn resolve(self, upper_bound: usize) -> Result<usize, ForestError> {
        match self {
            RatioOrCount::Count(c) => {
                if c < 1 {
                    return Err(ForestError::invalid("count parameter must be >= 1"));
                }
                Ok(c)
            }
            RatioOrCount::Ratio(f) => {
                if f <= 0.0 || f > 1.0 {
                    return Err(ForestError::invalid(format!(
                        "ratio parameter must lie in (0, 1], got {f}"
                    )));
                }
                let resolved = (f * upper_bound as f64).round() as usize;
                Ok(resolved.clamp(1, upper_bound.max(1)))
            }
        }
    }
}

/// Hyperparameters and resources for growing a forest.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForestConfig {
    pub ntrees: usize,
    pub max_features: RatioOrCount,
    pub max_samples: RatioOrCount,
    pub min_node_size: usize,
    pub metric: Metric,
    pub ncores: usize,
}

impl ForestConfig {
    pub fn new(ntrees: usize) -> Self {
        ForestConfig {
            ntrees,
            max_features: RatioOrCount::Count(1),
            max_samples: RatioOrCount::Ratio(1.0),
            min_node_size: 1,
            metric: Metric::Gini,
            ncores: 1,
        }
    }

    pub fn with_max_features(mut self, v: RatioOrCount) -> Self {
        self.max_features = v;
        self
    }

    pub fn with_max_samples(mut self, v: RatioOrCount) -> Self {
        self.max_samples = v;
        self
    }

    pub fn with_min_node_size(mut self, v: usize) -> Self {
        self.min_node_size = v;
        self
    }

    pub fn with_metric(mut self, v: Metric) -> Self {
        self.metric = v;
        self
    }

    pub fn with_ncores(mut self, v: usize) -> Self {
        self.ncores = v;
        self
    }

    /// Validate and resolve against a concrete dataset, before any worker
    /// is spawned.
    pub fn resolve(&self, n_samples: usize, card_features: usize) -> Result<ResolvedConfig, ForestError> {
        if self.ntrees < 1 {
            return Err(ForestError::invalid("ntrees must be >= 1"));
        }
        if n_samples == 0 {
            return Err(ForestError::invalid("training set must be non-empty"));
        }
        if self.min_node_size < 1 || self.min_node_size >= n_samples {
            return Err(ForestError::invalid(format!(
                "min_node_size must satisfy 1 <= min_node_size < N (N={n_samples}), got {}",
                self.min_node_size
            )));
        }
        if self.ncores < 1 {
            return Err(ForestError::invalid("ncores must be >= 1"));
        }
        self.metric.validate()?;

        let max_features = self.max_features.resolve(card_features)?;
        let max_samples = self.max_samples.resolve(n_samples)?;
        if max_samples > n_samples {
            log::warn!(
                "max_samples={max_samples} exceeds the training set size {n_samples}; bootstrap draws will repeat rows heavily"
            );
        }

        Ok(ResolvedConfig {
            ntrees: self.ntrees,
            max_features,
            max_samples,
            min_node_size: self.min_node_size,
            metric: self.metric,
            ncores: self.ncores,
        })
    }
}

/// A `ForestConfig` after ratio-or-count resolution and validation; this is
/// what `TreeBuilder`/`ForestBuilder` actually consume.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedConfig {
    pub ntrees: usize,
    pub max_features: usize,
    pub max_samples: usize,
    pub min_node_size: usize,
    pub metric: Metric,
    pub ncores: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S6 from spec.md §8.
    #[test]
    fn ratio_resolution_matches_spec_example() {
        assert_eq!(RatioOrCount::Ratio(0.3).resolve(10).unwrap(), 3);
        assert_eq!(RatioOrCount::Ratio(0.5).resolve(100).unwrap(), 50);
    }

    #[test]
    fn ratio_out_of_range_is_rejected() {
        assert!(RatioOrCount::Ratio(0.0).resolve(10).is_err());
        assert!(RatioOrCount::Ratio(1.5).resolve(10).is_err());
    }

    #[test]
    fn exact_count_is_not_clamped_to_upper_bound() {
        assert_eq!(RatioOrCount::Count(500).resolve(20).unwrap(), 500);
    }

    #[test]
    fn min_node_size_must_be_below_n() {
        let cfg = ForestConfig::new(10).with_min_node_size(5);
        assert!(cfg.resolve(5, 3).is_err());
        assert!(cfg.resolve(6, 3).is_ok());
    }

    #[test]
    fn shannon_metric_rejected_at_resolve_time() {
        let cfg = ForestConfig::new(10).with_metric(Metric::Shannon);
        assert!(cfg.resolve(100, 3).is_err());
    }
}
