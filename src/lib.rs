//! `forestry`: a random forest classifier over sparse, integer-valued
//! feature vectors with integer class labels.
//!
//! The engine is CART-style classification tree induction under the two
//! randomizations that define a random forest — bootstrap row sampling and
//! per-node feature subsampling — plus a deterministic parallel forest
//! builder and out-of-bag evaluation. See [`api`] for the public entry
//! points; the other modules are the components it wires together.
//!
//! Dataset file parsing, model file formats, a CLI, and the ROC/AUC integral
//! itself are out of scope: this crate hands a caller labeled scores
//! (`oob::roc_auc_pairs`) and trusts them to integrate.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod criterion;
pub mod error;
pub mod features;
pub mod forest;
pub mod oob;
#[cfg(feature = "serde")]
pub mod persist;
pub mod predict;
pub mod sample;
pub mod split;
pub mod tree;

pub use config::{ForestConfig, RatioOrCount, ResolvedConfig};
pub use criterion::Metric;
pub use error::ForestError;
pub use forest::{Forest, TreeEntry};
pub use sample::{FeatureIndex, Label, Sample, TrainingSet, Value};
pub use tree::Tree;
