//! Logical persistence of a trained `Forest`.
//!
//! spec.md treats the on-disk format as an external collaborator's
//! concern; this module is one concrete, swappable instance of that
//! collaborator (JSON via `serde_json`), not a mandated format. `Forest`
//! and `Tree` derive `serde::Serialize`/`Deserialize` behind the `serde`
//! feature precisely so a caller who wants a different format (bincode,
//! MessagePack, ...) can serialize them directly without going through
//! `save`/`restore` at all.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::ForestError;
use crate::forest::Forest;

/// Serialize `forest` to `path` as JSON. Call `forest.clone().drop_oob()`
/// first if the OOB arrays shouldn't be persisted — `save` does not drop
/// them implicitly, since dropping OOB indices is a one-way operation and
/// the caller, not this module, should decide when to pay for it.
pub fn save(path: impl AsRef<Path>, forest: &Forest) -> Result<(), ForestError> {
    let file = File::create(path).map_err(|e| ForestError::Persist(e.to_string()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, forest).map_err(|e| ForestError::Persist(e.to_string()))
}

/// Deserialize a `Forest` previously written by `save`.
pub fn restore(path: impl AsRef<Path>) -> Result<Forest, ForestError> {
    let file = File::open(path).map_err(|e| ForestError::Persist(e.to_string()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| ForestError::Persist(e.to_string()))
}
