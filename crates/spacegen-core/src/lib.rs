#![deny(missing_docs)]
#![doc = "Core error, randomness, and provenance types shared by the spacegen workspace."]

use std::collections::BTreeMap;

use serde_json::Value;

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, SpaceError};
pub use provenance::{SchemaVersion, SpaceProvenance};
pub use rng::{derive_substream_seed, RngHandle};

/// One experiment configuration: feature name mapped to a scalar value.
///
/// All rows realized from the same generator share one key set; mixture
/// components absent from a particular row carry the value `0.0`.
pub type Row = BTreeMap<String, Value>;

/// Weights assigned to the active components of one mixture: `k` positive
/// entries, each a multiple of the configured step, summing to the budget.
pub type WeightVector = Vec<f64>;
