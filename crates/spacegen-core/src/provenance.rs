//! Provenance and schema descriptors attached to realized-space artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information tying a realized space to its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpaceProvenance {
    /// Canonical hash of the parsed feature specification.
    pub spec_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// Realization mode the generator settled on (`exhaustive`, `bounded`,
    /// or `deferred`).
    pub mode: String,
    /// Number of rows realized at construction time (zero when deferred).
    pub realized_rows: usize,
    /// Version map for the tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
