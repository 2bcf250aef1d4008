use serde::{Deserialize, Serialize};
use spacegen_core::{Row, SchemaVersion, SpaceProvenance};

/// Serializable realized-space artifact.
///
/// Carries the rows materialized at construction time together with the
/// provenance needed to reproduce them; deferred generators emit an empty
/// row table and a `deferred` mode marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceReport {
    /// Schema version for the report payload.
    pub schema_version: SchemaVersion,
    /// Reproducibility record for the realization.
    pub provenance: SpaceProvenance,
    /// Realized rows, in generator order.
    pub rows: Vec<Row>,
}
