//! Combinatorial experiment-space generation and sampling.
//!
//! A space is an ordered sequence of rows, each row mapping feature names to
//! scalar values. Grid features contribute values from explicit lists or
//! linearly spaced ranges; mixture features contribute weighted component
//! subsets whose step-quantized weights sum to a fixed budget. The generator
//! enumerates the full cross product while it fits a configurable budget and
//! falls back to a bounded random draw once it does not.

mod compose;
mod generator;
mod grid;
mod hash;
mod mixture;
mod nested;
mod partition;
mod report;
mod spec;

pub use compose::{concat, product};
pub use generator::{GeneratorOptions, Space, SpaceGenerator};
pub use grid::{grid_product, linspace};
pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use mixture::{ComponentSet, ComponentSetUnion};
pub use nested::NestedMixture;
pub use partition::partition;
pub use report::SpaceReport;
pub use spec::{
    FeatureSpec, GroupParams, GroupSpec, MixtureParams, RangeParams, StructuredFeature,
    SuperMixtureParams,
};
