use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spacegen_core::{ErrorInfo, Row, RngHandle, SpaceError, SpaceProvenance};

use crate::compose;
use crate::grid::{grid_product, linspace};
use crate::hash::stable_hash_string;
use crate::mixture::ComponentSetUnion;
use crate::nested::NestedMixture;
use crate::report::SpaceReport;
use crate::spec::{FeatureSpec, StructuredFeature};

/// Substream used for construction-time shuffles of combos and vectors.
const SUBSTREAM_LAYOUT: u64 = 1;
/// Substream used when materializing a bounded random space.
const SUBSTREAM_REALIZE: u64 = 2;

/// Construction parameters for [`SpaceGenerator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Largest number of rows the generator may materialize.
    #[serde(default = "GeneratorOptions::default_max_space")]
    pub max_space: usize,
    /// Whether to realize the space at construction time; when false, rows
    /// are regenerated on every sampling call.
    #[serde(default = "GeneratorOptions::default_save_space")]
    pub save_space: bool,
    /// Master seed for all construction-time randomness.
    #[serde(default)]
    pub seed: u64,
}

impl GeneratorOptions {
    const fn default_max_space() -> usize {
        10_000_000
    }

    const fn default_save_space() -> bool {
        true
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_space: Self::default_max_space(),
            save_space: Self::default_save_space(),
            seed: 0,
        }
    }
}

/// Realized backing store behind a generator, chosen once at construction.
#[derive(Debug, Clone)]
pub enum Space {
    /// Materialized row table; sampling draws from it with replacement.
    Eager(Vec<Row>),
    /// Nothing stored; every sampling call generates fresh joint rows.
    Deferred,
}

#[derive(Debug, Clone)]
enum MixtureFeature {
    Flat(ComponentSetUnion),
    Nested(NestedMixture),
}

impl MixtureFeature {
    fn space_size(&self) -> usize {
        match self {
            MixtureFeature::Flat(union) => union.space_size(),
            MixtureFeature::Nested(nested) => nested.space_size(),
        }
    }

    fn full_space(&self) -> Vec<Row> {
        match self {
            MixtureFeature::Flat(union) => union.full_space(),
            MixtureFeature::Nested(nested) => nested.full_space(),
        }
    }

    fn sample(&self, n: usize, rng: &mut RngHandle) -> Result<Vec<Row>, SpaceError> {
        match self {
            MixtureFeature::Flat(union) => Ok(union.sample(n, rng)),
            MixtureFeature::Nested(nested) => nested.sample(n, rng),
        }
    }
}

/// Orchestrates grid and mixture dimensions into one sampled or enumerated
/// space of experiment configurations.
#[derive(Debug, Clone)]
pub struct SpaceGenerator {
    grid: BTreeMap<String, Vec<Value>>,
    mixtures: BTreeMap<String, MixtureFeature>,
    keys: BTreeSet<String>,
    theoretical: u128,
    max_space: usize,
    seed: u64,
    spec_hash: String,
    space: Space,
}

impl SpaceGenerator {
    /// Builds a generator from a parsed feature specification.
    ///
    /// The materialization policy is decided here, once. With `save_space`
    /// set, the space is realized eagerly: exhaustively when the
    /// theoretical size fits `max_space`, otherwise as exactly `max_space`
    /// independently drawn joint rows. Without `save_space` nothing is
    /// stored and [`SpaceGenerator::sample`] regenerates rows per call.
    pub fn new(
        features: &BTreeMap<String, FeatureSpec>,
        options: GeneratorOptions,
    ) -> Result<Self, SpaceError> {
        let mut layout_rng = RngHandle::substream(options.seed, SUBSTREAM_LAYOUT);
        let mut grid = BTreeMap::new();
        let mut mixtures = BTreeMap::new();
        let mut keys = BTreeSet::new();

        for (name, feature) in features {
            keys.extend(feature.declared_keys(name));
            match feature {
                FeatureSpec::Categorical(values) => {
                    grid.insert(name.clone(), values.clone());
                }
                FeatureSpec::Structured(StructuredFeature::Range { params }) => {
                    let values = linspace(params.0, params.1, params.2)
                        .into_iter()
                        .map(|value| json!(value))
                        .collect();
                    grid.insert(name.clone(), values);
                }
                FeatureSpec::Structured(StructuredFeature::Mixture { components, params }) => {
                    let union = ComponentSetUnion::new(
                        components,
                        params.min_components,
                        params.max_components,
                        params.step,
                        params.total_sum,
                        params.shuffle,
                        &mut layout_rng,
                    );
                    mixtures.insert(name.clone(), MixtureFeature::Flat(union));
                }
                FeatureSpec::Structured(StructuredFeature::SuperMixture { components, params }) => {
                    let n_groups = params.n_components.unwrap_or(components.len());
                    let nested = NestedMixture::new(
                        components,
                        n_groups,
                        params.step,
                        params.shuffle,
                        &mut layout_rng,
                    );
                    mixtures.insert(name.clone(), MixtureFeature::Nested(nested));
                }
            }
        }

        let theoretical = joint_size(&grid, &mixtures);
        let spec_hash = stable_hash_string(features)?;
        let mut generator = Self {
            grid,
            mixtures,
            keys,
            theoretical,
            max_space: options.max_space,
            seed: options.seed,
            spec_hash,
            space: Space::Deferred,
        };
        if options.save_space {
            let mut realize_rng = RngHandle::substream(options.seed, SUBSTREAM_REALIZE);
            generator.space = generator.realize(&mut realize_rng)?;
        }
        Ok(generator)
    }

    /// Loads a YAML feature document and constructs a generator from it.
    pub fn from_yaml_path(
        path: impl AsRef<Path>,
        options: GeneratorOptions,
    ) -> Result<Self, SpaceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| {
            SpaceError::Serde(
                ErrorInfo::new("yaml-read", "failed to read feature document")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        Self::from_yaml_str(&text, options)
    }

    /// Parses a YAML feature document and constructs a generator from it.
    pub fn from_yaml_str(document: &str, options: GeneratorOptions) -> Result<Self, SpaceError> {
        let raw: BTreeMap<String, Value> = serde_yaml::from_str(document).map_err(|err| {
            SpaceError::Serde(
                ErrorInfo::new("yaml-decode", "failed to decode feature document")
                    .with_hint(err.to_string()),
            )
        })?;
        let mut features = BTreeMap::new();
        for (name, value) in &raw {
            features.insert(name.clone(), FeatureSpec::from_value(name, value)?);
        }
        Self::new(&features, options)
    }

    /// Exact number of rows the full joint space would contain.
    ///
    /// Absent grid or mixture factors count as multiplicative identity; a
    /// specification with no features at all has size zero. A zero here is
    /// a configuration smell (every mixture candidate was infeasible), not
    /// an error.
    pub fn theoretical_size(&self) -> u128 {
        self.theoretical
    }

    /// The backing store selected at construction.
    pub fn space(&self) -> &Space {
        &self.space
    }

    /// Materialized rows, when the generator realized eagerly.
    pub fn realized_rows(&self) -> Option<&[Row]> {
        match &self.space {
            Space::Eager(rows) => Some(rows),
            Space::Deferred => None,
        }
    }

    /// Canonical hash of the parsed feature specification.
    pub fn spec_hash(&self) -> &str {
        &self.spec_hash
    }

    /// Draws `n` rows through the caller-supplied RNG.
    ///
    /// Realized generators draw uniformly with replacement from the stored
    /// table; deferred generators regenerate `n` fresh joint rows, grid
    /// values drawn independently per row and per call.
    pub fn sample(&self, n: usize, rng: &mut RngHandle) -> Result<Vec<Row>, SpaceError> {
        match &self.space {
            Space::Eager(rows) => {
                if rows.is_empty() {
                    return Err(empty_space_error());
                }
                Ok((0..n)
                    .map(|_| rows[rng.gen_range(0..rows.len())].clone())
                    .collect())
            }
            Space::Deferred => self.fresh_rows(n, rng),
        }
    }

    /// Builds a serializable report describing the realized space.
    pub fn report(&self) -> SpaceReport {
        let (mode, rows) = match &self.space {
            Space::Eager(rows) => {
                let mode = if self.theoretical <= self.max_space as u128 {
                    "exhaustive"
                } else {
                    "bounded"
                };
                (mode, rows.clone())
            }
            Space::Deferred => ("deferred", Vec::new()),
        };
        let tool_versions = [(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        )]
        .into_iter()
        .collect();
        SpaceReport {
            schema_version: Default::default(),
            provenance: SpaceProvenance {
                spec_hash: self.spec_hash.clone(),
                seed: self.seed,
                mode: mode.to_string(),
                realized_rows: rows.len(),
                tool_versions,
            },
            rows,
        }
    }

    fn realize(&self, rng: &mut RngHandle) -> Result<Space, SpaceError> {
        if self.grid.is_empty() && self.mixtures.is_empty() {
            return Ok(Space::Eager(Vec::new()));
        }
        if self.theoretical <= self.max_space as u128 {
            let mut spaces = Vec::new();
            if !self.grid.is_empty() {
                spaces.push(grid_product(&self.grid));
            }
            for feature in self.mixtures.values() {
                spaces.push(feature.full_space());
            }
            let rows = compose::product(&spaces)
                .into_iter()
                .map(|row| self.complete(row))
                .collect();
            Ok(Space::Eager(rows))
        } else {
            Ok(Space::Eager(self.fresh_rows(self.max_space, rng)?))
        }
    }

    fn fresh_rows(&self, n: usize, rng: &mut RngHandle) -> Result<Vec<Row>, SpaceError> {
        if self.theoretical == 0 {
            return Err(empty_space_error());
        }
        let mut grid_rows = Vec::with_capacity(n);
        for _ in 0..n {
            let mut row = Row::new();
            for (name, values) in &self.grid {
                let value = values[rng.gen_range(0..values.len())].clone();
                row.insert(name.clone(), value);
            }
            grid_rows.push(row);
        }
        let mut spaces = vec![grid_rows];
        for feature in self.mixtures.values() {
            spaces.push(feature.sample(n, rng)?);
        }
        let rows = compose::concat(&spaces)?;
        Ok(rows.into_iter().map(|row| self.complete(row)).collect())
    }

    fn complete(&self, mut row: Row) -> Row {
        for key in &self.keys {
            if !row.contains_key(key) {
                row.insert(key.clone(), json!(0.0));
            }
        }
        row
    }
}

fn joint_size(
    grid: &BTreeMap<String, Vec<Value>>,
    mixtures: &BTreeMap<String, MixtureFeature>,
) -> u128 {
    let grid_size = if grid.is_empty() {
        None
    } else {
        Some(
            grid.values()
                .fold(1u128, |acc, values| acc.saturating_mul(values.len() as u128)),
        )
    };
    let mixture_size = if mixtures.is_empty() {
        None
    } else {
        Some(mixtures.values().fold(1u128, |acc, feature| {
            acc.saturating_mul(feature.space_size() as u128)
        }))
    };
    match (grid_size, mixture_size) {
        (None, None) => 0,
        (Some(size), None) | (None, Some(size)) => size,
        (Some(grid_size), Some(mixture_size)) => grid_size.saturating_mul(mixture_size),
    }
}

fn empty_space_error() -> SpaceError {
    SpaceError::Rng(
        ErrorInfo::new("empty-space", "cannot sample from an empty space")
            .with_hint("every mixture candidate was infeasible or no features were declared"),
    )
}
