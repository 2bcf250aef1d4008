use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use spacegen_core::{ErrorInfo, SpaceError};

/// One declared dimension of the experiment space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureSpec {
    /// Explicit ordered list of literal values.
    Categorical(Vec<Value>),
    /// Mapping form carrying a `type` tag.
    Structured(StructuredFeature),
}

/// The tagged feature grammar accepted in mapping form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuredFeature {
    /// Linearly spaced numeric grid dimension.
    Range {
        /// `[start, stop, count]` expanded to `count` evenly spaced values.
        params: RangeParams,
    },
    /// Weighted component subsets over one group of names.
    Mixture {
        /// Component names eligible for a budget share.
        components: Vec<String>,
        /// Cardinality range, step, budget, and ordering controls.
        params: MixtureParams,
    },
    /// Hierarchical mixture over named groups sharing an outer budget.
    SuperMixture {
        /// Group name to group declaration.
        components: BTreeMap<String, GroupSpec>,
        /// Group count, outer step, and ordering controls.
        params: SuperMixtureParams,
    },
}

/// Positional `[start, stop, count]` parameters of a range feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeParams(pub f64, pub f64, pub usize);

/// Parameters of a flat mixture feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureParams {
    /// Smallest number of simultaneously active components.
    pub min_components: usize,
    /// Largest number of simultaneously active components.
    pub max_components: usize,
    /// Weight quantization granularity.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Budget the active weights must sum to.
    #[serde(default = "default_total_sum")]
    pub total_sum: f64,
    /// Whether enumeration order is randomized at construction.
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

/// One group inside a super-mixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Component names owned by this group.
    pub components: Vec<String>,
    /// Inner mixture parameters; the budget is assigned from the outer
    /// partition, so the group declares no `total_sum` of its own.
    pub params: GroupParams,
}

/// Parameters of a super-mixture group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupParams {
    /// Smallest number of simultaneously active components.
    pub min_components: usize,
    /// Largest number of simultaneously active components.
    pub max_components: usize,
    /// Weight quantization granularity within the group's share.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Whether enumeration order is randomized at construction.
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

/// Top-level parameters of a super-mixture feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperMixtureParams {
    /// Number of groups active at once; defaults to every declared group.
    #[serde(default)]
    pub n_components: Option<usize>,
    /// Outer-budget quantization granularity.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Whether enumeration order is randomized at construction.
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

fn default_step() -> f64 {
    0.1
}

fn default_total_sum() -> f64 {
    1.0
}

fn default_shuffle() -> bool {
    true
}

impl FeatureSpec {
    /// Parses one raw document entry into the tagged grammar.
    ///
    /// An entry must be either a list of literals or a mapping with a
    /// recognized `type` tag; anything else fails with a config error
    /// naming the feature.
    pub fn from_value(name: &str, value: &Value) -> Result<Self, SpaceError> {
        match value {
            Value::Array(items) => Ok(FeatureSpec::Categorical(items.clone())),
            Value::Object(map) => {
                let Some(tag) = map.get("type") else {
                    return Err(SpaceError::Config(
                        ErrorInfo::new("feature-untyped", "mapping features require a `type` tag")
                            .with_context("feature", name)
                            .with_hint("expected one of range, mixture, super_mixture"),
                    ));
                };
                let feature: StructuredFeature =
                    serde_json::from_value(value.clone()).map_err(|err| {
                        SpaceError::Config(
                            ErrorInfo::new(
                                "feature-grammar",
                                "feature entry does not match its `type` grammar",
                            )
                            .with_context("feature", name)
                            .with_context("type", tag.as_str().unwrap_or_default())
                            .with_hint(err.to_string()),
                        )
                    })?;
                Ok(FeatureSpec::Structured(feature))
            }
            _ => Err(SpaceError::Config(
                ErrorInfo::new(
                    "feature-shape",
                    "feature entries must be a list or a typed mapping",
                )
                .with_context("feature", name),
            )),
        }
    }

    /// Every row key this feature can contribute to the realized space.
    pub fn declared_keys(&self, name: &str) -> Vec<String> {
        match self {
            FeatureSpec::Categorical(_)
            | FeatureSpec::Structured(StructuredFeature::Range { .. }) => {
                vec![name.to_string()]
            }
            FeatureSpec::Structured(StructuredFeature::Mixture { components, .. }) => {
                components.clone()
            }
            FeatureSpec::Structured(StructuredFeature::SuperMixture { components, .. }) => {
                components
                    .values()
                    .flat_map(|group| group.components.iter().cloned())
                    .collect()
            }
        }
    }
}
