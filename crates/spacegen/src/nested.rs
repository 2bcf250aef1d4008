use std::collections::BTreeMap;

use rand::Rng;
use spacegen_core::{Row, RngHandle, SpaceError};

use crate::compose;
use crate::mixture::{k_subsets, ComponentSetUnion};
use crate::partition::partition;
use crate::spec::GroupSpec;

/// Hierarchical mixture: a fixed number of named groups share an outer
/// budget of 1.0, and each selected group independently partitions its
/// share among its own components.
#[derive(Debug, Clone)]
pub struct NestedMixture {
    instantiations: Vec<Instantiation>,
    n_groups: usize,
}

/// One valid top-level choice: a group combo paired with an outer weight
/// vector, carrying one sub-budgeted union per selected group. Kept only
/// when every union has nonzero space.
#[derive(Debug, Clone)]
struct Instantiation {
    unions: Vec<ComponentSetUnion>,
}

impl NestedMixture {
    /// Builds every feasible instantiation.
    ///
    /// Group names are taken in sorted order; group combos have exactly
    /// `n_groups` members. The outer budget is split at the group-level
    /// `step`, and a candidate pair is dropped as soon as one of its groups
    /// has no feasible inner space; the exclusion is silent, not an error.
    pub fn new(
        groups: &BTreeMap<String, GroupSpec>,
        n_groups: usize,
        step: f64,
        shuffle: bool,
        rng: &mut RngHandle,
    ) -> Self {
        let group_names: Vec<String> = groups.keys().cloned().collect();
        let combos = k_subsets(&group_names, n_groups);
        let outer_weights = partition(n_groups, 1.0, step, shuffle, rng);

        let mut instantiations = Vec::new();
        for combo in &combos {
            for vector in &outer_weights {
                let mut unions = Vec::with_capacity(n_groups);
                for (name, share) in combo.iter().zip(vector) {
                    let group = &groups[name];
                    let union = ComponentSetUnion::new(
                        &group.components,
                        group.params.min_components,
                        group.params.max_components,
                        group.params.step,
                        *share,
                        group.params.shuffle,
                        rng,
                    );
                    if union.space_size() == 0 {
                        break;
                    }
                    unions.push(union);
                }
                if unions.len() == combo.len() {
                    instantiations.push(Instantiation { unions });
                }
            }
        }
        Self {
            instantiations,
            n_groups,
        }
    }

    /// Number of retained (group combo, outer weight vector) pairs.
    pub fn instantiation_count(&self) -> usize {
        self.instantiations.len()
    }

    /// Sum over instantiations of the product of their per-group sizes.
    pub fn space_size(&self) -> usize {
        self.instantiations
            .iter()
            .fold(0usize, |acc, instantiation| {
                let size = instantiation
                    .unions
                    .iter()
                    .fold(1usize, |prod, union| prod.saturating_mul(union.space_size()));
                acc.saturating_add(size)
            })
    }

    /// Cross product of the per-group spaces within each instantiation,
    /// concatenated across instantiations.
    pub fn full_space(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for instantiation in &self.instantiations {
            let spaces: Vec<Vec<Row>> = instantiation
                .unions
                .iter()
                .map(ComponentSetUnion::full_space)
                .collect();
            rows.extend(compose::product(&spaces));
        }
        rows
    }

    /// Draws `n` rows by choosing instantiation indices uniformly, drawing
    /// the per-instantiation multiplicity from every group slot of that
    /// instantiation, and merging slot sequences index-wise.
    ///
    /// Every chosen instantiation feeds the same count into each of its
    /// `n_groups` slots, so all slot sequences reach length `n` and the
    /// merge cannot fail on shape. Returns nothing when no instantiation
    /// survived construction.
    pub fn sample(&self, n: usize, rng: &mut RngHandle) -> Result<Vec<Row>, SpaceError> {
        if self.instantiations.is_empty() || n == 0 {
            return Ok(Vec::new());
        }
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..n {
            let idx = rng.gen_range(0..self.instantiations.len());
            *counts.entry(idx).or_insert(0) += 1;
        }
        let mut slots: Vec<Vec<Row>> = vec![Vec::new(); self.n_groups];
        for (idx, count) in counts {
            for (slot, union) in self.instantiations[idx].unions.iter().enumerate() {
                slots[slot].extend(union.sample(count, rng));
            }
        }
        compose::concat(&slots)
    }
}
