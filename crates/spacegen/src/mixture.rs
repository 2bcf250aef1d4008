use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;
use spacegen_core::{Row, RngHandle, WeightVector};

use crate::partition::partition;

/// One mixture group at a fixed cardinality: every way of choosing `k`
/// components and splitting the budget among them at the step granularity.
#[derive(Debug, Clone)]
pub struct ComponentSet {
    combos: Vec<Vec<String>>,
    weight_vectors: Vec<WeightVector>,
}

impl ComponentSet {
    /// Builds the combo and weight-vector axes for one cardinality.
    ///
    /// With `shuffle` set, both axes are permuted once here; the set of
    /// combos and vectors is unchanged, only their enumeration order.
    pub fn new(
        names: &[String],
        k: usize,
        step: f64,
        total_sum: f64,
        shuffle: bool,
        rng: &mut RngHandle,
    ) -> Self {
        let mut combos = k_subsets(names, k);
        let weight_vectors = partition(k, total_sum, step, shuffle, rng);
        if shuffle {
            combos.shuffle(rng);
        }
        Self {
            combos,
            weight_vectors,
        }
    }

    /// Size-`k` component subsets, order-preserving relative to the source
    /// sequence unless shuffled at construction.
    pub fn combos(&self) -> &[Vec<String>] {
        &self.combos
    }

    /// Materialized weight vectors for this cardinality.
    pub fn weight_vectors(&self) -> &[WeightVector] {
        &self.weight_vectors
    }

    /// Number of assignments in the full space: `|combos| * |vectors|`.
    pub fn space_size(&self) -> usize {
        self.combos.len().saturating_mul(self.weight_vectors.len())
    }

    /// Every assignment, combos outer and weight vectors inner.
    pub fn full_space(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.space_size());
        for combo in &self.combos {
            for vector in &self.weight_vectors {
                rows.push(assignment(combo, vector));
            }
        }
        rows
    }

    /// Draws `n` assignments by sampling the combo and weight-vector axes
    /// independently, uniformly with replacement, and pairing the draws.
    /// Because the two axes form a full cross product, this matches uniform
    /// sampling over [`ComponentSet::full_space`]. Returns nothing when the
    /// space is empty.
    pub fn sample(&self, n: usize, rng: &mut RngHandle) -> Vec<Row> {
        if self.space_size() == 0 {
            return Vec::new();
        }
        (0..n)
            .map(|_| {
                let combo = &self.combos[rng.gen_range(0..self.combos.len())];
                let vector = &self.weight_vectors[rng.gen_range(0..self.weight_vectors.len())];
                assignment(combo, vector)
            })
            .collect()
    }
}

/// Aggregates [`ComponentSet`]s over a range of cardinalities, discarding
/// any cardinality whose space is empty for the configured budget and step.
#[derive(Debug, Clone)]
pub struct ComponentSetUnion {
    sets: BTreeMap<usize, ComponentSet>,
}

impl ComponentSetUnion {
    /// Builds one member per `k` in `[min_k, max_k]`; infeasible
    /// cardinalities are silently excluded rather than treated as errors.
    pub fn new(
        names: &[String],
        min_k: usize,
        max_k: usize,
        step: f64,
        total_sum: f64,
        shuffle: bool,
        rng: &mut RngHandle,
    ) -> Self {
        let mut sets = BTreeMap::new();
        for k in min_k..=max_k {
            let set = ComponentSet::new(names, k, step, total_sum, shuffle, rng);
            if set.space_size() > 0 {
                sets.insert(k, set);
            }
        }
        Self { sets }
    }

    /// Cardinalities that survived the feasibility screen, ascending.
    pub fn cardinalities(&self) -> Vec<usize> {
        self.sets.keys().copied().collect()
    }

    /// Sum of the member space sizes.
    pub fn space_size(&self) -> usize {
        self.sets
            .values()
            .fold(0usize, |acc, set| acc.saturating_add(set.space_size()))
    }

    /// Member full spaces concatenated in increasing-cardinality order.
    pub fn full_space(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.space_size());
        for set in self.sets.values() {
            rows.extend(set.full_space());
        }
        rows
    }

    /// Draws `n` assignments by first picking a cardinality uniformly among
    /// the retained values for each draw, then delegating the per-k counts
    /// to the member sets.
    ///
    /// Cardinalities are weighted equally regardless of how large each k's
    /// space is, and the output is grouped by cardinality rather than by
    /// request order; callers must not assume positional correspondence
    /// with any external sequence.
    pub fn sample(&self, n: usize, rng: &mut RngHandle) -> Vec<Row> {
        if self.sets.is_empty() {
            return Vec::new();
        }
        let cardinalities = self.cardinalities();
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for _ in 0..n {
            let k = cardinalities[rng.gen_range(0..cardinalities.len())];
            *counts.entry(k).or_insert(0) += 1;
        }
        let mut rows = Vec::with_capacity(n);
        for (k, count) in counts {
            rows.extend(self.sets[&k].sample(count, rng));
        }
        rows
    }
}

fn assignment(combo: &[String], vector: &[f64]) -> Row {
    combo
        .iter()
        .zip(vector)
        .map(|(name, weight)| (name.clone(), json!(weight)))
        .collect()
}

/// All size-`k` subsets of `names` in combinatorial order, each subset
/// preserving the relative order of the source sequence.
pub(crate) fn k_subsets(names: &[String], k: usize) -> Vec<Vec<String>> {
    if k > names.len() {
        return Vec::new();
    }
    let mut subsets = Vec::new();
    let mut current = Vec::with_capacity(k);
    choose(names, k, 0, &mut current, &mut subsets);
    subsets
}

fn choose(
    names: &[String],
    k: usize,
    start: usize,
    current: &mut Vec<String>,
    subsets: &mut Vec<Vec<String>>,
) {
    if current.len() == k {
        subsets.push(current.clone());
        return;
    }
    let needed = k - current.len();
    for idx in start..=names.len() - needed {
        current.push(names[idx].clone());
        choose(names, k, idx + 1, current, subsets);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn k_subsets_cover_the_binomial() {
        let subsets = k_subsets(&names(&["a", "b", "c", "d"]), 2);
        assert_eq!(subsets.len(), 6);
        assert!(subsets.iter().all(|subset| subset.len() == 2));
        assert_eq!(subsets[0], names(&["a", "b"]));
        assert_eq!(subsets[5], names(&["c", "d"]));
    }

    #[test]
    fn zero_sized_subset_is_the_empty_choice() {
        assert_eq!(k_subsets(&names(&["a", "b"]), 0), vec![Vec::<String>::new()]);
    }

    #[test]
    fn oversized_subset_is_empty() {
        assert!(k_subsets(&names(&["a", "b"]), 3).is_empty());
    }
}
