use std::collections::BTreeMap;

use spacegen::{GroupParams, GroupSpec, NestedMixture};
use spacegen_core::{Row, RngHandle};

fn group(components: &[&str], min_k: usize, max_k: usize, step: f64) -> GroupSpec {
    GroupSpec {
        components: components.iter().map(|name| name.to_string()).collect(),
        params: GroupParams {
            min_components: min_k,
            max_components: max_k,
            step,
            shuffle: false,
        },
    }
}

fn weight_sum(row: &Row) -> f64 {
    row.values().map(|value| value.as_f64().unwrap()).sum()
}

#[test]
fn two_groups_share_the_outer_budget() {
    let groups: BTreeMap<String, GroupSpec> = [
        ("g1".to_string(), group(&["a", "b"], 1, 2, 0.25)),
        ("g2".to_string(), group(&["c", "d"], 1, 2, 0.25)),
    ]
    .into_iter()
    .collect();
    let mut rng = RngHandle::from_seed(2);
    let nested = NestedMixture::new(&groups, 2, 0.5, false, &mut rng);

    // One group combo and one outer split ([0.5, 0.5]); each half admits
    // two singletons plus one pair at quarter steps, so 3 * 3 assignments.
    assert_eq!(nested.instantiation_count(), 1);
    assert_eq!(nested.space_size(), 9);

    let rows = nested.full_space();
    assert_eq!(rows.len(), 9);
    for row in &rows {
        assert!((weight_sum(row) - 1.0).abs() < 1e-9);
        assert!(row.len() >= 2 && row.len() <= 4);
        assert!(row.keys().all(|key| ["a", "b", "c", "d"].contains(&key.as_str())));
    }
}

#[test]
fn underfunded_group_shares_are_excluded() {
    // g1 needs two quarter-step components, so an outer share of 0.25 is
    // too small for it and that (combo, split) candidate disappears.
    let groups: BTreeMap<String, GroupSpec> = [
        ("g1".to_string(), group(&["a", "b"], 2, 2, 0.25)),
        ("g2".to_string(), group(&["c", "d"], 1, 2, 0.25)),
    ]
    .into_iter()
    .collect();
    let mut rng = RngHandle::from_seed(2);
    let nested = NestedMixture::new(&groups, 2, 0.25, false, &mut rng);

    // Outer splits: [0.25, 0.75], [0.5, 0.5], [0.75, 0.25]; the first
    // starves g1.
    assert_eq!(nested.instantiation_count(), 2);
    for row in nested.full_space() {
        assert!((weight_sum(&row) - 1.0).abs() < 1e-9);
    }
}

#[test]
fn fully_infeasible_mixture_is_empty_but_calm() {
    let groups: BTreeMap<String, GroupSpec> = [
        ("g1".to_string(), group(&["a", "b"], 3, 3, 0.25)),
        ("g2".to_string(), group(&["c"], 1, 1, 0.25)),
    ]
    .into_iter()
    .collect();
    let mut rng = RngHandle::from_seed(2);
    let nested = NestedMixture::new(&groups, 2, 0.5, false, &mut rng);

    assert_eq!(nested.instantiation_count(), 0);
    assert_eq!(nested.space_size(), 0);
    assert!(nested.full_space().is_empty());
    assert!(nested.sample(5, &mut rng).unwrap().is_empty());
}

#[test]
fn samples_merge_one_row_per_draw() {
    let groups: BTreeMap<String, GroupSpec> = [
        ("g1".to_string(), group(&["a", "b"], 1, 2, 0.25)),
        ("g2".to_string(), group(&["c", "d"], 1, 2, 0.25)),
        ("g3".to_string(), group(&["e"], 1, 1, 0.25)),
    ]
    .into_iter()
    .collect();
    let mut rng = RngHandle::from_seed(41);
    let nested = NestedMixture::new(&groups, 2, 0.25, false, &mut rng);
    assert!(nested.instantiation_count() > 1);

    let rows = nested.sample(25, &mut rng).unwrap();
    assert_eq!(rows.len(), 25);
    for row in &rows {
        assert!((weight_sum(row) - 1.0).abs() < 1e-9);
        assert!(row
            .keys()
            .all(|key| ["a", "b", "c", "d", "e"].contains(&key.as_str())));
    }
}

#[test]
fn sampling_is_reproducible_for_a_fixed_seed() {
    let groups: BTreeMap<String, GroupSpec> = [
        ("g1".to_string(), group(&["a", "b"], 1, 2, 0.25)),
        ("g2".to_string(), group(&["c", "d"], 1, 2, 0.25)),
    ]
    .into_iter()
    .collect();

    let mut rng_a = RngHandle::from_seed(8);
    let nested_a = NestedMixture::new(&groups, 2, 0.5, false, &mut rng_a);
    let mut rng_b = RngHandle::from_seed(8);
    let nested_b = NestedMixture::new(&groups, 2, 0.5, false, &mut rng_b);

    assert_eq!(
        nested_a.sample(12, &mut rng_a).unwrap(),
        nested_b.sample(12, &mut rng_b).unwrap()
    );
}
