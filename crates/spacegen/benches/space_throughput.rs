use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;
use spacegen::{ComponentSetUnion, FeatureSpec, GeneratorOptions, SpaceGenerator};
use spacegen_core::RngHandle;
use std::collections::BTreeMap;

fn component_names(count: usize) -> Vec<String> {
    (0..count).map(|idx| format!("component_{idx}")).collect()
}

fn build_features() -> BTreeMap<String, FeatureSpec> {
    let document = json!({
        "learning_rate": {"type": "range", "params": [1e-4, 1e-1, 4]},
        "batch_size": [16, 32, 64],
        "blend": {
            "type": "mixture",
            "components": ["a", "b", "c", "d", "e"],
            "params": {
                "min_components": 1,
                "max_components": 3,
                "step": 0.1,
                "shuffle": false,
            },
        },
    });
    document
        .as_object()
        .unwrap()
        .iter()
        .map(|(name, value)| {
            (
                name.clone(),
                FeatureSpec::from_value(name, value).expect("feature"),
            )
        })
        .collect()
}

fn bench_union_enumeration(c: &mut Criterion) {
    let names = component_names(8);
    c.bench_function("union_full_space_8c_k1_4", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(0);
            let union = ComponentSetUnion::new(&names, 1, 4, 0.1, 1.0, false, &mut rng);
            let rows = union.full_space();
            assert!(!rows.is_empty());
        });
    });
}

fn bench_deferred_sampling(c: &mut Criterion) {
    let features = build_features();
    let options = GeneratorOptions {
        save_space: false,
        ..Default::default()
    };
    let generator = SpaceGenerator::new(&features, options).expect("generator");
    c.bench_function("deferred_sample_1000", |b| {
        b.iter(|| {
            let mut rng = RngHandle::from_seed(7);
            let rows = generator.sample(1000, &mut rng).expect("sample");
            assert_eq!(rows.len(), 1000);
        });
    });
}

criterion_group!(benches, bench_union_enumeration, bench_deferred_sampling);
criterion_main!(benches);
