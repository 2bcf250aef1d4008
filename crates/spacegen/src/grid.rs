use std::collections::BTreeMap;

use serde_json::Value;
use spacegen_core::Row;

/// `count` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let span = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + span * i as f64).collect()
        }
    }
}

/// Deterministic cross product over grid features, expanded in key order.
pub fn grid_product(features: &BTreeMap<String, Vec<Value>>) -> Vec<Row> {
    let mut rows = vec![Row::new()];
    for (name, values) in features {
        let mut next = Vec::with_capacity(rows.len().saturating_mul(values.len()));
        for row in &rows {
            for value in values {
                let mut merged = row.clone();
                merged.insert(name.clone(), value.clone());
                next.push(merged);
            }
        }
        rows = next;
    }
    rows
}
