use rand::seq::SliceRandom;
use spacegen_core::{RngHandle, WeightVector};

/// Relative slack applied to step comparisons so repeated addition of `step`
/// does not drop the final feasible candidate.
const STEP_SLACK: f64 = 1e-6;

/// Enumerates every way of splitting `total` into `k` positive parts, each a
/// multiple of `step`, via depth-first recursion.
///
/// Returns nothing when `k == 0`, `total <= 0`, `step <= 0`, or the budget
/// cannot fund `k` parts of at least `step` each. With `shuffle` set, the
/// candidate order at every recursion level is permuted through `rng`; this
/// changes the enumeration order but never the produced set, which matters
/// to consumers that truncate the output.
pub fn partition(
    k: usize,
    total: f64,
    step: f64,
    shuffle: bool,
    rng: &mut RngHandle,
) -> Vec<WeightVector> {
    let mut vectors = Vec::new();
    if k == 0 || total <= 0.0 || step <= 0.0 {
        return vectors;
    }
    descend(k, total, step, shuffle, rng, Vec::new(), &mut vectors);
    vectors
}

fn descend(
    k: usize,
    total: f64,
    step: f64,
    shuffle: bool,
    rng: &mut RngHandle,
    prefix: Vec<f64>,
    vectors: &mut Vec<WeightVector>,
) {
    if k == 1 {
        if total > 0.0 {
            let mut vector = prefix;
            vector.push(total);
            vectors.push(vector);
        }
        return;
    }
    let tolerance = step * STEP_SLACK;
    if total + tolerance < step * k as f64 {
        return;
    }
    let mut candidates = Vec::new();
    let mut head = 0.0;
    loop {
        head += step;
        if head >= total {
            break;
        }
        // The remainder must still fund k - 1 parts of at least `step`.
        if total - head >= step - tolerance {
            candidates.push(head);
        }
    }
    if shuffle {
        candidates.shuffle(rng);
    }
    for head in candidates {
        let mut next = prefix.clone();
        next.push(head);
        descend(k - 1, total - head, step, shuffle, rng, next, vectors);
    }
}
