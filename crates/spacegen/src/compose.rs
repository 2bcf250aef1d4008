use spacegen_core::{ErrorInfo, Row, SpaceError};

/// Cross join of independent row sequences.
///
/// The output holds one row per element of the cartesian product of the
/// inputs, built by pairwise reduction; when two inputs share a key, the
/// later input wins. The product of no sequences is the single empty row.
pub fn product(spaces: &[Vec<Row>]) -> Vec<Row> {
    let mut joined = vec![Row::new()];
    for space in spaces {
        let mut next = Vec::with_capacity(joined.len().saturating_mul(space.len()));
        for left in &joined {
            for right in space {
                let mut row = left.clone();
                row.extend(right.iter().map(|(key, value)| (key.clone(), value.clone())));
                next.push(row);
            }
        }
        joined = next;
    }
    joined
}

/// Index-wise merge of equal-length row sequences.
///
/// Row `i` of the output merges row `i` of every input, later inputs winning
/// on key collisions. Inputs of unequal length fail with a shape error;
/// internal callers guarantee equal lengths by construction, so seeing that
/// error through the public API indicates a defect rather than bad input.
pub fn concat(spaces: &[Vec<Row>]) -> Result<Vec<Row>, SpaceError> {
    let Some(first) = spaces.first() else {
        return Ok(Vec::new());
    };
    let len = first.len();
    for (idx, space) in spaces.iter().enumerate() {
        if space.len() != len {
            return Err(SpaceError::Shape(
                ErrorInfo::new("concat-length", "row sequences must share one length")
                    .with_context("expected", len.to_string())
                    .with_context("found", space.len().to_string())
                    .with_context("sequence", idx.to_string()),
            ));
        }
    }
    let mut rows = Vec::with_capacity(len);
    for i in 0..len {
        let mut row = Row::new();
        for space in spaces {
            row.extend(space[i].iter().map(|(key, value)| (key.clone(), value.clone())));
        }
        rows.push(row);
    }
    Ok(rows)
}
