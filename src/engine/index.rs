// src/engine/index.rs
use std::collections::HashMap;

use super::types::{Scales, ScoringKey, Sign};

/// Flatten scanned scales into a dense scoring key.
///
/// Scales with no items are dropped. Rows are numbered by first occurrence,
/// walking scales in title order, then '+' before '-', then items in page order.
/// If one scale lists the same item under both signs, the later write ('-') wins.
pub fn build_key(scales: &Scales) -> ScoringKey {
    let kept: Vec<_> = scales.iter().filter(|s| !s.is_empty()).collect();

    let mut items: Vec<String> = Vec::new();
    let mut row_of: HashMap<&str, usize> = HashMap::new();
    let mut cells: Vec<(usize, usize, i8)> = Vec::new();

    for (col, scale) in kept.iter().enumerate() {
        for sign in Sign::ORDER {
            for text in scale.items(sign) {
                let row = *row_of.entry(text.as_str()).or_insert_with(|| {
                    items.push(text.clone());
                    items.len() - 1
                });
                cells.push((row, col, sign.value()));
            }
        }
    }

    let mut values = vec![vec![0i8; kept.len()]; items.len()];
    for (row, col, v) in cells {
        values[row][col] = v;
    }

    ScoringKey {
        items,
        scales: kept.iter().map(|s| s.name.clone()).collect(),
        values,
    }
}
