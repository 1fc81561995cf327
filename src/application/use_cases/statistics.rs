// ============================================================
// STATISTICS ENGINE
// ============================================================
// Mean/median/mode over the numeric-parseable subset of a column. Missing,
// non-numeric and non-finite values are excluded ("nan" and "inf" parse as
// f64 but carry no usable magnitude); an all-excluded column yields None
// across the board and callers must handle that case.

use super::detector::is_numeric_string;
use crate::domain::Cell;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStatistics {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
}

/// Compute statistics over one column's cells.
pub fn column_statistics<'a>(values: impl Iterator<Item = &'a Cell>) -> ColumnStatistics {
    let numeric: Vec<f64> = values
        .filter_map(|cell| cell.value())
        .filter(|text| is_numeric_string(text))
        .filter_map(|text| text.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect();

    if numeric.is_empty() {
        return ColumnStatistics::default();
    }

    let mean = numeric.iter().sum::<f64>() / numeric.len() as f64;

    let mut sorted = numeric.clone();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    ColumnStatistics {
        mean: Some(mean),
        median: Some(median),
        mode: Some(mode_of(&numeric)),
    }
}

/// Most frequent value; ties break to the value encountered first.
fn mode_of(values: &[f64]) -> f64 {
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for value in values {
        *counts.entry(value.to_bits()).or_insert(0) += 1;
    }

    let mut best = values[0];
    let mut best_count = 0usize;
    for value in values {
        let count = counts[&value.to_bits()];
        if count > best_count {
            best = *value;
            best_count = count;
        }
    }
    best
}
