//! Point reduction for charts
//!
//! Deterministic methods keep row order. Stratified sampling is random
//! unless a seed is given.

use crate::workbook::CellValue;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Rows to keep when `n` rows must fit into `max_points`
///
/// Returns every row when they already fit, quantile positions when there
/// are more than ten times too many, and a stride sample otherwise.
pub fn sample_indices(n: usize, max_points: usize) -> Vec<usize> {
    let max_points = max_points.max(1);
    if n <= max_points {
        (0..n).collect()
    } else if n > max_points.saturating_mul(10) {
        quantile_indices(n, max_points)
    } else {
        stride_indices(n, max_points)
    }
}

/// `floor(q * (n - 1))` for `max_points` evenly spaced `q` in `[0, 1]`
pub fn quantile_indices(n: usize, max_points: usize) -> Vec<usize> {
    if n == 0 || max_points == 0 {
        return Vec::new();
    }
    if max_points == 1 {
        return vec![0];
    }
    let last = (n - 1) as f64;
    let steps = (max_points - 1) as f64;
    let mut indices: Vec<usize> = (0..max_points)
        .map(|i| ((i as f64 / steps) * last).floor() as usize)
        .map(|i| i.min(n - 1))
        .collect();
    indices.dedup();
    indices
}

/// Every `max(1, n / max_points)`-th row starting at 0
pub fn stride_indices(n: usize, max_points: usize) -> Vec<usize> {
    let step = (n / max_points.max(1)).max(1);
    (0..n).step_by(step).collect()
}

/// Sample within each category of `categories`
///
/// Each category keeps `max(1, round(max_points * size / n))` rows, capped
/// at its size. Empty cells form their own category. Indices are returned
/// in row order.
pub fn stratified_indices(
    categories: &[CellValue],
    max_points: usize,
    seed: Option<u64>,
) -> Vec<usize> {
    let n = categories.len();
    if n <= max_points {
        return (0..n).collect();
    }

    let mut order: Vec<String> = Vec::new();
    let mut strata: HashMap<String, Vec<usize>> = HashMap::new();
    for (row, value) in categories.iter().enumerate() {
        let key = value.to_string();
        strata
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(row);
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut picked = Vec::with_capacity(max_points + order.len());
    for key in &order {
        let rows = &strata[key];
        let quota = ((max_points as f64 * rows.len() as f64 / n as f64).round() as usize)
            .max(1)
            .min(rows.len());
        picked.extend(
            rand::seq::index::sample(&mut rng, rows.len(), quota)
                .into_iter()
                .map(|i| rows[i]),
        );
    }
    picked.sort_unstable();
    picked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_inputs_are_kept() {
        assert_eq!(sample_indices(5, 10), vec![0, 1, 2, 3, 4]);
        assert_eq!(sample_indices(10, 10).len(), 10);
    }

    #[test]
    fn test_stride_when_moderately_over() {
        let picked = sample_indices(250, 100);
        assert_eq!(picked, stride_indices(250, 100));
        assert_eq!(picked[..3], [0, 2, 4]);
        assert_eq!(picked.len(), 125);
    }

    #[test]
    fn test_quantile_when_far_over() {
        let picked = sample_indices(10_000, 100);
        assert_eq!(picked.len(), 100);
        assert_eq!(picked[0], 0);
        assert_eq!(*picked.last().unwrap(), 9_999);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_deterministic_methods_repeat() {
        assert_eq!(sample_indices(5_000, 37), sample_indices(5_000, 37));
        assert_eq!(sample_indices(500, 37), sample_indices(500, 37));
    }

    #[test]
    fn test_stratified_quota_per_category() {
        let mut categories = vec![CellValue::Text("big".into()); 90];
        categories.extend(vec![CellValue::Text("small".into()); 10]);
        let picked = stratified_indices(&categories, 10, Some(7));
        let small = picked.iter().filter(|&&i| i >= 90).count();
        assert_eq!(picked.len(), 10);
        assert_eq!(small, 1);
        assert!(picked.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_stratified_keeps_rare_categories() {
        let mut categories = vec![CellValue::Number(1.0); 999];
        categories.push(CellValue::Empty);
        let picked = stratified_indices(&categories, 10, Some(1));
        assert!(picked.contains(&999));
    }

    #[test]
    fn test_stratified_seed_is_reproducible() {
        let categories: Vec<CellValue> = (0..500)
            .map(|i| CellValue::Number((i % 3) as f64))
            .collect();
        assert_eq!(
            stratified_indices(&categories, 50, Some(42)),
            stratified_indices(&categories, 50, Some(42))
        );
    }
}
