//! Describe-style summary statistics

use crate::workbook::{CellValue, Column, Dataset};
use std::collections::HashMap;

const TEXT_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];
const NUMERIC_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
const ALL_ROWS: [&str; 11] = [
    "count", "unique", "top", "freq", "mean", "std", "min", "25%", "50%", "75%", "max",
];

/// Statistic rows by column; `None` marks a statistic that does not apply
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<Option<String>>)>,
}

impl Describe {
    /// Value of `stat` for `column`
    pub fn get(&self, stat: &str, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|(name, _)| name == stat)
            .and_then(|(_, values)| values[col].as_deref())
    }
}

/// Statistic name to formatted value for one column
pub(crate) type ColumnStats = HashMap<&'static str, String>;

/// Summarise every column of `dataset`
///
/// Numeric columns get count, mean, sample standard deviation, min,
/// quartiles and max. Other columns get count, unique, top and freq.
pub fn describe(dataset: &Dataset) -> Describe {
    let per_column = dataset
        .columns()
        .iter()
        .map(|column| {
            if column.is_numeric() {
                numeric_stats(column)
            } else {
                text_stats(column)
            }
        })
        .collect();
    assemble(dataset, per_column)
}

/// Lay out per-column statistics as describe rows
///
/// The row set depends on which kinds of columns are present.
pub(crate) fn assemble(dataset: &Dataset, per_column: Vec<ColumnStats>) -> Describe {
    let numeric: Vec<bool> = dataset.columns().iter().map(Column::is_numeric).collect();
    let has_numeric = numeric.iter().any(|&n| n);
    let has_other = numeric.iter().any(|&n| !n);

    let row_names: &[&str] = match (has_numeric, has_other) {
        (true, false) => &NUMERIC_ROWS,
        (false, _) => &TEXT_ROWS,
        (true, true) => &ALL_ROWS,
    };

    let rows = row_names
        .iter()
        .map(|&stat| {
            let values = per_column.iter().map(|stats| stats.get(stat).cloned()).collect();
            (stat.to_string(), values)
        })
        .collect();

    Describe {
        columns: dataset.column_names().iter().map(|s| s.to_string()).collect(),
        rows,
    }
}

fn numeric_stats(column: &Column) -> ColumnStats {
    let mut values = column.finite_numbers();
    values.sort_by(f64::total_cmp);

    let mut stats = HashMap::new();
    stats.insert("count", values.len().to_string());
    if values.is_empty() {
        return stats;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    stats.insert("mean", format_stat(mean));
    if values.len() > 1 {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        stats.insert("std", format_stat(variance.sqrt()));
    }
    stats.insert("min", format_stat(values[0]));
    stats.insert("25%", format_stat(quantile(&values, 0.25)));
    stats.insert("50%", format_stat(quantile(&values, 0.5)));
    stats.insert("75%", format_stat(quantile(&values, 0.75)));
    stats.insert("max", format_stat(values[values.len() - 1]));
    stats
}

fn text_stats(column: &Column) -> ColumnStats {
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
    let mut count = 0;
    for (position, value) in column.values.iter().enumerate() {
        if matches!(value, CellValue::Empty) {
            continue;
        }
        count += 1;
        counts
            .entry(value.to_string())
            .and_modify(|(n, _)| *n += 1)
            .or_insert((1, position));
    }

    let mut stats = HashMap::new();
    stats.insert("count", count.to_string());
    stats.insert("unique", counts.len().to_string());
    let top = counts
        .iter()
        .max_by(|(_, (a, first_a)), (_, (b, first_b))| a.cmp(b).then(first_b.cmp(first_a)));
    if let Some((value, (freq, _))) = top {
        stats.insert("top", value.clone());
        stats.insert("freq", freq.to_string());
    }
    stats
}

/// Linear-interpolated quantile of sorted values
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

pub(crate) fn format_stat(value: f64) -> String {
    format!("{:.6}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|&v| CellValue::Number(v)).collect())
    }

    #[test]
    fn test_quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.0), 1.0);
        assert_eq!(quantile(&values, 0.5), 2.5);
        assert_eq!(quantile(&values, 0.25), 1.75);
        assert_eq!(quantile(&values, 1.0), 4.0);
    }

    #[test]
    fn test_numeric_only_rows() {
        let ds = Dataset::new(vec![numbers("sales", &[10.0, 30.0, 20.0])]).unwrap();
        let summary = describe(&ds);
        let names: Vec<&str> = summary.rows.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, NUMERIC_ROWS);
        assert_eq!(summary.get("count", "sales"), Some("3"));
        assert_eq!(summary.get("mean", "sales"), Some("20.000000"));
        assert_eq!(summary.get("std", "sales"), Some("10.000000"));
        assert_eq!(summary.get("50%", "sales"), Some("20.000000"));
    }

    #[test]
    fn test_mixed_columns_use_na_cells() {
        let ds = Dataset::new(vec![
            Column::new(
                "region",
                vec![
                    CellValue::Text("A".into()),
                    CellValue::Text("B".into()),
                    CellValue::Text("A".into()),
                ],
            ),
            numbers("sales", &[10.0, 30.0, 20.0]),
        ])
        .unwrap();
        let summary = describe(&ds);
        assert_eq!(summary.rows.len(), ALL_ROWS.len());
        assert_eq!(summary.get("unique", "region"), Some("2"));
        assert_eq!(summary.get("top", "region"), Some("A"));
        assert_eq!(summary.get("freq", "region"), Some("2"));
        assert_eq!(summary.get("mean", "region"), None);
        assert_eq!(summary.get("top", "sales"), None);
        assert_eq!(summary.get("max", "sales"), Some("30.000000"));
    }

    #[test]
    fn test_single_value_has_no_std() {
        let ds = Dataset::new(vec![numbers("x", &[4.0])]).unwrap();
        assert_eq!(describe(&ds).get("std", "x"), None);
    }
}
