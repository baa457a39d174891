//! Shared chart pipeline: project, aggregate, sample

use crate::analysis::{Aggregation, columnar, group_aggregate, sample_indices};
use crate::error::DataResult;
use crate::workbook::dataset::dedupe_headers;
use crate::workbook::{CellValue, Column, Dataset};
use tracing::debug;

/// Chart-ready table: the x column followed by the y columns
#[derive(Debug, Clone)]
pub struct PreparedTable {
    pub table: Dataset,
    /// Rows before sampling
    pub rows_before_sampling: usize,
}

impl PreparedTable {
    /// Whether sampling dropped rows
    pub fn is_sampled(&self) -> bool {
        self.table.height() < self.rows_before_sampling
    }

    /// Display labels of the x column
    pub fn x_labels(&self) -> Vec<String> {
        self.table
            .columns()
            .first()
            .map(|c| c.values.iter().map(CellValue::to_string).collect())
            .unwrap_or_default()
    }

    /// Numeric x positions when the x column is numeric
    pub fn x_numbers(&self) -> Option<Vec<Option<f64>>> {
        let x = self.table.columns().first()?;
        let has_numbers = x.values.iter().any(|v| matches!(v, CellValue::Number(_)));
        (x.is_numeric() && has_numbers).then(|| x.numbers())
    }

    /// Y columns in order
    pub fn y_columns(&self) -> &[Column] {
        self.table.columns().get(1..).unwrap_or(&[])
    }
}

/// Build the table a chart is drawn from
///
/// Every named column must exist. With an aggregation the rows are grouped
/// by `x` first (on polars when `columnar` is set); the result is then
/// sampled down to `max_points`.
pub fn prepare(
    dataset: &Dataset,
    x: &str,
    ys: &[&str],
    aggregation: Option<Aggregation>,
    max_points: usize,
    columnar: bool,
) -> DataResult<PreparedTable> {
    dataset.require_columns(std::iter::once(x).chain(ys.iter().copied()))?;

    let table = match aggregation {
        Some(agg) if columnar => columnar::group_aggregate(dataset, x, ys, agg)?,
        Some(agg) => group_aggregate(dataset, x, ys, agg)?,
        None => project(dataset, x, ys)?,
    };

    let rows_before_sampling = table.height();
    let indices = sample_indices(rows_before_sampling, max_points);
    let table = if indices.len() < rows_before_sampling {
        table.take_rows(&indices)
    } else {
        table
    };
    debug!(
        rows = rows_before_sampling,
        kept = table.height(),
        aggregation = aggregation.map(Aggregation::as_str),
        "Prepared chart table"
    );

    Ok(PreparedTable {
        table,
        rows_before_sampling,
    })
}

/// Copy `x` and `ys` into a new dataset, renaming repeated columns
pub fn project(dataset: &Dataset, x: &str, ys: &[&str]) -> DataResult<Dataset> {
    let names: Vec<&str> = std::iter::once(x).chain(ys.iter().copied()).collect();
    let unique = dedupe_headers(names.iter().map(|s| s.to_string()).collect());
    let columns = names
        .iter()
        .zip(unique)
        .map(|(name, unique)| {
            dataset
                .require_column(name)
                .map(|c| Column::new(unique, c.values.clone()))
        })
        .collect::<DataResult<Vec<_>>>()?;
    Dataset::new(columns)
}
