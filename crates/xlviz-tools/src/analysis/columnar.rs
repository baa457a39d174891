//! Columnar execution on polars for large files
//!
//! Datasets are converted to a [`DataFrame`] with a hidden row-index column
//! so filter results can be mapped back onto the loaded rows.

use super::aggregate::{Aggregation, compare_keys, key_rank};
use super::filter::{CompareOp, Comparison, ComparisonValue};
use super::stats::{self, ColumnStats, Describe};
use crate::error::{DataError, DataResult};
use crate::workbook::dataset::dedupe_headers;
use crate::workbook::{CellValue, Dataset};
use polars::prelude::*;
use tracing::debug;

const ROW_INDEX: &str = "__row";
const KEY_KIND: &str = "__kind";
const VALUE: &str = "value";

/// Build a frame from the named columns plus a row index
///
/// Numeric columns become `Float64`, everything else `String`.
pub fn to_frame(dataset: &Dataset, columns: &[&str]) -> DataResult<DataFrame> {
    let mut frame_columns = Vec::with_capacity(columns.len() + 1);
    for name in columns {
        let column = dataset.require_column(name)?;
        frame_columns.push(if column.is_numeric() {
            Column::new((*name).into(), column.numbers())
        } else {
            Column::new((*name).into(), text_values(&column.values))
        });
    }
    let index: Vec<u64> = (0..dataset.height() as u64).collect();
    frame_columns.push(Column::new(ROW_INDEX.into(), index));
    Ok(DataFrame::new(frame_columns)?)
}

fn text_values(values: &[CellValue]) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| match v {
            CellValue::Empty => None,
            other => Some(other.to_string()),
        })
        .collect()
}

/// Rows of `dataset` matching a single comparison
///
/// Fails when polars rejects the comparison, for example a text literal
/// against a numeric column.
pub fn filter_rows(dataset: &Dataset, comparison: &Comparison) -> DataResult<Vec<usize>> {
    let name = comparison.column.as_str();
    let frame = to_frame(dataset, &[name])?;

    let literal = match &comparison.value {
        ComparisonValue::Number(n) => lit(*n),
        ComparisonValue::Text(s) => lit(s.clone()),
    };
    let target = col(name);
    let predicate = match comparison.op {
        CompareOp::Eq => target.eq(literal),
        CompareOp::Ne => target.neq_missing(literal),
        CompareOp::Gt => target.gt(literal),
        CompareOp::Lt => target.lt(literal),
        CompareOp::Ge => target.gt_eq(literal),
        CompareOp::Le => target.lt_eq(literal),
    };

    let result = frame
        .lazy()
        .filter(predicate)
        .select([col(ROW_INDEX)])
        .collect()?;
    let rows = result
        .column(ROW_INDEX)?
        .as_materialized_series()
        .u64()?
        .into_no_null_iter()
        .map(|i| i as usize)
        .collect::<Vec<_>>();

    debug!(column = name, op = %comparison.op, matched = rows.len(), "Columnar filter");
    Ok(rows)
}

/// Describe-style statistics computed on polars
///
/// Same rows and formatting as [`super::describe`]: numeric columns get
/// count, mean, sample std, min, linear quartiles and max; other columns
/// get count, unique, top and freq, ties going to the first-seen value.
pub fn describe(dataset: &Dataset) -> DataResult<Describe> {
    let mut per_column = Vec::with_capacity(dataset.width());
    for column in dataset.columns() {
        per_column.push(if column.is_numeric() {
            numeric_stats(column)?
        } else {
            text_stats(column)?
        });
    }
    debug!(columns = per_column.len(), rows = dataset.height(), "Columnar describe");
    Ok(stats::assemble(dataset, per_column))
}

fn numeric_stats(column: &crate::workbook::Column) -> DataResult<ColumnStats> {
    let values = column.finite_numbers();
    let mut stats = ColumnStats::new();
    stats.insert("count", values.len().to_string());
    if values.is_empty() {
        return Ok(stats);
    }

    let count = values.len();
    let frame = DataFrame::new(vec![Column::new(VALUE.into(), values)])?;
    let quartile = |q: f64| col(VALUE).quantile(lit(q), QuantileMethod::Linear);
    let reduced = frame
        .lazy()
        .select([
            col(VALUE).mean().alias("mean"),
            col(VALUE).std(1).alias("std"),
            col(VALUE).min().alias("min"),
            quartile(0.25).alias("25%"),
            quartile(0.5).alias("50%"),
            quartile(0.75).alias("75%"),
            col(VALUE).max().alias("max"),
        ])
        .collect()?;

    for stat in ["mean", "std", "min", "25%", "50%", "75%", "max"] {
        if stat == "std" && count < 2 {
            continue;
        }
        let value = reduced
            .column(stat)?
            .as_materialized_series()
            .cast(&DataType::Float64)?
            .f64()?
            .get(0);
        if let Some(value) = value {
            stats.insert(stat, stats::format_stat(value));
        }
    }
    Ok(stats)
}

fn text_stats(column: &crate::workbook::Column) -> DataResult<ColumnStats> {
    let index: Vec<u64> = (0..column.values.len() as u64).collect();
    let frame = DataFrame::new(vec![
        Column::new(VALUE.into(), text_values(&column.values)),
        Column::new(ROW_INDEX.into(), index),
    ])?;

    let totals = frame
        .clone()
        .lazy()
        .select([
            col(VALUE).count().cast(DataType::UInt64).alias("count"),
            col(VALUE).drop_nulls().n_unique().cast(DataType::UInt64).alias("unique"),
        ])
        .collect()?;
    let total = |name: &str| -> DataResult<u64> {
        Ok(totals
            .column(name)?
            .as_materialized_series()
            .u64()?
            .get(0)
            .unwrap_or(0))
    };

    let mut stats = ColumnStats::new();
    stats.insert("count", total("count")?.to_string());
    stats.insert("unique", total("unique")?.to_string());

    let ranked = frame
        .lazy()
        .filter(col(VALUE).is_not_null())
        .group_by([col(VALUE)])
        .agg([
            len().cast(DataType::UInt64).alias("freq"),
            col(ROW_INDEX).min().alias("first"),
        ])
        .sort_by_exprs(
            [col("freq"), col("first")],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(1)
        .collect()?;
    if ranked.height() > 0 {
        let top = ranked.column(VALUE)?.as_materialized_series().str()?.get(0).map(str::to_string);
        let freq = ranked.column("freq")?.as_materialized_series().u64()?.get(0);
        if let (Some(top), Some(freq)) = (top, freq) {
            stats.insert("top", top);
            stats.insert("freq", freq.to_string());
        }
    }
    Ok(stats)
}

/// Group-by aggregation on polars
///
/// Produces the same shape and order as [`super::group_aggregate`]: the key
/// column, then one reduced column per value column, sorted by key, empty
/// keys dropped. Keys are grouped together with their cell type so `10` and
/// `"10"` stay apart, and each group reports its original key cell.
pub fn group_aggregate(
    dataset: &Dataset,
    key: &str,
    values: &[&str],
    aggregation: Aggregation,
) -> DataResult<Dataset> {
    let key_column = dataset.require_column(key)?;
    let mut names = vec![key.to_string()];
    names.extend(values.iter().map(|v| v.to_string()));
    let names = dedupe_headers(names);

    let mut frame_columns = Vec::with_capacity(names.len() + 2);
    frame_columns.push(if key_column.is_numeric() {
        Column::new(names[0].as_str().into(), key_column.numbers())
    } else {
        Column::new(names[0].as_str().into(), text_values(&key_column.values))
    });
    let kinds: Vec<u32> = key_column.values.iter().map(|v| key_rank(v) as u32).collect();
    frame_columns.push(Column::new(KEY_KIND.into(), kinds));
    let index: Vec<u64> = (0..dataset.height() as u64).collect();
    frame_columns.push(Column::new(ROW_INDEX.into(), index));

    for (value, alias) in values.iter().zip(&names[1..]) {
        let column = dataset.require_column(value)?;
        let numbers: Vec<Option<f64>> = if aggregation.needs_numbers() {
            let numbers = column.numbers();
            if numbers.iter().all(Option::is_none) {
                return Err(DataError::NotNumeric(column.name.clone()));
            }
            numbers
        } else {
            column
                .values
                .iter()
                .map(|v| (!v.is_empty()).then_some(1.0))
                .collect()
        };
        frame_columns.push(Column::new(alias.as_str().into(), numbers));
    }
    let frame = DataFrame::new(frame_columns)?;

    let key_name = names[0].as_str();
    let mut reductions: Vec<Expr> = names[1..]
        .iter()
        .map(|alias| {
            let target = col(alias.as_str());
            match aggregation {
                Aggregation::Sum => target.sum(),
                Aggregation::Mean => target.mean(),
                Aggregation::Count => target.count().cast(DataType::Float64),
                Aggregation::Min => target.min(),
                Aggregation::Max => target.max(),
            }
        })
        .collect();
    reductions.push(col(ROW_INDEX).min());

    let grouped = frame
        .lazy()
        .filter(col(key_name).is_not_null())
        .group_by([col(key_name), col(KEY_KIND)])
        .agg(reductions)
        .collect()?;

    let first_rows: Vec<usize> = grouped
        .column(ROW_INDEX)?
        .as_materialized_series()
        .u64()?
        .into_no_null_iter()
        .map(|i| i as usize)
        .collect();
    let mut order: Vec<usize> = (0..first_rows.len()).collect();
    order.sort_by(|&a, &b| {
        compare_keys(
            &key_column.values[first_rows[a]],
            &key_column.values[first_rows[b]],
        )
    });

    let keys = order
        .iter()
        .map(|&group| key_column.values[first_rows[group]].clone())
        .collect();
    let mut columns = Vec::with_capacity(names.len());
    columns.push(crate::workbook::Column::new(names[0].clone(), keys));
    for name in &names[1..] {
        let reduced = grouped
            .column(name.as_str())?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let reduced = reduced.f64()?;
        let cells = order
            .iter()
            .map(|&group| reduced.get(group).map(CellValue::Number).unwrap_or(CellValue::Empty))
            .collect();
        columns.push(crate::workbook::Column::new(name.clone(), cells));
    }

    debug!(key, groups = grouped.height(), %aggregation, "Columnar aggregation");
    Dataset::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter::translate_simple;

    fn sales() -> Dataset {
        Dataset::new(vec![
            crate::workbook::Column::new(
                "region",
                vec![
                    CellValue::Text("A".into()),
                    CellValue::Text("B".into()),
                    CellValue::Text("A".into()),
                ],
            ),
            crate::workbook::Column::new(
                "sales",
                vec![
                    CellValue::Number(10.0),
                    CellValue::Number(30.0),
                    CellValue::Number(20.0),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_filter_numeric() {
        let comparison = translate_simple("sales > 15").unwrap();
        assert_eq!(filter_rows(&sales(), &comparison).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_filter_text() {
        let comparison = translate_simple("region == 'A'").unwrap();
        assert_eq!(filter_rows(&sales(), &comparison).unwrap(), vec![0, 2]);
    }

    #[test]
    fn test_group_sum_matches_native() {
        let ds = sales();
        let columnar = group_aggregate(&ds, "region", &["sales"], Aggregation::Sum).unwrap();
        let native = super::super::group_aggregate(&ds, "region", &["sales"], Aggregation::Sum).unwrap();
        assert_eq!(columnar, native);
    }

    #[test]
    fn test_group_count_on_text() {
        let result = group_aggregate(&sales(), "region", &["region"], Aggregation::Count).unwrap();
        assert_eq!(
            result.column("region.1").unwrap().values,
            vec![CellValue::Number(2.0), CellValue::Number(1.0)]
        );
    }

    #[test]
    fn test_mixed_keys_follow_native_order() {
        let ds = Dataset::new(vec![
            crate::workbook::Column::new(
                "code",
                vec![
                    CellValue::Number(10.0),
                    CellValue::Text("b".into()),
                    CellValue::Number(2.0),
                    CellValue::Text("10".into()),
                    CellValue::Number(10.0),
                    CellValue::Empty,
                ],
            ),
            crate::workbook::Column::new(
                "amount",
                vec![
                    CellValue::Number(1.0),
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                    CellValue::Number(5.0),
                    CellValue::Number(6.0),
                ],
            ),
        ])
        .unwrap();

        let columnar = group_aggregate(&ds, "code", &["amount"], Aggregation::Sum).unwrap();
        let native = super::super::group_aggregate(&ds, "code", &["amount"], Aggregation::Sum).unwrap();
        assert_eq!(columnar, native);
        assert_eq!(
            columnar.column("code").unwrap().values,
            vec![
                CellValue::Number(2.0),
                CellValue::Number(10.0),
                CellValue::Text("10".into()),
                CellValue::Text("b".into()),
            ]
        );
        assert_eq!(
            columnar.column("amount").unwrap().values,
            vec![
                CellValue::Number(3.0),
                CellValue::Number(6.0),
                CellValue::Number(4.0),
                CellValue::Number(2.0),
            ]
        );
    }
}
