//! Row-wise evaluation of filter expressions

use super::parser::{Expr, parse};
use crate::error::DataResult;
use crate::workbook::{CellValue, Column, Dataset};
use std::collections::HashMap;

/// Parse `query` and return the indices of matching rows
pub fn query_rows(dataset: &Dataset, query: &str) -> DataResult<Vec<usize>> {
    let expr = parse(query)?;
    filter_rows(dataset, &expr)
}

/// Indices of the rows for which `expr` is true
///
/// Every referenced column is checked before any row is evaluated.
pub fn filter_rows(dataset: &Dataset, expr: &Expr) -> DataResult<Vec<usize>> {
    let mut columns: HashMap<&str, &Column> = HashMap::new();
    for name in expr.columns() {
        columns.insert(name, dataset.require_column(name)?);
    }

    Ok((0..dataset.height())
        .filter(|&row| truthy(&evaluate(expr, &columns, row)))
        .collect())
}

fn evaluate(expr: &Expr, columns: &HashMap<&str, &Column>, row: usize) -> CellValue {
    match expr {
        Expr::Column(name) => columns
            .get(name.as_str())
            .map(|c| c.values[row].clone())
            .unwrap_or(CellValue::Empty),
        Expr::Literal(value) => value.clone(),
        Expr::Compare { op, left, right } => {
            let left = evaluate(left, columns, row);
            let right = evaluate(right, columns, row);
            CellValue::Bool(op.holds(left.partial_compare(&right)))
        }
        Expr::And(left, right) => CellValue::Bool(
            truthy(&evaluate(left, columns, row)) && truthy(&evaluate(right, columns, row)),
        ),
        Expr::Or(left, right) => CellValue::Bool(
            truthy(&evaluate(left, columns, row)) || truthy(&evaluate(right, columns, row)),
        ),
        Expr::Not(inner) => CellValue::Bool(!truthy(&evaluate(inner, columns, row))),
    }
}

fn truthy(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => false,
        CellValue::Bool(b) => *b,
        CellValue::Number(n) => *n != 0.0 && !n.is_nan(),
        CellValue::Text(s) => !s.is_empty(),
        CellValue::DateTime(_) => true,
    }
}
