//! Group-by aggregation

use crate::error::{DataError, DataResult};
use crate::workbook::dataset::dedupe_headers;
use crate::workbook::{CellValue, Column, Dataset};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reduction applied to each group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl Aggregation {
    /// Accepted names
    pub const NAMES: [&'static str; 5] = ["sum", "mean", "count", "min", "max"];

    /// Lower-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Mean => "mean",
            Aggregation::Count => "count",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    /// Parse an optional argument, treating blank as absent
    pub fn parse_optional(value: Option<&str>) -> DataResult<Option<Self>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(name) => name.parse().map(Some),
            None => Ok(None),
        }
    }

    /// Whether the reduction needs numeric input
    pub fn needs_numbers(self) -> bool {
        self != Aggregation::Count
    }

    /// Reduce one group's cells
    pub fn reduce(self, cells: &[&CellValue]) -> CellValue {
        let numbers = || cells.iter().filter_map(|c| c.as_f64());
        match self {
            Aggregation::Count => {
                CellValue::Number(cells.iter().filter(|c| !c.is_empty()).count() as f64)
            }
            Aggregation::Sum => CellValue::Number(numbers().sum()),
            Aggregation::Mean => {
                let (sum, n) = numbers().fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
                if n == 0 {
                    CellValue::Empty
                } else {
                    CellValue::Number(sum / n as f64)
                }
            }
            Aggregation::Min => numbers()
                .reduce(f64::min)
                .map(CellValue::Number)
                .unwrap_or(CellValue::Empty),
            Aggregation::Max => numbers()
                .reduce(f64::max)
                .map(CellValue::Number)
                .unwrap_or(CellValue::Empty),
        }
    }
}

impl FromStr for Aggregation {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(Aggregation::Sum),
            "mean" => Ok(Aggregation::Mean),
            "count" => Ok(Aggregation::Count),
            "min" => Ok(Aggregation::Min),
            "max" => Ok(Aggregation::Max),
            _ => Err(DataError::UnsupportedAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group key ordered numbers first, then booleans, dates and text
#[derive(Debug, Clone)]
struct GroupKey(CellValue);

/// Rank of a cell's type in the group ordering: numbers, booleans, dates,
/// text, empty
pub(crate) fn key_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Number(_) => 0,
        CellValue::Bool(_) => 1,
        CellValue::DateTime(_) => 2,
        CellValue::Text(_) => 3,
        CellValue::Empty => 4,
    }
}

/// Order of group keys in aggregation results
pub(crate) fn compare_keys(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        (CellValue::DateTime(a), CellValue::DateTime(b)) => a.cmp(b),
        (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
        _ => key_rank(a).cmp(&key_rank(b)),
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.0, &other.0)
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

/// Group rows by `key` and reduce each of `values`
///
/// Rows with an empty key are dropped. The result has the key column
/// followed by one column per value column, sorted by key.
pub fn group_aggregate(
    dataset: &Dataset,
    key: &str,
    values: &[&str],
    aggregation: Aggregation,
) -> DataResult<Dataset> {
    let key_column = dataset.require_column(key)?;
    let value_columns = values
        .iter()
        .map(|name| dataset.require_column(name))
        .collect::<DataResult<Vec<_>>>()?;

    if aggregation.needs_numbers() {
        for column in &value_columns {
            if column.values.iter().all(|v| v.as_f64().is_none()) {
                return Err(DataError::NotNumeric(column.name.clone()));
            }
        }
    }

    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for (row, cell) in key_column.values.iter().enumerate() {
        if !cell.is_empty() {
            groups.entry(GroupKey(cell.clone())).or_default().push(row);
        }
    }

    let mut names = vec![key.to_string()];
    names.extend(values.iter().map(|v| v.to_string()));
    let mut names = dedupe_headers(names).into_iter();

    let keys: Vec<CellValue> = groups.keys().map(|k| k.0.clone()).collect();
    let mut columns = vec![Column::new(names.next().unwrap_or_default(), keys)];
    for column in value_columns {
        let reduced = groups
            .values()
            .map(|rows| {
                let cells: Vec<&CellValue> = rows.iter().map(|&r| &column.values[r]).collect();
                aggregation.reduce(&cells)
            })
            .collect();
        columns.push(Column::new(names.next().unwrap_or_default(), reduced));
    }

    Dataset::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "region",
                vec![
                    CellValue::Text("A".into()),
                    CellValue::Text("B".into()),
                    CellValue::Text("A".into()),
                ],
            ),
            Column::new(
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
    fn test_sum_by_region() {
        let result = group_aggregate(&sales(), "region", &["sales"], Aggregation::Sum).unwrap();
        assert_eq!(
            result.column("region").unwrap().values,
            vec![CellValue::Text("A".into()), CellValue::Text("B".into())]
        );
        assert_eq!(
            result.column("sales").unwrap().values,
            vec![CellValue::Number(30.0), CellValue::Number(30.0)]
        );
    }

    #[test]
    fn test_other_reductions() {
        let ds = sales();
        let mean = group_aggregate(&ds, "region", &["sales"], Aggregation::Mean).unwrap();
        assert_eq!(mean.column("sales").unwrap().values[0], CellValue::Number(15.0));
        let count = group_aggregate(&ds, "region", &["sales"], Aggregation::Count).unwrap();
        assert_eq!(count.column("sales").unwrap().values[0], CellValue::Number(2.0));
        let min = group_aggregate(&ds, "region", &["sales"], Aggregation::Min).unwrap();
        assert_eq!(min.column("sales").unwrap().values[0], CellValue::Number(10.0));
        let max = group_aggregate(&ds, "region", &["sales"], Aggregation::Max).unwrap();
        assert_eq!(max.column("sales").unwrap().values[0], CellValue::Number(20.0));
    }

    #[test]
    fn test_count_works_on_text() {
        let result = group_aggregate(&sales(), "region", &["region"], Aggregation::Count).unwrap();
        assert_eq!(result.column_names(), vec!["region", "region.1"]);
        assert_eq!(result.column("region.1").unwrap().values[0], CellValue::Number(2.0));
    }

    #[test]
    fn test_sum_rejects_text_column() {
        let err = group_aggregate(&sales(), "sales", &["region"], Aggregation::Sum).unwrap_err();
        assert!(matches!(err, DataError::NotNumeric(ref c) if c == "region"));
    }

    #[test]
    fn test_numeric_keys_sort_before_text() {
        let ds = Dataset::new(vec![
            Column::new(
                "k",
                vec![
                    CellValue::Text("x".into()),
                    CellValue::Number(2.0),
                    CellValue::Empty,
                    CellValue::Number(1.0),
                ],
            ),
            Column::new("v", vec![CellValue::Number(1.0); 4]),
        ])
        .unwrap();
        let result = group_aggregate(&ds, "k", &["v"], Aggregation::Sum).unwrap();
        assert_eq!(
            result.column("k").unwrap().values,
            vec![
                CellValue::Number(1.0),
                CellValue::Number(2.0),
                CellValue::Text("x".into())
            ]
        );
    }

    #[test]
    fn test_unknown_aggregation() {
        let err = "median".parse::<Aggregation>().unwrap_err();
        assert!(matches!(err, DataError::UnsupportedAggregation(_)));
        assert_eq!(Aggregation::parse_optional(Some(" ")).unwrap(), None);
        assert_eq!(Aggregation::parse_optional(Some("SUM")).unwrap(), Some(Aggregation::Sum));
    }
}
