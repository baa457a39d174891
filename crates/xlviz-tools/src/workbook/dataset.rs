//! In-memory tabular dataset

use super::value::CellValue;
use crate::error::{DataError, DataResult};
use std::collections::HashSet;

/// A named column of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Whether every non-empty cell is numeric
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .all(|v| matches!(v, CellValue::Empty | CellValue::Number(_)))
    }

    /// Numeric view of every cell
    pub fn numbers(&self) -> Vec<Option<f64>> {
        self.values.iter().map(CellValue::as_f64).collect()
    }

    /// Numeric cells only, skipping everything else
    pub fn finite_numbers(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_f64).collect()
    }
}

/// Ordered columns of equal length with unique names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    height: usize,
}

impl Dataset {
    /// Build a dataset, checking the column invariants
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        let height = columns.first().map(|c| c.values.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if column.values.len() != height {
                return Err(DataError::InvalidData(format!(
                    "column '{}' has {} rows, expected {}",
                    column.name,
                    column.values.len(),
                    height
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(DataError::InvalidData(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns, height })
    }

    /// Build a dataset from a header row and data rows
    ///
    /// Short rows are padded with empty cells, headers are de-duplicated.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(headers.len());
        let mut headers = headers;
        headers.resize(width, String::new());
        let names = dedupe_headers(headers);

        let height = rows.len();
        let mut values: Vec<Vec<CellValue>> = (0..width).map(|_| Vec::with_capacity(height)).collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in values.iter_mut() {
                column.push(cells.next().unwrap_or(CellValue::Empty));
            }
        }

        let columns = names
            .into_iter()
            .zip(values)
            .map(|(name, values)| Column { name, values })
            .collect();
        Self { columns, height }
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column, failing with an error that names it
    pub fn require_column(&self, name: &str) -> DataResult<&Column> {
        self.column(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Check that every name is a column, reporting the first missing one
    pub fn require_columns<'a, I>(&self, names: I) -> DataResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in names {
            self.require_column(name)?;
        }
        Ok(())
    }

    /// Cells of row `index`
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// New dataset holding the given rows, in the given order
    pub fn take_rows(&self, indices: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();
        Dataset {
            columns,
            height: indices.len(),
        }
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Dataset {
        let indices: Vec<usize> = (0..self.height.min(n)).collect();
        self.take_rows(&indices)
    }

    /// New dataset with only the named columns, in the given order
    pub fn select(&self, names: &[&str]) -> DataResult<Dataset> {
        let columns = names
            .iter()
            .map(|name| self.require_column(name).cloned())
            .collect::<DataResult<Vec<_>>>()?;
        Dataset::new(columns)
    }
}

/// Make header names unique and non-blank
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`,
/// ... suffixes in order of appearance.
pub fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut names = Vec::with_capacity(raw.len());

    for (index, header) in raw.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while used.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        used.insert(name.clone());
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_dedupe_headers() {
        let names = dedupe_headers(vec![
            "region".into(),
            "".into(),
            "sales".into(),
            "sales".into(),
            "sales".into(),
        ]);
        assert_eq!(
            names,
            vec!["region", "Unnamed: 1", "sales", "sales.1", "sales.2"]
        );
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![vec![text("x")], vec![text("y"), CellValue::Number(2.0), text("z")]],
        );
        assert_eq!(ds.height(), 2);
        assert_eq!(ds.width(), 3);
        assert_eq!(ds.column_names(), vec!["a", "b", "Unnamed: 2"]);
        assert_eq!(ds.column("b").unwrap().values[0], CellValue::Empty);
    }

    #[test]
    fn test_new_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::new("a", vec![CellValue::Number(1.0)]),
            Column::new("b", vec![]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_require_column_names_missing_column() {
        let ds = Dataset::from_rows(vec!["a".into()], vec![]);
        let err = ds.require_columns(["a", "zz", "yy"]).unwrap_err();
        assert_eq!(err.to_string(), "Column 'zz' does not exist in the file.");
    }

    #[test]
    fn test_take_rows_preserves_order() {
        let ds = Dataset::from_rows(
            vec!["n".into()],
            (0..5).map(|i| vec![CellValue::Number(i as f64)]).collect(),
        );
        let picked = ds.take_rows(&[4, 0]);
        assert_eq!(picked.column("n").unwrap().values[0], CellValue::Number(4.0));
        assert_eq!(ds.head(2).height(), 2);
    }
}
