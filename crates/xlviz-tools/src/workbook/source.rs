//! Reading sheets through calamine

use super::dataset::Dataset;
use super::value::{CellValue, format_number};
use crate::error::{DataError, DataResult};
use calamine::{Data, Dimensions, Range, Reader, Sheets, open_workbook_auto};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Rows of one sheet, possibly cut short
#[derive(Debug, Clone)]
pub struct SheetData {
    /// Sheet the rows came from
    pub name: String,
    /// Loaded rows
    pub dataset: Dataset,
    /// Data rows in the sheet, excluding the header
    pub total_rows: usize,
}

/// An open workbook
pub struct WorkbookFile {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl WorkbookFile {
    /// Open any format calamine understands (xlsx, xlsm, xlsb, xls, ods)
    pub fn open(path: &Path) -> DataResult<Self> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }

    /// Path the workbook was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// The requested sheet, or the first sheet when none is named
    pub fn resolve_sheet(&self, requested: Option<&str>) -> DataResult<String> {
        let names = self.sheet_names();
        match requested {
            Some(name) => names
                .into_iter()
                .find(|n| n == name)
                .ok_or_else(|| DataError::SheetNotFound(name.to_string())),
            None => names.into_iter().next().ok_or(DataError::NoSheets),
        }
    }

    /// Raw cell range of a sheet
    pub fn range(&mut self, sheet: &str) -> DataResult<Range<Data>> {
        Ok(self.workbook.worksheet_range(sheet)?)
    }

    /// Formula text of a sheet, without the leading `=`
    pub fn formulas(&mut self, sheet: &str) -> DataResult<Range<String>> {
        Ok(self.workbook.worksheet_formula(sheet)?)
    }

    /// Merged cell areas of a sheet; empty for formats that do not record them
    pub fn merged_regions(&mut self, sheet: &str) -> DataResult<Vec<Dimensions>> {
        match &mut self.workbook {
            Sheets::Xlsx(xlsx) => match xlsx.worksheet_merge_cells(sheet) {
                Some(regions) => Ok(regions.map_err(calamine::Error::Xlsx)?),
                None => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    /// Workbook-level defined names as `(name, formula)`
    pub fn defined_names(&self) -> Vec<(String, String)> {
        self.workbook.defined_names().to_vec()
    }

    /// Read a sheet as a dataset, converting at most `row_limit` data rows
    pub fn read_sheet(
        &mut self,
        requested: Option<&str>,
        row_limit: Option<usize>,
    ) -> DataResult<SheetData> {
        let name = self.resolve_sheet(requested)?;
        let range = self.range(&name)?;
        let (dataset, total_rows) = dataset_from_range(&range, row_limit);
        tracing::debug!(
            sheet = %name,
            rows = dataset.height(),
            total_rows,
            columns = dataset.width(),
            "Loaded sheet from {}",
            self.path.display()
        );
        Ok(SheetData {
            name,
            dataset,
            total_rows,
        })
    }
}

/// Convert a range whose first row is the header
///
/// Returns the dataset and the number of data rows in the whole range.
pub fn dataset_from_range(range: &Range<Data>, row_limit: Option<usize>) -> (Dataset, usize) {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();
    let total_rows = range.height().saturating_sub(1);

    let data_rows: Vec<Vec<CellValue>> = rows
        .take(row_limit.unwrap_or(usize::MAX))
        .map(|row| row.iter().map(CellValue::from_calamine).collect())
        .collect();

    (Dataset::from_rows(headers, data_rows), total_rows)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        other => CellValue::from_calamine(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_from_range_counts_rows() {
        let mut range: Range<Data> = Range::new((0, 0), (3, 1));
        range.set_value((0, 0), Data::String("region".into()));
        range.set_value((0, 1), Data::String("sales".into()));
        for (i, (region, sales)) in [("A", 10.0), ("B", 30.0), ("A", 20.0)].iter().enumerate() {
            range.set_value((i as u32 + 1, 0), Data::String(region.to_string()));
            range.set_value((i as u32 + 1, 1), Data::Float(*sales));
        }

        let (full, total) = dataset_from_range(&range, None);
        assert_eq!(total, 3);
        assert_eq!(full.height(), 3);
        assert_eq!(full.column_names(), vec!["region", "sales"]);

        let (capped, total) = dataset_from_range(&range, Some(2));
        assert_eq!(total, 3);
        assert_eq!(capped.height(), 2);
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(WorkbookFile::open(Path::new("/definitely/not/here.xlsx")).is_err());
    }
}
