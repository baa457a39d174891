//! Writing a chart sheet back into a workbook
//!
//! The writer can only produce whole workbooks, so every existing sheet is
//! read back with calamine and rebuilt: cell values, formulas (with their
//! cached results), merged areas and workbook defined names are carried
//! across. Cell styles, column widths and embedded objects are not.

use super::dataset::Dataset;
use super::value::CellValue;
use crate::error::{DataError, DataResult};
use calamine::{Data, Dimensions, Range};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Chart, ChartType, Format, Formula, Workbook, Worksheet};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::source::WorkbookFile;

const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Native chart types that can be embedded in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeChartKind {
    Column,
    Bar,
    Line,
    Pie,
    Scatter,
}

impl NativeChartKind {
    /// Accepted names, for error messages and schemas
    pub const NAMES: &'static str = "column, bar, line, pie, scatter";

    fn chart_type(self) -> ChartType {
        match self {
            NativeChartKind::Column => ChartType::Column,
            NativeChartKind::Bar => ChartType::Bar,
            NativeChartKind::Line => ChartType::Line,
            NativeChartKind::Pie => ChartType::Pie,
            NativeChartKind::Scatter => ChartType::Scatter,
        }
    }
}

impl FromStr for NativeChartKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "column" => Ok(NativeChartKind::Column),
            "bar" => Ok(NativeChartKind::Bar),
            "line" => Ok(NativeChartKind::Line),
            "pie" => Ok(NativeChartKind::Pie),
            "scatter" => Ok(NativeChartKind::Scatter),
            _ => Err(DataError::UnsupportedChart {
                name: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// A table and the chart drawn from it
///
/// The first table column holds the categories (or x values), every other
/// column becomes a series.
#[derive(Debug, Clone)]
pub struct ChartSheet<'a> {
    pub sheet_name: &'a str,
    pub title: &'a str,
    pub kind: NativeChartKind,
    pub table: &'a Dataset,
}

/// Where the chart sheet ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenChart {
    /// Zero-based sheet position
    pub position: usize,
    /// Whether an existing sheet of the same name was replaced
    pub replaced: bool,
}

/// Replace or append `request.sheet_name` in the workbook at `path`
pub fn write_chart_sheet(path: &Path, request: &ChartSheet<'_>) -> DataResult<WrittenChart> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if extension != "xlsx" {
        return Err(DataError::UnsupportedFormat(if extension.is_empty() {
            path.display().to_string()
        } else {
            format!(".{}", extension)
        }));
    }
    if request.table.width() < 2 {
        return Err(DataError::InvalidData(
            "a chart needs a category column and at least one value column".to_string(),
        ));
    }
    if request.table.is_empty() {
        return Err(DataError::InvalidData("no rows to chart".to_string()));
    }

    let existing = read_workbook(path)?;
    let target = request.sheet_name.to_lowercase();
    let replaced_at = existing
        .sheets
        .iter()
        .position(|sheet| sheet.name.to_lowercase() == target);

    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let mut workbook = Workbook::new();
    let mut position = existing.sheets.len();

    for (index, sheet) in existing.sheets.iter().enumerate() {
        if Some(index) == replaced_at {
            position = index;
            write_table_sheet(&mut workbook, request, &date_format)?;
            continue;
        }
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        copy_sheet(worksheet, sheet, &date_format)?;
    }
    if replaced_at.is_none() {
        write_table_sheet(&mut workbook, request, &date_format)?;
    }
    for (name, formula) in &existing.names {
        if let Err(err) = workbook.define_name(name.as_str(), &format!("={}", formula.trim_start_matches('='))) {
            warn!(name = name.as_str(), error = %err, "Skipping defined name");
        }
    }

    let buffer = workbook.save_to_buffer()?;
    std::fs::write(path, buffer)?;

    info!(
        sheet = request.sheet_name,
        position,
        replaced = replaced_at.is_some(),
        "Wrote chart sheet to {}",
        path.display()
    );
    Ok(WrittenChart {
        position,
        replaced: replaced_at.is_some(),
    })
}

/// A sheet as read back for the rewrite
struct ExistingSheet {
    name: String,
    values: Range<Data>,
    formulas: Range<String>,
    merged: Vec<Dimensions>,
}

struct ExistingWorkbook {
    sheets: Vec<ExistingSheet>,
    names: Vec<(String, String)>,
}

fn read_workbook(path: &Path) -> DataResult<ExistingWorkbook> {
    let mut file = WorkbookFile::open(path)?;
    let mut sheets = Vec::new();
    for name in file.sheet_names() {
        let values = file.range(&name)?;
        let formulas = file.formulas(&name)?;
        let merged = file.merged_regions(&name)?;
        sheets.push(ExistingSheet {
            name,
            values,
            formulas,
            merged,
        });
    }
    let mut seen = HashSet::new();
    let names = file
        .defined_names()
        .into_iter()
        .filter(|(name, _)| !name.starts_with("_xlnm.") && seen.insert(name.to_lowercase()))
        .collect();
    debug!(sheets = sheets.len(), "Read existing sheets for rewrite");
    Ok(ExistingWorkbook { sheets, names })
}

fn copy_sheet(worksheet: &mut Worksheet, sheet: &ExistingSheet, date_format: &Format) -> DataResult<()> {
    let plain = Format::new();
    for region in &sheet.merged {
        let (first_row, first_col) = region.start;
        let (last_row, last_col) = region.end;
        if (first_row, first_col) == (last_row, last_col) {
            continue;
        }
        worksheet.merge_range(
            first_row,
            to_col(first_col as usize)?,
            last_row,
            to_col(last_col as usize)?,
            "",
            &plain,
        )?;
    }

    copy_range(worksheet, &sheet.values, date_format)?;

    let (start_row, start_col) = sheet.formulas.start().unwrap_or((0, 0));
    for (row, col, formula) in sheet.formulas.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let row = start_row + row as u32;
        let col = start_col + col as u32;
        let mut cell = Formula::new(format!("={}", formula.trim_start_matches('=')));
        if let Some(value) = sheet.values.get_value((row, col)) {
            cell = cell.set_result(value.to_string());
        }
        worksheet.write_formula(row, to_col(col as usize)?, cell)?;
    }
    Ok(())
}

fn copy_range(worksheet: &mut Worksheet, range: &Range<Data>, date_format: &Format) -> DataResult<()> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    for (row, col, cell) in range.used_cells() {
        let row = start_row + row as u32;
        let col = to_col(start_col as usize + col)?;
        match cell {
            Data::Empty => {}
            Data::Int(n) => {
                worksheet.write_number(row, col, *n as f64)?;
            }
            Data::Float(n) => {
                worksheet.write_number(row, col, *n)?;
            }
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row, col, s)?;
            }
            Data::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Data::DateTime(dt) => {
                worksheet.write_number_with_format(row, col, dt.as_f64(), date_format)?;
            }
            Data::Error(e) => {
                worksheet.write_string(row, col, e.to_string())?;
            }
        }
    }
    Ok(())
}

fn write_table_sheet(workbook: &mut Workbook, request: &ChartSheet<'_>, date_format: &Format) -> DataResult<()> {
    let table = request.table;
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(request.sheet_name)?;

    for (j, column) in table.columns().iter().enumerate() {
        let col = to_col(j)?;
        worksheet.write_string(0, col, &column.name)?;
        for (i, value) in column.values.iter().enumerate() {
            let row = i as u32 + 1;
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                CellValue::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::DateTime(dt) => {
                    worksheet.write_number_with_format(row, col, excel_serial(dt), date_format)?;
                }
            }
        }
    }

    let last_row = table.height() as u32;
    let mut chart = Chart::new(request.kind.chart_type());
    let series_columns = if request.kind == NativeChartKind::Pie {
        1..2
    } else {
        1..table.width()
    };
    for j in series_columns {
        let col = to_col(j)?;
        chart
            .add_series()
            .set_name((request.sheet_name, 0, col))
            .set_categories((request.sheet_name, 1, 0, last_row, 0))
            .set_values((request.sheet_name, 1, col, last_row, col));
    }
    chart.title().set_name(request.title);
    if request.kind != NativeChartKind::Pie {
        if let Some(x) = table.columns().first() {
            chart.x_axis().set_name(x.name.as_str());
        }
    }

    worksheet.insert_chart(1, to_col(table.width() + 1)?, &chart)?;
    Ok(())
}

fn to_col(index: usize) -> DataResult<u16> {
    u16::try_from(index)
        .map_err(|_| DataError::InvalidData(format!("column index {} is out of range", index)))
}

/// Days since 1899-12-30, the spreadsheet date epoch
fn excel_serial(dt: &NaiveDateTime) -> f64 {
    25_569.0 + dt.and_utc().timestamp_millis() as f64 / 86_400_000.0
}
