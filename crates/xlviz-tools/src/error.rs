//! Error types for workbook loading, analysis and rendering
//!
//! Every variant's message is shown to the caller verbatim after the
//! `Error: ` prefix, so the path/column/sheet names are always included.

use crate::analysis::filter::FilterError;
use std::path::PathBuf;
use thiserror::Error;
use xlviz_core::tools::ToolError;

/// Errors that can occur while reading, analysing or writing a workbook
#[derive(Error, Debug)]
pub enum DataError {
    /// The resolved path does not exist
    #[error("File '{}' does not exist.", .0.display())]
    FileNotFound(PathBuf),

    /// The requested sheet is not in the workbook
    #[error("Sheet '{0}' does not exist in the file.")]
    SheetNotFound(String),

    /// A named column is not in the dataset
    #[error("Column '{0}' does not exist in the file.")]
    ColumnNotFound(String),

    /// A column that must hold numbers has none
    #[error("Column '{0}' contains no numeric values.")]
    NotNumeric(String),

    /// The workbook has no sheets
    #[error("The workbook contains no sheets.")]
    NoSheets,

    /// Unknown aggregation name
    #[error("aggregation '{0}' (expected one of sum, mean, count, min, max)")]
    UnsupportedAggregation(String),

    /// Unknown chart type name
    #[error("chart type '{name}' (expected one of {expected})")]
    UnsupportedChart { name: String, expected: &'static str },

    /// File format the operation cannot handle
    #[error("file format '{0}'")]
    UnsupportedFormat(String),

    /// Filter expression errors
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Spreadsheet parsing error
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Spreadsheet writing error
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Chart drawing or encoding failed
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// Invalid data shape
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

impl From<calamine::Error> for DataError {
    fn from(err: calamine::Error) -> Self {
        DataError::Workbook(err.to_string())
    }
}

impl From<DataError> for ToolError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::FileNotFound(_)
            | DataError::SheetNotFound(_)
            | DataError::ColumnNotFound(_) => ToolError::NotFound(err.to_string()),
            DataError::UnsupportedAggregation(_)
            | DataError::UnsupportedChart { .. }
            | DataError::UnsupportedFormat(_) => ToolError::Unsupported(err.to_string()),
            DataError::Filter(e) => ToolError::Evaluation(e.to_string()),
            DataError::NotNumeric(_) | DataError::NoSheets | DataError::InvalidData(_) => {
                ToolError::InvalidArguments(err.to_string())
            }
            DataError::Workbook(_)
            | DataError::Polars(_)
            | DataError::Xlsx(_)
            | DataError::Io(_)
            | DataError::Render(_) => ToolError::ExecutionFailed(err.to_string()),
        }
    }
}
