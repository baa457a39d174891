//! State and helpers shared by the spreadsheet tools

use crate::error::{DataError, DataResult};
use crate::render::ChartSize;
use crate::workbook::{LoadedSheet, PathResolver, SheetLoader, SizeInfo, select_loader};
use std::path::PathBuf;
use tracing::debug;
use xlviz_core::tools::{ToolCall, ToolError};
use xlviz_core::{Config, WorkbookConfig};

/// Default cap on plotted points
pub const DEFAULT_MAX_POINTS: usize = 100;

/// Configuration every tool call needs
#[derive(Debug, Clone)]
pub struct ToolContext {
    resolver: PathResolver,
    workbook: WorkbookConfig,
    chart_size: ChartSize,
}

impl ToolContext {
    /// Build a context from the loaded configuration
    pub fn new(config: &Config) -> Self {
        Self {
            resolver: PathResolver::new(config.workbook.resolved_default_directory()),
            workbook: config.workbook.clone(),
            chart_size: ChartSize::new(config.chart.width, config.chart.height),
        }
    }

    /// Path resolver rooted at the default directory
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Workbook settings
    pub fn workbook_config(&self) -> &WorkbookConfig {
        &self.workbook
    }

    /// Size of rendered charts
    pub fn chart_size(&self) -> ChartSize {
        self.chart_size
    }

    /// Resolve a path argument and classify the file
    pub fn locate(&self, file_path: &str) -> DataResult<LocatedFile> {
        let path = self.resolver.resolve_existing(file_path)?;
        let size = SizeInfo::of(&path, self.workbook.large_file_threshold_mb)?;
        debug!(
            path = %path.display(),
            bytes = size.bytes,
            large = size.class.is_large(),
            "Located workbook"
        );
        Ok(LocatedFile { path, size })
    }

    /// Loader matching the file's size class
    pub fn loader_for(&self, file: &LocatedFile) -> Box<dyn SheetLoader> {
        select_loader(file.size.class, &self.workbook)
    }

    /// Locate a file and load a full sheet from it
    pub fn load(&self, file_path: &str, sheet: Option<&str>) -> DataResult<(LocatedFile, LoadedSheet)> {
        let file = self.locate(file_path)?;
        let loader = self.loader_for(&file);
        let sheet = loader.load(&file.path, sheet)?;
        debug!(strategy = loader.name(), rows = sheet.dataset.height(), "Loaded sheet");
        Ok((file, sheet))
    }
}

/// An existing workbook and its size
#[derive(Debug, Clone)]
pub struct LocatedFile {
    pub path: PathBuf,
    pub size: SizeInfo,
}

impl LocatedFile {
    /// Final path component
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Run blocking workbook work off the async runtime
pub async fn run_blocking<T, F>(task: F) -> Result<T, ToolError>
where
    F: FnOnce() -> DataResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ToolError::ExecutionFailed(format!("worker task failed: {}", e)))?
        .map_err(ToolError::from)
}

/// `File / Sheet / Dimensions` lines that open every text result
pub fn sheet_header(file_name: &str, requested_sheet: Option<&str>, rows: usize, columns: usize) -> String {
    format!(
        "File: {}\nSheet: {}\nDimensions: {} rows × {} columns\n",
        file_name,
        requested_sheet.unwrap_or("default"),
        rows,
        columns
    )
}

/// Notice appended to previews that do not show every row
pub fn truncation_notice(shown: usize, total: usize) -> String {
    format!(
        "[Showing the first {} of {} rows; the file exceeds the size threshold so the preview is capped]",
        shown, total
    )
}

/// Split a comma-separated column list, dropping blanks
pub fn split_columns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Optional `sheet_name` argument
pub fn sheet_argument(call: &ToolCall) -> Option<String> {
    call.get_string("sheet_name")
}

/// Require a point cap of at least one
pub fn max_points_argument(call: &ToolCall, key: &str, default: usize) -> Result<usize, ToolError> {
    let value = call.get_usize_or(key, default)?;
    if value == 0 {
        return Err(ToolError::InvalidArguments(format!(
            "Parameter '{}' must be at least 1",
            key
        )));
    }
    Ok(value)
}

/// Error for a column with nothing to plot
pub fn no_numeric(column: &str) -> DataError {
    DataError::NotNumeric(column.to_string())
}
