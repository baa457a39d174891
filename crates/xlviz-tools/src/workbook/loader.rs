//! Size-adaptive sheet loading
//!
//! [`select_loader`] picks the strategy for a file: small files are read in
//! full, large files are read with capped previews and their aggregations
//! and simple filters run on a columnar frame.

use super::size::SizeClass;
use super::source::{SheetData, WorkbookFile};
use crate::error::DataResult;
use std::path::Path;
use xlviz_core::WorkbookConfig;

/// Loaded sheet plus how it was loaded
pub type LoadedSheet = SheetData;

impl LoadedSheet {
    /// Whether fewer rows were loaded than the sheet holds
    pub fn is_truncated(&self) -> bool {
        self.dataset.height() < self.total_rows
    }
}

/// Strategy for turning a sheet into a dataset
pub trait SheetLoader: Send + Sync {
    /// Strategy name used in logs
    fn name(&self) -> &'static str;

    /// Every data row of the sheet
    fn load(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet> {
        WorkbookFile::open(path)?.read_sheet(sheet, None)
    }

    /// Rows for a full-content text preview
    fn preview(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet>;

    /// Enough rows to list column names
    fn peek_columns(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet>;

    /// Whether aggregations and simple filters should run on a columnar frame
    fn columnar(&self) -> bool;
}

/// Reads sheets in full
#[derive(Debug, Clone, Default)]
pub struct DirectLoader;

impl SheetLoader for DirectLoader {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn preview(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet> {
        self.load(path, sheet)
    }

    fn peek_columns(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet> {
        self.load(path, sheet)
    }

    fn columnar(&self) -> bool {
        false
    }
}

/// Caps previews and column peeks for large files
#[derive(Debug, Clone)]
pub struct CappedLoader {
    preview_limit: usize,
    peek_rows: usize,
}

impl CappedLoader {
    /// Create a loader with the given caps
    pub fn new(preview_limit: usize, peek_rows: usize) -> Self {
        Self {
            preview_limit,
            peek_rows,
        }
    }

    /// Maximum rows in a preview
    pub fn preview_limit(&self) -> usize {
        self.preview_limit
    }
}

impl SheetLoader for CappedLoader {
    fn name(&self) -> &'static str {
        "capped"
    }

    fn preview(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet> {
        WorkbookFile::open(path)?.read_sheet(sheet, Some(self.preview_limit))
    }

    fn peek_columns(&self, path: &Path, sheet: Option<&str>) -> DataResult<LoadedSheet> {
        WorkbookFile::open(path)?.read_sheet(sheet, Some(self.peek_rows))
    }

    fn columnar(&self) -> bool {
        true
    }
}

/// Loader for a file of the given class
pub fn select_loader(class: SizeClass, config: &WorkbookConfig) -> Box<dyn SheetLoader> {
    match class {
        SizeClass::Standard => Box::new(DirectLoader),
        SizeClass::Large => Box::new(CappedLoader::new(
            config.preview_row_limit,
            config.column_peek_rows,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_loader_by_class() {
        let config = WorkbookConfig::default();
        let standard = select_loader(SizeClass::Standard, &config);
        assert_eq!(standard.name(), "direct");
        assert!(!standard.columnar());

        let large = select_loader(SizeClass::Large, &config);
        assert_eq!(large.name(), "capped");
        assert!(large.columnar());
    }
}
