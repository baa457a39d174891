//! Workbook loading configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings that drive path resolution and the size-adaptive loader
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    /// Base directory for relative file paths (user documents when unset)
    pub default_directory: Option<PathBuf>,
    /// Files strictly larger than this many megabytes use the large-file path
    pub large_file_threshold_mb: u64,
    /// Maximum rows rendered in a text preview of a large file
    pub preview_row_limit: usize,
    /// Rows read when only column names are needed
    pub column_peek_rows: usize,
    /// Files above this size report estimated row counts
    pub estimate_threshold_mb: u64,
    /// Average row size used for row count estimates
    pub assumed_row_bytes: u64,
}

impl Default for WorkbookConfig {
    fn default() -> Self {
        Self {
            default_directory: None,
            large_file_threshold_mb: 50,
            preview_row_limit: 1000,
            column_peek_rows: 5,
            estimate_threshold_mb: 500,
            assumed_row_bytes: 200,
        }
    }
}

impl WorkbookConfig {
    /// Directory that relative paths are resolved against
    pub fn resolved_default_directory(&self) -> PathBuf {
        if let Some(dir) = &self.default_directory {
            return dir.clone();
        }
        dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_default_directory_wins() {
        let config = WorkbookConfig {
            default_directory: Some(PathBuf::from("/data/sheets")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_default_directory(),
            PathBuf::from("/data/sheets")
        );
    }
}
