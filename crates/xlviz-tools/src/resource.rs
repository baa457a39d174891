//! The `excel://{file_path}` resource: a JSON description of a workbook

use crate::error::DataResult;
use crate::tools::ToolContext;
use crate::workbook::WorkbookFile;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use xlviz_core::mcp::ResourceProvider;
use xlviz_core::mcp::types::McpResourceTemplate;

const SCHEME: &str = "excel://";

/// Workbook structure served as a resource
#[derive(Debug, Serialize)]
pub struct WorkbookDescription {
    pub file_name: String,
    pub sheets: Vec<String>,
    pub file_size: String,
    pub last_modified: String,
    pub sheet_details: BTreeMap<String, SheetDetails>,
}

/// Shape of one sheet
#[derive(Debug, Serialize)]
pub struct SheetDetails {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    /// Set when `rows` is derived from the file size instead of counted
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub rows_estimated: bool,
}

/// Serves `excel://{file_path}`
pub struct ExcelResource {
    context: Arc<ToolContext>,
}

impl ExcelResource {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }

    /// Describe the workbook at `file_path`
    pub fn describe(context: &ToolContext, file_path: &str) -> DataResult<WorkbookDescription> {
        let file = context.locate(file_path)?;
        let config = context.workbook_config();
        let loader = context.loader_for(&file);
        let sheets = WorkbookFile::open(&file.path)?.sheet_names();

        // Above the estimate threshold rows are derived from the size on disk
        let estimated_rows = file.size.exceeds_mb(config.estimate_threshold_mb).then(|| {
            let total = file.size.bytes / config.assumed_row_bytes.max(1);
            (total / sheets.len().max(1) as u64) as usize
        });

        let mut sheet_details = BTreeMap::new();
        for sheet in &sheets {
            let peek = loader.peek_columns(&file.path, Some(sheet))?;
            let column_names: Vec<String> = peek
                .dataset
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            sheet_details.insert(
                sheet.clone(),
                SheetDetails {
                    rows: estimated_rows.unwrap_or(peek.total_rows),
                    columns: column_names.len(),
                    column_names,
                    rows_estimated: estimated_rows.is_some(),
                },
            );
        }

        let modified: DateTime<Local> = std::fs::metadata(&file.path)?.modified()?.into();
        debug!(
            sheets = sheets.len(),
            strategy = loader.name(),
            estimated = estimated_rows.is_some(),
            "Described {}",
            file.path.display()
        );

        Ok(WorkbookDescription {
            file_name: file.file_name(),
            sheets,
            file_size: format!("{:.2} KB", file.size.bytes as f64 / 1024.0),
            last_modified: modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            sheet_details,
        })
    }
}

#[async_trait]
impl ResourceProvider for ExcelResource {
    fn template(&self) -> McpResourceTemplate {
        McpResourceTemplate {
            uri_template: format!("{}{{file_path}}", SCHEME),
            name: "excel".to_string(),
            description: Some(
                "Sheets, size, modification time and per-sheet columns of a spreadsheet file"
                    .to_string(),
            ),
            mime_type: Some("application/json".to_string()),
        }
    }

    fn matches(&self, uri: &str) -> bool {
        uri.starts_with(SCHEME)
    }

    async fn read(&self, uri: &str) -> String {
        let file_path = uri.strip_prefix(SCHEME).unwrap_or(uri).to_string();
        let context = self.context.clone();

        let described = tokio::task::spawn_blocking(move || Self::describe(&context, &file_path)).await;
        let result = match described {
            Ok(Ok(description)) => serde_json::to_string_pretty(&description).map_err(|e| e.to_string()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(format!("worker task failed: {}", e)),
        };
        result.unwrap_or_else(|message| {
            warn!("Resource {} failed: {}", uri, message);
            format!("Error: {}", message)
        })
    }
}
