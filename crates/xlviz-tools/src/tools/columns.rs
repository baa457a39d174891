//! `get_column_names`: numbered column list

use super::common::{ToolContext, run_blocking, sheet_argument};
use async_trait::async_trait;
use std::sync::Arc;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Lists the header row of a sheet
pub struct GetColumnNamesTool {
    context: Arc<ToolContext>,
}

impl GetColumnNamesTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetColumnNamesTool {
    fn name(&self) -> &str {
        "get_column_names"
    }

    fn description(&self) -> &str {
        "List the column names of a sheet. Large files are read from their first rows only."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("file_path", "Path of the spreadsheet file"),
                ToolParameter::optional_string("sheet_name", "Sheet to inspect (default: first sheet)"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("file_path")?;
        let sheet = sheet_argument(call);
        let context = self.context.clone();

        let requested = sheet.clone();
        let (name, columns) = run_blocking(move || {
            let file = context.locate(&file_path)?;
            let peek = context
                .loader_for(&file)
                .peek_columns(&file.path, requested.as_deref())?;
            let columns: Vec<String> = peek
                .dataset
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();
            Ok((file.file_name(), columns))
        })
        .await?;

        let mut output = format!("Columns in '{}'", name);
        if let Some(sheet) = &sheet {
            output.push_str(&format!(" (sheet '{}')", sheet));
        }
        output.push_str(":\n\n");
        for (i, column) in columns.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, column));
        }
        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, large_context, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_columns() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = GetColumnNamesTool::new(context(dir.path()));

        let output = run(&tool, json!({"file_path": "sales.xlsx"})).await;
        assert_eq!(output, "Columns in 'sales.xlsx':\n\n1. region\n2. sales\n3. units\n");
    }

    #[tokio::test]
    async fn test_names_sheet_and_uses_peek_for_large_files() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = GetColumnNamesTool::new(large_context(dir.path()));

        let output = run(&tool, json!({"file_path": "sales.xlsx", "sheet_name": "Notes"})).await;
        assert_eq!(output, "Columns in 'sales.xlsx' (sheet 'Notes'):\n\n1. note\n");
    }
}
