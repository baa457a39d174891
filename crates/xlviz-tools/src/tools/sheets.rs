//! `get_excel_sheets`: numbered sheet list

use super::common::{ToolContext, run_blocking};
use crate::workbook::WorkbookFile;
use async_trait::async_trait;
use std::sync::Arc;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Lists the sheets of a workbook
pub struct GetExcelSheetsTool {
    context: Arc<ToolContext>,
}

impl GetExcelSheetsTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for GetExcelSheetsTool {
    fn name(&self) -> &str {
        "get_excel_sheets"
    }

    fn description(&self) -> &str {
        "List the sheets of a spreadsheet file in workbook order."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("file_path", "Path of the spreadsheet file")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("file_path")?;
        let context = self.context.clone();

        let (name, sheets) = run_blocking(move || {
            let file = context.locate(&file_path)?;
            let sheets = WorkbookFile::open(&file.path)?.sheet_names();
            Ok((file.file_name(), sheets))
        })
        .await?;

        let mut output = format!("Sheets in '{}':\n\n", name);
        for (i, sheet) in sheets.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, sheet));
        }
        Ok(ToolResult::success(&call.id, self.name(), output).with_metadata("sheet_count", sheets.len()))
    }
}
