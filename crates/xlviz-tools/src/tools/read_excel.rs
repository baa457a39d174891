//! `read_excel`: sheet contents as a text table

use super::common::{ToolContext, run_blocking, sheet_argument, sheet_header, truncation_notice};
use crate::error::DataResult;
use crate::render::TextTable;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Reads a sheet and renders every cell
pub struct ReadExcelTool {
    context: Arc<ToolContext>,
}

impl ReadExcelTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for ReadExcelTool {
    fn name(&self) -> &str {
        "read_excel"
    }

    fn description(&self) -> &str {
        "Read a sheet of a spreadsheet file and return its contents as a text table. \
         Relative paths are resolved against the default directory. For files above \
         the size threshold only the first rows are shown, with the true row count."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("file_path", "Path of the spreadsheet file"),
                ToolParameter::optional_string("sheet_name", "Sheet to read (default: first sheet)"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("file_path")?;
        let sheet = sheet_argument(call);
        info!("Reading {}", file_path);

        let context = self.context.clone();
        let output =
            run_blocking(move || read_sheet(&context, &file_path, sheet.as_deref())).await?;
        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}

fn read_sheet(context: &ToolContext, file_path: &str, sheet: Option<&str>) -> DataResult<String> {
    let file = context.locate(file_path)?;
    let loaded = context.loader_for(&file).preview(&file.path, sheet)?;

    let mut output = sheet_header(
        &file.file_name(),
        sheet,
        loaded.total_rows,
        loaded.dataset.width(),
    );
    output.push('\n');
    output.push_str(&TextTable::from_dataset(&loaded.dataset).render());
    if loaded.is_truncated() {
        output.push_str("\n\n");
        output.push_str(&truncation_notice(loaded.dataset.height(), loaded.total_rows));
    }
    Ok(output)
}
