//! `excel_summary`: describe-style statistics
//!
//! Large files are summarised on the columnar engine.

use super::common::{ToolContext, run_blocking, sheet_argument, sheet_header};
use crate::analysis::{columnar, describe};
use crate::error::DataResult;
use crate::render::TextTable;
use async_trait::async_trait;
use std::sync::Arc;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Summary statistics for every column of a sheet
pub struct ExcelSummaryTool {
    context: Arc<ToolContext>,
}

impl ExcelSummaryTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for ExcelSummaryTool {
    fn name(&self) -> &str {
        "excel_summary"
    }

    fn description(&self) -> &str {
        "Summarise a sheet: count, unique, top and freq for text columns; mean, std, \
         min, quartiles and max for numeric columns. Statistics that do not apply show N/A."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("file_path", "Path of the spreadsheet file"),
                ToolParameter::optional_string("sheet_name", "Sheet to summarise (default: first sheet)"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("file_path")?;
        let sheet = sheet_argument(call);
        let context = self.context.clone();

        let output = run_blocking(move || summarise(&context, &file_path, sheet.as_deref())).await?;
        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}

fn summarise(context: &ToolContext, file_path: &str, sheet: Option<&str>) -> DataResult<String> {
    let (file, loaded) = context.load(file_path, sheet)?;
    let dataset = &loaded.dataset;
    let summary = if context.loader_for(&file).columnar() {
        columnar::describe(dataset)?
    } else {
        describe(dataset)
    };

    let mut table = TextTable::new(summary.columns.clone())
        .with_row_labels(summary.rows.iter().map(|(name, _)| name.clone()).collect());
    for (_, values) in &summary.rows {
        table.push_row(
            values
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| "N/A".to_string()))
                .collect(),
        );
    }

    let mut output = sheet_header(&file.file_name(), sheet, dataset.height(), dataset.width());
    output.push_str(&format!("Columns: {}\n\n", dataset.column_names().join(", ")));
    output.push_str(&table.render());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, large_context, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_summary_of_mixed_sheet() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = ExcelSummaryTool::new(context(dir.path()));

        let output = run(&tool, json!({"file_path": "sales.xlsx"})).await;
        assert!(output.contains("Columns: region, sales, units\n\n"));
        let lines: Vec<&str> = output.lines().collect();
        let mean = lines.iter().find(|l| l.starts_with("mean")).unwrap();
        assert!(mean.contains("N/A"));
        assert!(mean.contains("20.000000"));
        let top = lines.iter().find(|l| l.starts_with("top")).unwrap();
        assert!(top.contains('A'));
    }

    #[tokio::test]
    async fn test_large_path_matches_standard_summary() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let standard = ExcelSummaryTool::new(context(dir.path()));
        let large = ExcelSummaryTool::new(large_context(dir.path()));

        let args = json!({"file_path": "sales.xlsx"});
        assert_eq!(run(&standard, args.clone()).await, run(&large, args).await);
    }
}
