//! `create_excel_chart`: embed a native chart in the workbook itself

use super::charts::{prepare_table, table_parameters};
use super::common::{ToolContext, max_points_argument, run_blocking, sheet_argument, split_columns};
use crate::analysis::Aggregation;
use crate::error::DataResult;
use crate::workbook::{ChartSheet, NativeChartKind, write_chart_sheet};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_TARGET_SHEET: &str = "Chart";
const DEFAULT_MAX_POINTS: usize = 1000;

/// Writes the chart table and a native chart into a sheet of the source workbook
pub struct CreateExcelChartTool {
    context: Arc<ToolContext>,
}

impl CreateExcelChartTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreateExcelChartTool {
    fn name(&self) -> &str {
        "create_excel_chart"
    }

    fn description(&self) -> &str {
        "Write x_column and y_columns (optionally aggregated and sampled) into target_sheet of the \
         same .xlsx file together with a native chart, replacing a sheet of that name or appending \
         a new one. Other sheets keep their cell values but lose formatting and formulas."
    }

    fn schema(&self) -> ToolSchema {
        let mut parameters = vec![
            ToolParameter::string("file_path", "Path of the .xlsx file to update"),
            ToolParameter::string("x_column", "Column holding the categories or x values"),
            ToolParameter::string("y_columns", "Comma-separated columns to chart as series"),
            ToolParameter::optional_string("chart_type", "Native chart type")
                .with_default("column")
                .with_enum(["column", "bar", "line", "pie", "scatter"]),
            ToolParameter::optional_string("target_sheet", "Sheet to write the chart into")
                .with_default(DEFAULT_TARGET_SHEET),
            ToolParameter::optional_string("title", "Chart title (default: '<y_columns> by <x_column>')"),
        ];
        parameters.extend(table_parameters(DEFAULT_MAX_POINTS));
        ToolSchema::new(self.name(), self.description(), parameters)
    }

    fn is_read_only(&self) -> bool {
        false
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let x_column = call.require_string("x_column")?;
        let y_columns = split_columns(&call.require_string("y_columns")?);
        if y_columns.is_empty() {
            return Err(ToolError::InvalidArguments(
                "y_columns must name at least one column".to_string(),
            ));
        }
        let kind = match call.get_string("chart_type") {
            Some(name) => name.parse::<NativeChartKind>()?,
            None => NativeChartKind::Column,
        };
        let title = call
            .get_string("title")
            .unwrap_or_else(|| format!("{} by {}", y_columns.join(", "), x_column));

        let request = ExcelChartRequest {
            file_path: call.require_string("file_path")?,
            x_column,
            y_columns,
            sheet: sheet_argument(call),
            target_sheet: call
                .get_string("target_sheet")
                .unwrap_or_else(|| DEFAULT_TARGET_SHEET.to_string()),
            title,
            kind,
            aggregation: Aggregation::parse_optional(call.get_string("aggregation").as_deref())?,
            max_points: max_points_argument(call, "max_points", DEFAULT_MAX_POINTS)?,
        };
        info!(
            "Embedding {:?} chart in sheet '{}' of {}",
            request.kind, request.target_sheet, request.file_path
        );

        let context = self.context.clone();
        let summary = run_blocking(move || request.write(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), summary.text)
            .with_metadata("sheet_position", summary.position)
            .with_metadata("replaced", summary.replaced))
    }
}

struct ExcelChartRequest {
    file_path: String,
    x_column: String,
    y_columns: Vec<String>,
    sheet: Option<String>,
    target_sheet: String,
    title: String,
    kind: NativeChartKind,
    aggregation: Option<Aggregation>,
    max_points: usize,
}

struct WriteSummary {
    text: String,
    position: usize,
    replaced: bool,
}

impl ExcelChartRequest {
    fn write(&self, context: &ToolContext) -> DataResult<WriteSummary> {
        let file = context.locate(&self.file_path)?;
        let ys: Vec<&str> = self.y_columns.iter().map(String::as_str).collect();
        let prepared = prepare_table(
            context,
            &file,
            self.sheet.as_deref(),
            &self.x_column,
            &ys,
            self.aggregation,
            self.max_points,
        )?;

        let written = write_chart_sheet(
            &file.path,
            &ChartSheet {
                sheet_name: &self.target_sheet,
                title: &self.title,
                kind: self.kind,
                table: &prepared.table,
            },
        )?;

        let mut text = format!(
            "Chart '{}' written to sheet '{}' of '{}' ({}, position {}).\nRows plotted: {}",
            self.title,
            self.target_sheet,
            file.file_name(),
            if written.replaced { "replaced existing sheet" } else { "new sheet" },
            written.position + 1,
            prepared.table.height(),
        );
        if prepared.is_sampled() {
            text.push_str(&format!(
                "\n[Sampled {} of {} rows]",
                prepared.table.height(),
                prepared.rows_before_sampling
            ));
        }
        text.push('\n');

        Ok(WriteSummary {
            text,
            position: written.position,
            replaced: written.replaced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::GetExcelSheetsTool;
    use crate::tools::test_support::{context, run, sales_fixture};
    use crate::workbook::WorkbookFile;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_second_run_replaces_the_sheet() {
        let dir = TempDir::new().unwrap();
        let path = sales_fixture(dir.path());
        let ctx = context(dir.path());
        let tool = CreateExcelChartTool::new(ctx.clone());
        let args = json!({
            "file_path": "sales.xlsx",
            "x_column": "region",
            "y_columns": "sales",
            "aggregation": "sum"
        });

        let first = run(&tool, args.clone()).await;
        assert!(first.contains("written to sheet 'Chart' of 'sales.xlsx' (new sheet, position 3)"));
        let second = run(&tool, args).await;
        assert!(second.contains("(replaced existing sheet, position 3)"));

        let sheets = run(&GetExcelSheetsTool::new(ctx), json!({"file_path": "sales.xlsx"})).await;
        assert_eq!(sheets, "Sheets in 'sales.xlsx':\n\n1. Sales\n2. Notes\n3. Chart\n");

        let mut workbook = WorkbookFile::open(&path).unwrap();
        let chart = workbook.read_sheet(Some("Chart"), None).unwrap();
        assert_eq!(chart.dataset.column_names(), vec!["region", "sales"]);
        assert_eq!(chart.total_rows, 2);
        let sales = workbook.read_sheet(Some("Sales"), None).unwrap();
        assert_eq!(sales.total_rows, 3);
    }

    #[tokio::test]
    async fn test_tool_is_not_read_only() {
        let dir = TempDir::new().unwrap();
        let tool = CreateExcelChartTool::new(context(dir.path()));
        assert!(!tool.is_read_only());
    }

    #[tokio::test]
    async fn test_errors() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateExcelChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_columns": "sales", "chart_type": "radar"}),
        )
        .await;
        assert!(output.starts_with("Error: Unsupported parameter: chart type 'radar'"));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_columns": "cost"}),
        )
        .await;
        assert_eq!(output, "Error: Column 'cost' does not exist in the file.");
    }
}
