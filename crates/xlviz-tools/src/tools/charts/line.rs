//! `create_line_chart`

use super::{
    aggregation_argument, file_parameter, prepare_table, table_parameters, title_argument,
    title_parameter,
};
use crate::analysis::Aggregation;
use crate::error::DataResult;
use crate::render::{LineAxis, LineChart, render_line, to_data_uri};
use crate::tools::common::{
    DEFAULT_MAX_POINTS, ToolContext, max_points_argument, no_numeric, run_blocking, sheet_argument,
    split_columns,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_TITLE: &str = "Line Chart";

/// Line chart with one series per y column
pub struct CreateLineChartTool {
    context: Arc<ToolContext>,
}

impl CreateLineChartTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreateLineChartTool {
    fn name(&self) -> &str {
        "create_line_chart"
    }

    fn description(&self) -> &str {
        "Draw a line chart with one series per column in y_columns (comma-separated) and return it as a base64 PNG data URI."
    }

    fn schema(&self) -> ToolSchema {
        let mut parameters = vec![
            file_parameter(),
            ToolParameter::string("x_column", "Column for the x axis"),
            ToolParameter::string("y_columns", "Comma-separated columns to plot as series"),
            title_parameter(DEFAULT_TITLE),
        ];
        parameters.extend(table_parameters(DEFAULT_MAX_POINTS));
        ToolSchema::new(self.name(), self.description(), parameters)
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let y_columns = split_columns(&call.require_string("y_columns")?);
        if y_columns.is_empty() {
            return Err(ToolError::InvalidArguments(
                "y_columns must name at least one column".to_string(),
            ));
        }
        let request = LineRequest {
            file_path: call.require_string("file_path")?,
            x_column: call.require_string("x_column")?,
            y_columns,
            sheet: sheet_argument(call),
            title: title_argument(call, DEFAULT_TITLE),
            aggregation: aggregation_argument(call)?,
            max_points: max_points_argument(call, "max_points", DEFAULT_MAX_POINTS)?,
        };
        info!(
            "Line chart of {} by {} from {}",
            request.y_columns.join(", "),
            request.x_column,
            request.file_path
        );

        let context = self.context.clone();
        let uri = run_blocking(move || request.render(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), uri))
    }
}

struct LineRequest {
    file_path: String,
    x_column: String,
    y_columns: Vec<String>,
    sheet: Option<String>,
    title: String,
    aggregation: Option<Aggregation>,
    max_points: usize,
}

impl LineRequest {
    fn render(&self, context: &ToolContext) -> DataResult<String> {
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

        // Series keep the requested names even when deduped in the table
        let mut series = Vec::with_capacity(ys.len());
        for (name, column) in ys.iter().zip(prepared.y_columns()) {
            let values = column.numbers();
            if !values.is_empty() && values.iter().all(Option::is_none) {
                return Err(no_numeric(name));
            }
            series.push((name.to_string(), values));
        }

        let x = match prepared.x_numbers() {
            Some(numbers) => LineAxis::Numeric(numbers),
            None => LineAxis::Categories(prepared.x_labels()),
        };
        let chart = LineChart {
            title: self.title.clone(),
            x_label: self.x_column.clone(),
            x,
            series,
        };
        let png = render_line(&chart, context.chart_size())?;
        Ok(to_data_uri(&png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, large_context, numbers_fixture, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_multiple_series() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateLineChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_columns": "sales, units"}),
        )
        .await;
        assert!(output.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_each_y_column_is_checked() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateLineChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_columns": "sales,margin"}),
        )
        .await;
        assert_eq!(output, "Error: Column 'margin' does not exist in the file.");

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_columns": " , "}),
        )
        .await;
        assert!(output.starts_with("Error: Invalid arguments: y_columns"));
    }

    #[tokio::test]
    async fn test_large_file_aggregates_on_polars() {
        let dir = TempDir::new().unwrap();
        numbers_fixture(dir.path(), 50);
        let tool = CreateLineChartTool::new(large_context(dir.path()));

        let output = run(
            &tool,
            json!({
                "file_path": "numbers.xlsx",
                "x_column": "group",
                "y_columns": "value",
                "aggregation": "mean",
                "max_points": 10
            }),
        )
        .await;
        assert!(output.starts_with("data:image/png;base64,"));
    }
}
