//! `create_bar_chart`

use super::{
    aggregation_argument, file_parameter, prepare_table, table_parameters, title_argument,
    title_parameter,
};
use crate::analysis::Aggregation;
use crate::error::DataResult;
use crate::render::{BarChart, render_bar, to_data_uri};
use crate::tools::common::{
    DEFAULT_MAX_POINTS, ToolContext, max_points_argument, no_numeric, run_blocking, sheet_argument,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_TITLE: &str = "Bar Chart";

/// Bar chart of one value column against a category column
pub struct CreateBarChartTool {
    context: Arc<ToolContext>,
}

impl CreateBarChartTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreateBarChartTool {
    fn name(&self) -> &str {
        "create_bar_chart"
    }

    fn description(&self) -> &str {
        "Draw a bar chart of y_column against x_column and return it as a base64 PNG data URI."
    }

    fn schema(&self) -> ToolSchema {
        let mut parameters = vec![
            file_parameter(),
            ToolParameter::string("x_column", "Column holding the bar categories"),
            ToolParameter::string("y_column", "Column holding the bar heights"),
            title_parameter(DEFAULT_TITLE),
        ];
        parameters.extend(table_parameters(DEFAULT_MAX_POINTS));
        ToolSchema::new(self.name(), self.description(), parameters)
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let request = BarRequest {
            file_path: call.require_string("file_path")?,
            x_column: call.require_string("x_column")?,
            y_column: call.require_string("y_column")?,
            sheet: sheet_argument(call),
            title: title_argument(call, DEFAULT_TITLE),
            aggregation: aggregation_argument(call)?,
            max_points: max_points_argument(call, "max_points", DEFAULT_MAX_POINTS)?,
        };
        info!("Bar chart of {} by {} from {}", request.y_column, request.x_column, request.file_path);

        let context = self.context.clone();
        let uri = run_blocking(move || request.render(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), uri))
    }
}

struct BarRequest {
    file_path: String,
    x_column: String,
    y_column: String,
    sheet: Option<String>,
    title: String,
    aggregation: Option<Aggregation>,
    max_points: usize,
}

impl BarRequest {
    fn render(&self, context: &ToolContext) -> DataResult<String> {
        let file = context.locate(&self.file_path)?;
        let prepared = prepare_table(
            context,
            &file,
            self.sheet.as_deref(),
            &self.x_column,
            &[self.y_column.as_str()],
            self.aggregation,
            self.max_points,
        )?;
        let values = prepared
            .y_columns()
            .first()
            .map(|c| c.numbers())
            .unwrap_or_default();
        if !values.is_empty() && values.iter().all(Option::is_none) {
            return Err(no_numeric(&self.y_column));
        }

        let chart = BarChart {
            title: self.title.clone(),
            x_label: self.x_column.clone(),
            y_label: self.y_column.clone(),
            categories: prepared.x_labels(),
            values,
        };
        let png = render_bar(&chart, context.chart_size())?;
        Ok(to_data_uri(&png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_returns_png_data_uri() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateBarChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_column": "sales", "aggregation": "sum"}),
        )
        .await;
        assert!(output.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[tokio::test]
    async fn test_missing_column_is_named() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateBarChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_column": "profit"}),
        )
        .await;
        assert_eq!(output, "Error: Column 'profit' does not exist in the file.");
    }

    #[tokio::test]
    async fn test_rejects_unknown_aggregation_and_text_values() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateBarChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_column": "sales", "aggregation": "median"}),
        )
        .await;
        assert!(output.starts_with("Error: Unsupported parameter: aggregation 'median'"));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "sales", "y_column": "region"}),
        )
        .await;
        assert_eq!(output, "Error: Invalid arguments: Column 'region' contains no numeric values.");
    }
}
