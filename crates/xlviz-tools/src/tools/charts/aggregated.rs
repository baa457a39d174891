//! `create_aggregated_chart`

use super::{file_parameter, max_points_parameter, prepare_table, sheet_parameter};
use crate::analysis::Aggregation;
use crate::error::{DataError, DataResult};
use crate::render::{BarChart, LineAxis, LineChart, render_bar, render_line, to_data_uri};
use crate::tools::common::{ToolContext, max_points_argument, run_blocking, sheet_argument};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_LIMIT: usize = 20;

/// Shape of the aggregated chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregatedKind {
    Bar,
    Line,
}

impl AggregatedKind {
    const NAMES: &'static str = "bar, line";
}

impl FromStr for AggregatedKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Ok(AggregatedKind::Bar),
            "line" => Ok(AggregatedKind::Line),
            _ => Err(DataError::UnsupportedChart {
                name: s.to_string(),
                expected: Self::NAMES,
            }),
        }
    }
}

/// Group by a column, reduce another, and chart the result
pub struct CreateAggregatedChartTool {
    context: Arc<ToolContext>,
}

impl CreateAggregatedChartTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreateAggregatedChartTool {
    fn name(&self) -> &str {
        "create_aggregated_chart"
    }

    fn description(&self) -> &str {
        "Group rows by x_column, reduce y_column with the aggregation (sum by default) and draw the groups as a bar or line chart, returned as a base64 PNG data URI."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                file_parameter(),
                ToolParameter::string("x_column", "Column to group by"),
                ToolParameter::string("y_column", "Column to reduce per group"),
                ToolParameter::optional_string("aggregation", "Reduction per group")
                    .with_default("sum")
                    .with_enum(Aggregation::NAMES),
                ToolParameter::optional_string("chart_type", "Chart shape")
                    .with_default("bar")
                    .with_enum(["bar", "line"]),
                sheet_parameter(),
                ToolParameter::optional_string(
                    "title",
                    "Chart title (default: '<aggregation> of <y_column> by <x_column>')",
                ),
                max_points_parameter("limit", DEFAULT_LIMIT),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let x_column = call.require_string("x_column")?;
        let y_column = call.require_string("y_column")?;
        let aggregation = Aggregation::parse_optional(call.get_string("aggregation").as_deref())?
            .unwrap_or(Aggregation::Sum);
        let kind = match call.get_string("chart_type") {
            Some(name) => name.parse::<AggregatedKind>()?,
            None => AggregatedKind::Bar,
        };
        let title = call
            .get_string("title")
            .unwrap_or_else(|| format!("{} of {} by {}", aggregation, y_column, x_column));

        let request = AggregatedRequest {
            file_path: call.require_string("file_path")?,
            x_column,
            y_column,
            sheet: sheet_argument(call),
            title,
            aggregation,
            kind,
            limit: max_points_argument(call, "limit", DEFAULT_LIMIT)?,
        };
        info!(
            "Aggregated {:?} chart: {} of {} by {} from {}",
            request.kind, request.aggregation, request.y_column, request.x_column, request.file_path
        );

        let context = self.context.clone();
        let uri = run_blocking(move || request.render(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), uri))
    }
}

struct AggregatedRequest {
    file_path: String,
    x_column: String,
    y_column: String,
    sheet: Option<String>,
    title: String,
    aggregation: Aggregation,
    kind: AggregatedKind,
    limit: usize,
}

impl AggregatedRequest {
    fn render(&self, context: &ToolContext) -> DataResult<String> {
        let file = context.locate(&self.file_path)?;
        let prepared = prepare_table(
            context,
            &file,
            self.sheet.as_deref(),
            &self.x_column,
            &[self.y_column.as_str()],
            Some(self.aggregation),
            self.limit,
        )?;
        let values = prepared
            .y_columns()
            .first()
            .map(|c| c.numbers())
            .unwrap_or_default();

        let png = match self.kind {
            AggregatedKind::Bar => render_bar(
                &BarChart {
                    title: self.title.clone(),
                    x_label: self.x_column.clone(),
                    y_label: format!("{} of {}", self.aggregation, self.y_column),
                    categories: prepared.x_labels(),
                    values,
                },
                context.chart_size(),
            )?,
            AggregatedKind::Line => {
                let x = match prepared.x_numbers() {
                    Some(numbers) => LineAxis::Numeric(numbers),
                    None => LineAxis::Categories(prepared.x_labels()),
                };
                render_line(
                    &LineChart {
                        title: self.title.clone(),
                        x_label: self.x_column.clone(),
                        x,
                        series: vec![(self.y_column.clone(), values)],
                    },
                    context.chart_size(),
                )?
            }
        };
        Ok(to_data_uri(&png))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, numbers_fixture, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Line".parse::<AggregatedKind>().unwrap(), AggregatedKind::Line);
        let err = "pie".parse::<AggregatedKind>().unwrap_err();
        assert_eq!(err.to_string(), "chart type 'pie' (expected one of bar, line)");
    }

    #[tokio::test]
    async fn test_bar_and_line() {
        let dir = TempDir::new().unwrap();
        numbers_fixture(dir.path(), 40);
        let tool = CreateAggregatedChartTool::new(context(dir.path()));

        for chart_type in ["bar", "line"] {
            let output = run(
                &tool,
                json!({
                    "file_path": "numbers.xlsx",
                    "x_column": "value",
                    "y_column": "id",
                    "aggregation": "max",
                    "chart_type": chart_type,
                    "limit": 5
                }),
            )
            .await;
            assert!(output.starts_with("data:image/png;base64,"), "{}", chart_type);
        }
    }

    #[tokio::test]
    async fn test_rejects_unknown_chart_type() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreateAggregatedChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "x_column": "region", "y_column": "sales", "chart_type": "area"}),
        )
        .await;
        assert_eq!(
            output,
            "Error: Unsupported parameter: chart type 'area' (expected one of bar, line)"
        );
    }
}
