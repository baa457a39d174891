//! `create_pie_chart`
//!
//! Returns the distribution as text rather than an image.

use super::{file_parameter, sheet_parameter, title_argument, title_parameter};
use crate::analysis::{Aggregation, columnar, group_aggregate};
use crate::error::DataResult;
use crate::tools::common::{ToolContext, max_points_argument, run_blocking, sheet_argument};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_TITLE: &str = "Pie Chart";
const DEFAULT_MAX_SEGMENTS: usize = 10;
const OTHER_LABEL: &str = "Other";

/// Share of each label in the total of a value column
pub struct CreatePieChartTool {
    context: Arc<ToolContext>,
}

impl CreatePieChartTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreatePieChartTool {
    fn name(&self) -> &str {
        "create_pie_chart"
    }

    fn description(&self) -> &str {
        "Describe a pie chart: values_column reduced per label (sum by default), largest first, with each segment's percentage of the total. Segments beyond max_segments are merged into 'Other'."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                file_parameter(),
                ToolParameter::string("labels_column", "Column holding the segment labels"),
                ToolParameter::string("values_column", "Column holding the segment values"),
                sheet_parameter(),
                title_parameter(DEFAULT_TITLE),
                ToolParameter::optional_string("aggregation", "Reduction per label")
                    .with_default("sum")
                    .with_enum(Aggregation::NAMES),
                ToolParameter::integer(
                    "max_segments",
                    "Largest segments to list before merging the rest into 'Other'",
                )
                .optional()
                .with_default(DEFAULT_MAX_SEGMENTS),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let request = PieRequest {
            file_path: call.require_string("file_path")?,
            labels_column: call.require_string("labels_column")?,
            values_column: call.require_string("values_column")?,
            sheet: sheet_argument(call),
            title: title_argument(call, DEFAULT_TITLE),
            aggregation: Aggregation::parse_optional(call.get_string("aggregation").as_deref())?
                .unwrap_or(Aggregation::Sum),
            max_segments: max_points_argument(call, "max_segments", DEFAULT_MAX_SEGMENTS)?,
        };
        info!(
            "Pie chart of {} by {} from {}",
            request.values_column, request.labels_column, request.file_path
        );

        let context = self.context.clone();
        let (text, segments) = run_blocking(move || request.describe(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), text).with_metadata("segments", segments))
    }
}

struct PieRequest {
    file_path: String,
    labels_column: String,
    values_column: String,
    sheet: Option<String>,
    title: String,
    aggregation: Aggregation,
    max_segments: usize,
}

impl PieRequest {
    fn describe(&self, context: &ToolContext) -> DataResult<(String, usize)> {
        let file = context.locate(&self.file_path)?;
        let loader = context.loader_for(&file);
        let loaded = loader.load(&file.path, self.sheet.as_deref())?;

        let values = [self.values_column.as_str()];
        let grouped = if loader.columnar() {
            columnar::group_aggregate(&loaded.dataset, &self.labels_column, &values, self.aggregation)?
        } else {
            group_aggregate(&loaded.dataset, &self.labels_column, &values, self.aggregation)?
        };

        let columns = grouped.columns();
        let segments: Vec<(String, f64)> = columns[0]
            .values
            .iter()
            .zip(columns[1].numbers())
            .filter_map(|(label, value)| Some((label.to_string(), value?)))
            .collect();
        let segments = merge_segments(segments, self.max_segments);

        let mut text = format!(
            "Pie chart: {}\n\nDistribution of {} by {}:\n",
            self.title, self.values_column, self.labels_column
        );
        let total: f64 = segments.iter().map(|(_, v)| v).sum();
        for (label, value) in &segments {
            let share = if total == 0.0 { 0.0 } else { value / total * 100.0 };
            let _ = writeln!(text, "- {}: {} ({:.1}%)", label, thousands(*value), share);
        }
        Ok((text, segments.len()))
    }
}

/// Largest first, keeping `max_segments` and summing the rest into `Other`
fn merge_segments(mut segments: Vec<(String, f64)>, max_segments: usize) -> Vec<(String, f64)> {
    segments.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    if segments.len() > max_segments {
        let rest: f64 = segments.drain(max_segments..).map(|(_, v)| v).sum();
        segments.push((OTHER_LABEL.to_string(), rest));
    }
    segments
}

/// Two decimals with comma-grouped thousands
fn thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{}.{}", if negative { "-" } else { "" }, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{context, large_context, run, sales_fixture};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0.0), "0.00");
        assert_eq!(thousands(999.999), "1,000.00");
        assert_eq!(thousands(1234567.891), "1,234,567.89");
        assert_eq!(thousands(-4321.5), "-4,321.50");
        assert_eq!(thousands(-0.001), "0.00");
    }

    #[test]
    fn test_merge_segments() {
        let segments = vec![
            ("a".to_string(), 1.0),
            ("b".to_string(), 5.0),
            ("c".to_string(), 3.0),
            ("d".to_string(), 2.0),
        ];
        let merged = merge_segments(segments, 2);
        assert_eq!(
            merged,
            vec![
                ("b".to_string(), 5.0),
                ("c".to_string(), 3.0),
                ("Other".to_string(), 3.0),
            ]
        );
    }

    #[tokio::test]
    async fn test_distribution_text() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());

        for ctx in [context(dir.path()), large_context(dir.path())] {
            let tool = CreatePieChartTool::new(ctx);
            let output = run(
                &tool,
                json!({"file_path": "sales.xlsx", "labels_column": "region", "values_column": "sales"}),
            )
            .await;
            assert_eq!(
                output,
                "Pie chart: Pie Chart\n\nDistribution of sales by region:\n- A: 30.00 (50.0%)\n- B: 30.00 (50.0%)\n"
            );
        }
    }

    #[tokio::test]
    async fn test_count_and_missing_column() {
        let dir = TempDir::new().unwrap();
        sales_fixture(dir.path());
        let tool = CreatePieChartTool::new(context(dir.path()));

        let output = run(
            &tool,
            json!({
                "file_path": "sales.xlsx",
                "labels_column": "region",
                "values_column": "sales",
                "aggregation": "count",
                "title": "Orders"
            }),
        )
        .await;
        assert!(output.starts_with("Pie chart: Orders\n"));
        assert!(output.contains("- A: 2.00 (66.7%)\n- B: 1.00 (33.3%)\n"));

        let output = run(
            &tool,
            json!({"file_path": "sales.xlsx", "labels_column": "segment", "values_column": "sales"}),
        )
        .await;
        assert_eq!(output, "Error: Column 'segment' does not exist in the file.");
    }
}
