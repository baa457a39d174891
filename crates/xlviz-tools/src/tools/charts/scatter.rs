//! `create_scatter_plot`

use super::{
    aggregation_argument, aggregation_parameter, file_parameter, max_points_parameter, prepare,
    project, sheet_parameter, title_argument, title_parameter,
};
use crate::analysis::{Aggregation, sample_indices, stratified_indices};
use crate::error::DataResult;
use crate::render::{PointColors, ScatterPlot, render_scatter, to_data_uri};
use crate::tools::common::{
    DEFAULT_MAX_POINTS, ToolContext, max_points_argument, no_numeric, run_blocking, sheet_argument,
};
use crate::workbook::{CellValue, Column};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const DEFAULT_TITLE: &str = "Scatter Plot";

/// Scatter plot of two numeric columns, optionally coloured by a third
pub struct CreateScatterPlotTool {
    context: Arc<ToolContext>,
}

impl CreateScatterPlotTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for CreateScatterPlotTool {
    fn name(&self) -> &str {
        "create_scatter_plot"
    }

    fn description(&self) -> &str {
        "Draw a scatter plot of y_column against x_column, optionally coloured by color_column, and return it as a base64 PNG data URI. With a color column, points are sampled per category."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                file_parameter(),
                ToolParameter::string("x_column", "Numeric column for the x axis"),
                ToolParameter::string("y_column", "Numeric column for the y axis"),
                ToolParameter::optional_string(
                    "color_column",
                    "Column used to colour the points (numeric columns use a colour scale)",
                ),
                sheet_parameter(),
                title_parameter(DEFAULT_TITLE),
                aggregation_parameter(),
                max_points_parameter("max_points", DEFAULT_MAX_POINTS),
                ToolParameter::integer("seed", "Seed for per-category sampling").optional(),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let color_column = call.get_string("color_column");
        let aggregation = aggregation_argument(call)?;
        if aggregation.is_some() && color_column.is_some() {
            return Err(ToolError::InvalidArguments(
                "aggregation cannot be combined with color_column".to_string(),
            ));
        }
        let seed = match call.get_i64("seed") {
            Some(seed) => Some(u64::try_from(seed).map_err(|_| {
                ToolError::InvalidArguments("Parameter 'seed' must not be negative".to_string())
            })?),
            None => None,
        };

        let request = ScatterRequest {
            file_path: call.require_string("file_path")?,
            x_column: call.require_string("x_column")?,
            y_column: call.require_string("y_column")?,
            color_column,
            sheet: sheet_argument(call),
            title: title_argument(call, DEFAULT_TITLE),
            aggregation,
            max_points: max_points_argument(call, "max_points", DEFAULT_MAX_POINTS)?,
            seed,
        };
        info!(
            "Scatter plot of {} against {} from {}",
            request.y_column, request.x_column, request.file_path
        );

        let context = self.context.clone();
        let uri = run_blocking(move || request.render(&context)).await?;
        Ok(ToolResult::success(&call.id, self.name(), uri))
    }
}

struct ScatterRequest {
    file_path: String,
    x_column: String,
    y_column: String,
    color_column: Option<String>,
    sheet: Option<String>,
    title: String,
    aggregation: Option<Aggregation>,
    max_points: usize,
    seed: Option<u64>,
}

impl ScatterRequest {
    fn render(&self, context: &ToolContext) -> DataResult<String> {
        let file = context.locate(&self.file_path)?;
        let loader = context.loader_for(&file);
        let loaded = loader.load(&file.path, self.sheet.as_deref())?;
        let dataset = &loaded.dataset;

        let mut ys = vec![self.y_column.as_str()];
        if let Some(color) = &self.color_column {
            ys.push(color.as_str());
        }
        // Aggregated tables are already sampled
        let (table, sampled) = match self.aggregation {
            Some(agg) => {
                let prepared = prepare(
                    dataset,
                    &self.x_column,
                    &ys,
                    Some(agg),
                    self.max_points,
                    loader.columnar(),
                )?;
                (prepared.table, true)
            }
            None => {
                let names = std::iter::once(self.x_column.as_str()).chain(ys.iter().copied());
                dataset.require_columns(names)?;
                (project(dataset, &self.x_column, &ys)?, false)
            }
        };

        let columns = table.columns();
        let xs = columns[0].numbers();
        let ys = columns[1].numbers();
        if !xs.is_empty() && xs.iter().all(Option::is_none) {
            return Err(no_numeric(&self.x_column));
        }
        if !ys.is_empty() && ys.iter().all(Option::is_none) {
            return Err(no_numeric(&self.y_column));
        }

        let complete: Vec<usize> = (0..table.height())
            .filter(|&i| xs[i].is_some() && ys[i].is_some())
            .collect();
        let table = table.take_rows(&complete);

        let table = if sampled {
            table
        } else {
            let keep = match table.columns().get(2) {
                Some(color) => stratified_indices(&color.values, self.max_points, self.seed),
                None => sample_indices(table.height(), self.max_points),
            };
            table.take_rows(&keep)
        };
        debug!(points = table.height(), "Scatter points selected");

        let columns = table.columns();
        let points = columns[0]
            .finite_numbers()
            .into_iter()
            .zip(columns[1].finite_numbers())
            .collect();
        let colors = match (&self.color_column, columns.get(2)) {
            (Some(label), Some(column)) => Some(point_colors(label, column)),
            _ => None,
        };

        let plot = ScatterPlot {
            title: self.title.clone(),
            x_label: self.x_column.clone(),
            y_label: self.y_column.clone(),
            points,
            colors,
        };
        let png = render_scatter(&plot, context.chart_size())?;
        Ok(to_data_uri(&png))
    }
}

/// Colour scale for numeric columns, categories in first-seen order otherwise
fn point_colors(label: &str, column: &Column) -> PointColors {
    let has_numbers = column.values.iter().any(|v| matches!(v, CellValue::Number(_)));
    if column.is_numeric() && has_numbers {
        return PointColors::Continuous {
            label: label.to_string(),
            values: column.numbers(),
        };
    }

    let mut names = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let index = column
        .values
        .iter()
        .map(|value| {
            let key = value.to_string();
            *positions.entry(key.clone()).or_insert_with(|| {
                names.push(key);
                names.len() - 1
            })
        })
        .collect();
    PointColors::Categorical { index, names }
}
