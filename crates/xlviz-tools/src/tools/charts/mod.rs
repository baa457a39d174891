//! Chart tools
//!
//! Bar, line, scatter and aggregated charts come back as PNG data URIs;
//! the pie tool returns a text distribution.

mod aggregated;
mod bar;
mod line;
mod pie;
mod prepare;
mod scatter;

pub use aggregated::CreateAggregatedChartTool;
pub use bar::CreateBarChartTool;
pub use line::CreateLineChartTool;
pub use pie::CreatePieChartTool;
use prepare::{PreparedTable, prepare, project};
pub use scatter::CreateScatterPlotTool;

use crate::analysis::Aggregation;
use crate::error::DataResult;
use crate::tools::common::{LocatedFile, ToolContext};
use xlviz_core::tools::{ToolCall, ToolError, ToolParameter};

/// Load a sheet with the loader matching the file's size and prepare it
pub(crate) fn prepare_table(
    context: &ToolContext,
    file: &LocatedFile,
    sheet: Option<&str>,
    x: &str,
    ys: &[&str],
    aggregation: Option<Aggregation>,
    max_points: usize,
) -> DataResult<PreparedTable> {
    let loader = context.loader_for(file);
    let loaded = loader.load(&file.path, sheet)?;
    prepare(&loaded.dataset, x, ys, aggregation, max_points, loader.columnar())
}

/// `sheet_name`, `aggregation` and `max_points`
pub(crate) fn table_parameters(default_max_points: usize) -> Vec<ToolParameter> {
    vec![
        sheet_parameter(),
        aggregation_parameter(),
        max_points_parameter("max_points", default_max_points),
    ]
}

fn file_parameter() -> ToolParameter {
    ToolParameter::string("file_path", "Path of the spreadsheet file")
}

fn sheet_parameter() -> ToolParameter {
    ToolParameter::optional_string("sheet_name", "Sheet to read (default: first sheet)")
}

fn title_parameter(default: &str) -> ToolParameter {
    ToolParameter::optional_string("title", "Chart title").with_default(default)
}

fn aggregation_parameter() -> ToolParameter {
    ToolParameter::optional_string(
        "aggregation",
        "Group rows by the x column and reduce the y values (sum, mean, count, min, max)",
    )
    .with_enum(Aggregation::NAMES)
}

fn max_points_parameter(name: &str, default: usize) -> ToolParameter {
    ToolParameter::integer(name.to_string(), format!("Maximum points to plot (default: {})", default))
        .optional()
        .with_default(default)
}

fn aggregation_argument(call: &ToolCall) -> Result<Option<Aggregation>, ToolError> {
    Ok(Aggregation::parse_optional(call.get_string("aggregation").as_deref())?)
}

fn title_argument(call: &ToolCall, default: &str) -> String {
    call.get_string("title").unwrap_or_else(|| default.to_string())
}
