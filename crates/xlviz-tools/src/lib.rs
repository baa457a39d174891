//! Spreadsheet tools for xlviz
//!
//! Each tool resolves a workbook path, loads a sheet with the strategy that
//! fits the file's size, runs a query, statistic or chart over the data and
//! returns text or a PNG data URI. The `excel://` resource describes a whole
//! workbook as JSON.

pub mod analysis;
pub mod error;
pub mod render;
pub mod resource;
pub mod tools;
pub mod workbook;

pub use error::{DataError, DataResult};
pub use resource::ExcelResource;
pub use tools::{
    CreateAggregatedChartTool, CreateBarChartTool, CreateExcelChartTool, CreateLineChartTool,
    CreatePieChartTool, CreateScatterPlotTool, ExcelQueryTool, ExcelSummaryTool,
    GenerateChartExportVbaTool, GenerateDynamicChartVbaTool, GetColumnNamesTool,
    GetExcelSheetsTool, ReadExcelTool, ToolContext,
};

use std::sync::Arc;
use xlviz_core::Config;
use xlviz_core::mcp::ResourceProvider;
use xlviz_core::tools::{Tool, ToolRegistry};

/// Get all default tools, sharing one context built from `config`
pub fn get_default_tools(config: &Config) -> Vec<Arc<dyn Tool>> {
    let context = Arc::new(ToolContext::new(config));
    vec![
        Arc::new(ReadExcelTool::new(context.clone())),
        Arc::new(GetExcelSheetsTool::new(context.clone())),
        Arc::new(ExcelSummaryTool::new(context.clone())),
        Arc::new(ExcelQueryTool::new(context.clone())),
        Arc::new(CreateBarChartTool::new(context.clone())),
        Arc::new(CreateLineChartTool::new(context.clone())),
        Arc::new(CreateScatterPlotTool::new(context.clone())),
        Arc::new(CreatePieChartTool::new(context.clone())),
        Arc::new(CreateAggregatedChartTool::new(context.clone())),
        Arc::new(CreateExcelChartTool::new(context.clone())),
        Arc::new(GetColumnNamesTool::new(context)),
        Arc::new(GenerateChartExportVbaTool::new()),
        Arc::new(GenerateDynamicChartVbaTool::new()),
    ]
}

/// Registry holding every default tool
pub fn default_registry(config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_all(get_default_tools(config));
    registry
}

/// Resource providers served next to the tools
pub fn get_resource_providers(config: &Config) -> Vec<Arc<dyn ResourceProvider>> {
    let context = Arc::new(ToolContext::new(config));
    vec![Arc::new(ExcelResource::new(context))]
}
