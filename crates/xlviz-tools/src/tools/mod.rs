//! Tool implementations
//!
//! Inspection tools return text, chart tools return PNG data URIs and
//! `create_excel_chart` writes back into the workbook.

mod charts;
pub mod common;
mod columns;
mod excel_chart;
mod query;
mod read_excel;
mod sheets;
mod summary;
mod vba;

#[cfg(test)]
mod test_support;

pub use charts::{
    CreateAggregatedChartTool, CreateBarChartTool, CreateLineChartTool, CreatePieChartTool,
    CreateScatterPlotTool,
};
pub use columns::GetColumnNamesTool;
pub use common::ToolContext;
pub use excel_chart::CreateExcelChartTool;
pub use query::ExcelQueryTool;
pub use read_excel::ReadExcelTool;
pub use sheets::GetExcelSheetsTool;
pub use summary::ExcelSummaryTool;
pub use vba::{GenerateChartExportVbaTool, GenerateDynamicChartVbaTool};
