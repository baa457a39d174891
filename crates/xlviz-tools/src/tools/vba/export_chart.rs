//! `generate_chart_export_vba`

use super::{compose, fill_template};
use async_trait::async_trait;
use tracing::debug;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const INSTRUCTIONS: &str = include_str!("templates/export_instructions.txt");
const MODULE: &str = include_str!("templates/export_chart.bas");

const DEFAULT_SHEET: &str = "Chart1";
const DEFAULT_TITLE: &str = "My Chart";

/// VBA that copies an existing chart into PowerPoint or Word
#[derive(Debug, Default)]
pub struct GenerateChartExportVbaTool;

impl GenerateChartExportVbaTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for GenerateChartExportVbaTool {
    fn name(&self) -> &str {
        "generate_chart_export_vba"
    }

    fn description(&self) -> &str {
        "Generate a VBA module that exports a chart from an Excel sheet to PowerPoint or Word, \
         with instructions for adding it to a workbook."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::optional_string("chart_sheet_name", "Sheet that holds the chart")
                    .with_default(DEFAULT_SHEET),
                ToolParameter::optional_string("chart_title", "Title used on the slide or document")
                    .with_default(DEFAULT_TITLE),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let sheet = call
            .get_string("chart_sheet_name")
            .unwrap_or_else(|| DEFAULT_SHEET.to_string());
        let title = call
            .get_string("chart_title")
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        debug!(sheet = %sheet, "Generating chart export VBA");

        let module = fill_template(MODULE, &[("chart_sheet_name", &sheet), ("chart_title", &title)]);
        Ok(ToolResult::success(&call.id, self.name(), compose(INSTRUCTIONS, module)))
    }
}
