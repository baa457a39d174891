//! `generate_dynamic_chart_vba`

use super::{compose, fill_template};
use async_trait::async_trait;
use tracing::debug;
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const INSTRUCTIONS: &str = include_str!("templates/dynamic_instructions.txt");
const MODULE: &str = include_str!("templates/dynamic_chart.bas");

/// Argument names with their defaults, in template order
const ARGUMENTS: [(&str, &str, &str); 4] = [
    ("source_sheet_name", "Data", "Sheet holding the source data"),
    ("chart_sheet_name", "Chart", "Sheet to create the chart on"),
    ("data_range", "A1:D10", "Source range in A1 notation"),
    ("chart_title", "Dynamic Chart", "Chart title"),
];

/// VBA that builds a refreshable chart from a range, plus export macros
#[derive(Debug, Default)]
pub struct GenerateDynamicChartVbaTool;

impl GenerateDynamicChartVbaTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for GenerateDynamicChartVbaTool {
    fn name(&self) -> &str {
        "generate_dynamic_chart_vba"
    }

    fn description(&self) -> &str {
        "Generate a VBA module that creates a chart from a data range, can refresh it and \
         exports it to PowerPoint or Word, with instructions for adding it to a workbook."
    }

    fn schema(&self) -> ToolSchema {
        let parameters = ARGUMENTS
            .iter()
            .map(|(name, default, description)| {
                ToolParameter::optional_string(*name, *description).with_default(*default)
            })
            .collect();
        ToolSchema::new(self.name(), self.description(), parameters)
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let values: Vec<(&str, String)> = ARGUMENTS
            .iter()
            .map(|(name, default, _)| {
                (*name, call.get_string(name).unwrap_or_else(|| default.to_string()))
            })
            .collect();
        let pairs: Vec<(&str, &str)> = values.iter().map(|(k, v)| (*k, v.as_str())).collect();
        debug!(arguments = ?pairs, "Generating dynamic chart VBA");

        let module = fill_template(MODULE, &pairs);
        Ok(ToolResult::success(&call.id, self.name(), compose(INSTRUCTIONS, module)))
    }
}
