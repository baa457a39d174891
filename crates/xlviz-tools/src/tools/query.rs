//! `excel_query`: filter rows with a boolean expression
//!
//! Standard files are filtered by the expression evaluator. On the large
//! path a single `column operator value` comparison is pushed down to the
//! columnar engine; anything it cannot run falls back to the evaluator.

use super::common::{ToolContext, run_blocking, sheet_argument};
use crate::analysis::columnar;
use crate::analysis::filter::{query_rows, translate_simple};
use crate::error::DataResult;
use crate::render::TextTable;
use crate::workbook::Dataset;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use xlviz_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

/// Runs a filter expression against a sheet
pub struct ExcelQueryTool {
    context: Arc<ToolContext>,
}

impl ExcelQueryTool {
    pub fn new(context: Arc<ToolContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Tool for ExcelQueryTool {
    fn name(&self) -> &str {
        "excel_query"
    }

    fn description(&self) -> &str {
        "Filter the rows of a sheet with an expression such as `sales > 100 and region == \"North\"`. \
         Supports == != > < >= <=, and/or/not (also & | ~), parentheses, numbers, quoted strings, \
         True/False and back-quoted column names."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("file_path", "Path of the spreadsheet file"),
                ToolParameter::string("query", "Filter expression, e.g. \"sales > 100\""),
                ToolParameter::optional_string("sheet_name", "Sheet to query (default: first sheet)"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let file_path = call.require_string("file_path")?;
        let query = call.require_string("query")?;
        let sheet = sheet_argument(call);
        info!("Querying {} with '{}'", file_path, query);

        let context = self.context.clone();
        let output =
            run_blocking(move || run_query(&context, &file_path, &query, sheet.as_deref())).await?;
        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}

fn run_query(
    context: &ToolContext,
    file_path: &str,
    query: &str,
    sheet: Option<&str>,
) -> DataResult<String> {
    let file = context.locate(file_path)?;
    let loader = context.loader_for(&file);
    let loaded = loader.load(&file.path, sheet)?;
    let dataset = &loaded.dataset;

    let rows = if loader.columnar() {
        filter_columnar(dataset, query)?
    } else {
        query_rows(dataset, query)?
    };

    let mut output = format!(
        "Query result '{}':\nFound {} rows out of {} total\n\n",
        query,
        rows.len(),
        dataset.height()
    );
    if rows.is_empty() {
        output.push_str("No results found.");
        return Ok(output);
    }

    let limit = context.workbook_config().preview_row_limit;
    let shown = rows.len().min(limit);
    output.push_str(&TextTable::from_dataset(&dataset.take_rows(&rows[..shown])).render());
    if shown < rows.len() {
        output.push_str(&format!(
            "\n\n[Showing the first {} of {} matching rows]",
            shown,
            rows.len()
        ));
    }
    Ok(output)
}

fn filter_columnar(dataset: &Dataset, query: &str) -> DataResult<Vec<usize>> {
    let Some(comparison) = translate_simple(query) else {
        debug!("Query is not a single comparison, using the expression evaluator");
        return query_rows(dataset, query);
    };
    dataset.require_column(&comparison.column)?;

    match columnar::filter_rows(dataset, &comparison) {
        Ok(rows) => Ok(rows),
        Err(err) => {
            warn!(error = %err, "Columnar filter failed, using the expression evaluator");
            query_rows(dataset, query)
        }
    }
}
