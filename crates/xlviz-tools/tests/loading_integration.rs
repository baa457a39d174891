//! Loading strategies seen through the inspection tools

mod common;

use common::{context, rows_workbook, run, sales_workbook};
use serde_json::json;
use tempfile::TempDir;
use xlviz_tools::{ExcelQueryTool, GetColumnNamesTool, ReadExcelTool};

#[tokio::test]
async fn test_standard_file_loads_exact_counts() {
    let dir = TempDir::new().unwrap();
    rows_workbook(dir.path(), 1500);
    let tool = ReadExcelTool::new(context(dir.path(), false));

    let output = run(&tool, json!({"file_path": "rows.xlsx"})).await;
    assert!(output.contains("Dimensions: 1500 rows × 3 columns"));
    assert!(!output.contains("Showing the first"));
    // three header lines, a blank line, the column line and 1500 rows
    assert_eq!(output.lines().count(), 3 + 1 + 1 + 1500);
}

#[tokio::test]
async fn test_large_file_preview_is_capped_at_1000_rows() {
    let dir = TempDir::new().unwrap();
    rows_workbook(dir.path(), 1500);
    let tool = ReadExcelTool::new(context(dir.path(), true));

    let output = run(&tool, json!({"file_path": "rows.xlsx"})).await;
    assert!(output.contains("Dimensions: 1500 rows × 3 columns"));
    assert!(output.contains("[Showing the first 1000 of 1500 rows"));
}

#[tokio::test]
async fn test_large_query_reports_true_totals() {
    let dir = TempDir::new().unwrap();
    rows_workbook(dir.path(), 1500);
    let tool = ExcelQueryTool::new(context(dir.path(), true));

    let output = run(&tool, json!({"file_path": "rows.xlsx", "query": "id >= 100"})).await;
    assert!(output.contains("Found 1400 rows out of 1500 total"));
    assert!(output.contains("[Showing the first 1000 of 1400 matching rows]"));

    // multi-clause filters use the evaluator on the large path too
    let output = run(
        &tool,
        json!({"file_path": "rows.xlsx", "query": "id < 30 and category == 'x'"}),
    )
    .await;
    assert!(output.contains("Found 10 rows out of 1500 total"));
}

#[tokio::test]
async fn test_column_peek_on_large_files() {
    let dir = TempDir::new().unwrap();
    rows_workbook(dir.path(), 200);
    let tool = GetColumnNamesTool::new(context(dir.path(), true));

    let output = run(&tool, json!({"file_path": "rows.xlsx", "sheet_name": "Data"})).await;
    assert_eq!(
        output,
        "Columns in 'rows.xlsx' (sheet 'Data'):\n\n1. id\n2. amount\n3. category\n"
    );
}

#[tokio::test]
async fn test_missing_column_is_named_in_queries() {
    let dir = TempDir::new().unwrap();
    sales_workbook(dir.path());

    for large in [false, true] {
        let tool = ExcelQueryTool::new(context(dir.path(), large));
        let output = run(&tool, json!({"file_path": "sales.xlsx", "query": "profit > 1"})).await;
        assert_eq!(output, "Error: Column 'profit' does not exist in the file.", "large={}", large);
    }
}
