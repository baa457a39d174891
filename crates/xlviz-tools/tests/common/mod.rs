//! Shared fixtures for the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use xlviz_core::Config;
use xlviz_core::tools::{Tool, ToolCall};
use xlviz_tools::ToolContext;

/// `sales.xlsx`: region/sales rows `[A,10],[B,30],[A,20]` on sheet `Sales`
pub fn sales_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("sales.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales").unwrap();
    sheet.write_string(0, 0, "region").unwrap();
    sheet.write_string(0, 1, "sales").unwrap();
    for (i, (region, sales)) in [("A", 10.0), ("B", 30.0), ("A", 20.0)].iter().enumerate() {
        sheet.write_string(i as u32 + 1, 0, *region).unwrap();
        sheet.write_number(i as u32 + 1, 1, *sales).unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

/// `rows.xlsx`: `n` rows of (id, amount, category) on sheet `Data`
pub fn rows_workbook(dir: &Path, n: u32) -> PathBuf {
    let path = dir.join("rows.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Data").unwrap();
    for (j, header) in ["id", "amount", "category"].iter().enumerate() {
        sheet.write_string(0, j as u16, *header).unwrap();
    }
    for i in 0..n {
        sheet.write_number(i + 1, 0, i as f64).unwrap();
        sheet.write_number(i + 1, 1, (i % 50) as f64 * 1.5).unwrap();
        sheet
            .write_string(i + 1, 2, ["x", "y", "z"][(i % 3) as usize])
            .unwrap();
    }
    workbook.save(&path).unwrap();
    path
}

/// Context rooted at `dir`; `large` forces the large-file path
pub fn context(dir: &Path, large: bool) -> Arc<ToolContext> {
    let mut config = Config::default();
    config.workbook.default_directory = Some(dir.to_path_buf());
    if large {
        config.workbook.large_file_threshold_mb = 0;
    }
    config.chart.width = 400;
    config.chart.height = 300;
    Arc::new(ToolContext::new(&config))
}

/// Execute a tool and return the text a client would see
pub async fn run(tool: &dyn Tool, args: Value) -> String {
    let arguments: HashMap<String, Value> = serde_json::from_value(args).unwrap();
    let call = ToolCall::new("it-1", tool.name(), arguments);
    let result = tool.execute_with_timing(&call).await;
    tool.render_result(&result)
}
