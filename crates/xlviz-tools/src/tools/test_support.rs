//! Workbook fixtures for tool tests

use super::ToolContext;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use xlviz_core::Config;
use xlviz_core::tools::{Tool, ToolCall};

pub struct SheetSpec<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<Value>>,
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec<'_>]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).unwrap();
        for (j, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, j as u16, *header).unwrap();
        }
        for (i, row) in sheet.rows.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let (r, c) = (i as u32 + 1, j as u16);
                match value {
                    Value::Number(n) => {
                        worksheet.write_number(r, c, n.as_f64().unwrap()).unwrap();
                    }
                    Value::String(s) => {
                        worksheet.write_string(r, c, s).unwrap();
                    }
                    Value::Bool(b) => {
                        worksheet.write_boolean(r, c, *b).unwrap();
                    }
                    _ => {}
                }
            }
        }
    }
    workbook.save(path).unwrap();
}

/// `sales.xlsx` with a `Sales` sheet (region, sales, units) and a `Notes` sheet
pub fn sales_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("sales.xlsx");
    write_workbook(
        &path,
        &[
            SheetSpec {
                name: "Sales",
                headers: &["region", "sales", "units"],
                rows: vec![
                    vec!["A".into(), 10.into(), 1.into()],
                    vec!["B".into(), 30.into(), 2.into()],
                    vec!["A".into(), 20.into(), 3.into()],
                ],
            },
            SheetSpec {
                name: "Notes",
                headers: &["note"],
                rows: vec![vec!["checked".into()]],
            },
        ],
    );
    path
}

/// `numbers.xlsx` with `n` rows of (id, value, group)
pub fn numbers_fixture(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("numbers.xlsx");
    let rows = (0..n)
        .map(|i| {
            vec![
                Value::from(i as f64),
                Value::from((i * 7 % 13) as f64),
                Value::from(if i % 4 == 0 { "rare" } else { "common" }),
            ]
        })
        .collect();
    write_workbook(
        &path,
        &[SheetSpec {
            name: "Data",
            headers: &["id", "value", "group"],
            rows,
        }],
    );
    path
}

pub fn context(dir: &Path) -> Arc<ToolContext> {
    let mut config = Config::default();
    config.workbook.default_directory = Some(dir.to_path_buf());
    config.chart.width = 320;
    config.chart.height = 240;
    Arc::new(ToolContext::new(&config))
}

/// Context that treats every file as large
pub fn large_context(dir: &Path) -> Arc<ToolContext> {
    let mut config = Config::default();
    config.workbook.default_directory = Some(dir.to_path_buf());
    config.workbook.large_file_threshold_mb = 0;
    config.workbook.preview_row_limit = 2;
    config.chart.width = 320;
    config.chart.height = 240;
    Arc::new(ToolContext::new(&config))
}

pub fn call(tool: &str, args: Value) -> ToolCall {
    let arguments: HashMap<String, Value> = serde_json::from_value(args).unwrap();
    ToolCall::new("test-1", tool, arguments)
}

/// Run a tool the way the server does and return the rendered text
pub async fn run(tool: &dyn Tool, args: Value) -> String {
    let result = tool.execute_with_timing(&call(tool.name(), args)).await;
    tool.render_result(&result)
}
