//! Plain-text tables

use crate::workbook::Dataset;
use unicode_width::UnicodeWidthStr;

const SEPARATOR: &str = "  ";

/// Right-aligned text table with optional left-aligned row labels
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    row_labels: Option<Vec<String>>,
}

impl TextTable {
    /// Create an empty table with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            row_labels: None,
        }
    }

    /// Table of every cell in `dataset`
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let headers = dataset.column_names().iter().map(|s| s.to_string()).collect();
        let mut table = Self::new(headers);
        for row in 0..dataset.height() {
            table.push_row(dataset.row(row).iter().map(|v| v.to_string()).collect());
        }
        table
    }

    /// Label each row in a leading column
    pub fn with_row_labels(mut self, labels: Vec<String>) -> Self {
        self.row_labels = Some(labels);
        self
    }

    /// Append a row; short rows are padded with blanks
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the table, one line per row after the header line
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(j, header)| {
                self.rows
                    .iter()
                    .map(|row| row[j].width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let label_width = self
            .row_labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.width()).max().unwrap_or(0));

        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.render_line(label_width.map(|_| ""), &self.headers, &widths, label_width));
        for (i, row) in self.rows.iter().enumerate() {
            let label = self
                .row_labels
                .as_ref()
                .map(|labels| labels.get(i).map(String::as_str).unwrap_or(""));
            lines.push(self.render_line(label, row, &widths, label_width));
        }
        lines.join("\n")
    }

    fn render_line(
        &self,
        label: Option<&str>,
        cells: &[String],
        widths: &[usize],
        label_width: Option<usize>,
    ) -> String {
        let mut parts = Vec::with_capacity(cells.len() + 1);
        if let (Some(label), Some(width)) = (label, label_width) {
            parts.push(pad_right(label, width));
        }
        for (cell, &width) in cells.iter().zip(widths) {
            parts.push(pad_left(cell, width));
        }
        parts.join(SEPARATOR).trim_end().to_string()
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", " ".repeat(fill), text)
}

fn pad_right(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}
