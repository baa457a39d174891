//! Workbook access: path resolution, size classification, loading and
//! writing

pub mod dataset;
pub mod loader;
pub mod path;
pub mod size;
pub mod source;
pub mod value;
pub mod writer;

pub use dataset::{Column, Dataset};
pub use loader::{CappedLoader, DirectLoader, LoadedSheet, SheetLoader, select_loader};
pub use path::PathResolver;
pub use size::{SizeClass, SizeInfo};
pub use source::{SheetData, WorkbookFile};
pub use value::CellValue;
pub use writer::{ChartSheet, NativeChartKind, WrittenChart, write_chart_sheet};
