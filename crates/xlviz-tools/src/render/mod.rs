//! Output rendering: aligned text tables and PNG charts

pub mod chart;
pub mod table;

pub use chart::{
    BarChart, ChartSize, LineAxis, LineChart, PointColors, ScatterPlot, render_bar, render_line,
    render_scatter, to_data_uri,
};
pub use table::TextTable;
