//! PNG chart rendering on the plotters bitmap backend
//!
//! Text is drawn with a bundled DejaVu Sans face registered as `sans-serif`,
//! so rendering does not depend on fonts installed on the host.

use crate::error::{DataError, DataResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::io::Cursor;
use std::ops::Range;
use std::sync::OnceLock;

const FONT_FAMILY: &str = "sans-serif";
const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
const CAPTION_FONT: (&str, u32) = (FONT_FAMILY, 28);
const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);
const COLORBAR_WIDTH: u32 = 110;
const MAX_X_LABELS: usize = 30;

/// Pixel size of a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

impl ChartSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One bar per category
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// X positions of a line chart
#[derive(Debug, Clone)]
pub enum LineAxis {
    /// Plot against numeric x values
    Numeric(Vec<Option<f64>>),
    /// Plot at evenly spaced positions labelled with these names
    Categories(Vec<String>),
}

impl LineAxis {
    fn len(&self) -> usize {
        match self {
            LineAxis::Numeric(values) => values.len(),
            LineAxis::Categories(names) => names.len(),
        }
    }

    fn position(&self, index: usize) -> Option<f64> {
        match self {
            LineAxis::Numeric(values) => values.get(index).copied().flatten(),
            LineAxis::Categories(_) => Some(index as f64),
        }
    }
}

/// One or more named series sharing an x axis
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub x: LineAxis,
    pub series: Vec<(String, Vec<Option<f64>>)>,
}

/// Point colouring for scatter plots
#[derive(Debug, Clone)]
pub enum PointColors {
    /// Category index per point, with the category names
    Categorical { index: Vec<usize>, names: Vec<String> },
    /// A value per point mapped onto a colour scale
    Continuous { label: String, values: Vec<Option<f64>> },
}

/// X/Y points with optional colouring
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
    pub colors: Option<PointColors>,
}

/// Encode PNG bytes as a data URI
pub fn to_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

/// Render a bar chart to PNG
pub fn render_bar(chart: &BarChart, size: ChartSize) -> DataResult<Vec<u8>> {
    let n = chart.categories.len();
    let y_range = padded_range(chart.values.iter().flatten().copied(), true);

    render_png(size, |root| {
        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5).max(0.5), y_range)
            .map_err(render_error)?;

        let labels = &chart.categories;
        let formatter = |x: &f64| label_at(labels, *x);
        ctx.configure_mesh()
            .disable_x_mesh()
            .light_line_style(GRID_COLOR)
            .x_labels(n.clamp(1, MAX_X_LABELS))
            .x_label_formatter(&formatter)
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        ctx.draw_series(chart.values.iter().enumerate().filter_map(|(i, value)| {
            value.map(|v| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], BAR_COLOR.filled())
            })
        }))
        .map_err(render_error)?;
        Ok(())
    })
}

/// Render a multi-series line chart with point markers to PNG
pub fn render_line(chart: &LineChart, size: ChartSize) -> DataResult<Vec<u8>> {
    let n = chart.x.len();
    let x_range = match &chart.x {
        LineAxis::Numeric(values) => padded_range(values.iter().flatten().copied(), false),
        LineAxis::Categories(_) => -0.5f64..(n as f64 - 0.5).max(0.5),
    };
    let y_range = padded_range(
        chart.series.iter().flat_map(|(_, values)| values.iter().flatten().copied()),
        false,
    );

    render_png(size, |root| {
        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;

        let labels: &[String] = match &chart.x {
            LineAxis::Categories(labels) => labels,
            LineAxis::Numeric(_) => &[],
        };
        let formatter = |x: &f64| label_at(labels, *x);
        let mut mesh = ctx.configure_mesh();
        mesh.light_line_style(GRID_COLOR)
            .x_desc(chart.x_label.as_str())
            .y_desc("Values");
        if !labels.is_empty() {
            mesh.x_labels(n.clamp(1, MAX_X_LABELS))
                .x_label_formatter(&formatter);
        }
        mesh.draw().map_err(render_error)?;

        for (k, (name, values)) in chart.series.iter().enumerate() {
            let color = series_color(k);
            let points: Vec<(f64, f64)> = values
                .iter()
                .enumerate()
                .filter_map(|(i, y)| Some((chart.x.position(i)?, (*y)?)))
                .collect();

            ctx.draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
                .map_err(render_error)?
                .label(name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            ctx.draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))
                .map_err(render_error)?;
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(render_error)?;
        Ok(())
    })
}

/// Render a scatter plot to PNG
///
/// Categorical colours get a legend; continuous colours get a colour bar.
pub fn render_scatter(plot: &ScatterPlot, size: ChartSize) -> DataResult<Vec<u8>> {
    let x_range = padded_range(plot.points.iter().map(|p| p.0), false);
    let y_range = padded_range(plot.points.iter().map(|p| p.1), false);

    render_png(size, |root| {
        let (plot_area, bar_area) = match &plot.colors {
            Some(PointColors::Continuous { .. }) => {
                let split = size.width.saturating_sub(COLORBAR_WIDTH);
                let (left, right) = root.split_horizontally(split as i32);
                (left, Some(right))
            }
            _ => (root.clone(), None),
        };

        let mut ctx = ChartBuilder::on(&plot_area)
            .caption(&plot.title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(render_error)?;
        ctx.configure_mesh()
            .light_line_style(GRID_COLOR)
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .draw()
            .map_err(render_error)?;

        match &plot.colors {
            None => {
                ctx.draw_series(
                    plot.points
                        .iter()
                        .map(|&p| Circle::new(p, 4, BAR_COLOR.mix(0.6).filled())),
                )
                .map_err(render_error)?;
            }
            Some(PointColors::Categorical { index, names }) => {
                for (k, name) in names.iter().enumerate() {
                    let color = series_color(k);
                    ctx.draw_series(
                        plot.points
                            .iter()
                            .zip(index)
                            .filter(|(_, category)| **category == k)
                            .map(|(&p, _)| Circle::new(p, 4, color.mix(0.6).filled())),
                    )
                    .map_err(render_error)?
                    .label(name.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                }
                ctx.configure_series_labels()
                    .background_style(WHITE.mix(0.8))
                    .border_style(BLACK)
                    .draw()
                    .map_err(render_error)?;
            }
            Some(PointColors::Continuous { label, values }) => {
                let scale = padded_range(values.iter().flatten().copied(), false);
                ctx.draw_series(plot.points.iter().zip(values).map(|(&p, value)| {
                    let color = match value {
                        Some(v) => viridis((v - scale.start) / (scale.end - scale.start)),
                        None => RGBColor(160, 160, 160),
                    };
                    Circle::new(p, 4, color.mix(0.6).filled())
                }))
                .map_err(render_error)?;
                if let Some(area) = &bar_area {
                    draw_colorbar(area, label, scale)?;
                }
            }
        }
        Ok(())
    })
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    label: &str,
    scale: Range<f64>,
) -> DataResult<()> {
    let mut ctx = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(70)
        .margin_right(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, scale.clone())
        .map_err(render_error)?;
    ctx.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .draw()
        .map_err(render_error)?;

    const STEPS: usize = 64;
    let step = (scale.end - scale.start) / STEPS as f64;
    ctx.draw_series((0..STEPS).map(|i| {
        let low = scale.start + step * i as f64;
        let color = viridis((i as f64 + 0.5) / STEPS as f64);
        Rectangle::new([(0.0, low), (1.0, low + step)], color.filled())
    }))
    .map_err(render_error)?;
    Ok(())
}

/// Register the bundled font with plotters, once per process
fn ensure_font() -> DataResult<()> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED.get_or_init(|| {
        plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok()
    });
    if registered {
        Ok(())
    } else {
        Err(DataError::Render("bundled chart font could not be loaded".to_string()))
    }
}

fn render_png<F>(size: ChartSize, draw: F) -> DataResult<Vec<u8>>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> DataResult<()>,
{
    ensure_font()?;
    let ChartSize { width, height } = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        draw(&root)?;
        root.present().map_err(render_error)?;
    }
    encode_png(width, height, buffer)
}

fn encode_png(width: u32, height: u32, pixels: Vec<u8>) -> DataResult<Vec<u8>> {
    let image = image::RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| DataError::Render("pixel buffer does not match chart size".to_string()))?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(render_error)?;
    Ok(out.into_inner())
}

fn render_error<E: Display>(err: E) -> DataError {
    DataError::Render(err.to_string())
}

/// Axis range covering `values` with a 5% margin
fn padded_range(values: impl Iterator<Item = f64>, include_zero: bool) -> Range<f64> {
    let (mut low, mut high) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !low.is_finite() {
        low = 0.0;
        high = 1.0;
    }
    if include_zero {
        low = low.min(0.0);
        high = high.max(0.0);
    }
    if (high - low).abs() < f64::EPSILON {
        low -= 1.0;
        high += 1.0;
    }
    let margin = (high - low) * 0.05;
    let low = if include_zero && low == 0.0 { 0.0 } else { low - margin };
    low..high + margin
}

fn label_at(labels: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 0.01 || nearest < 0.0 {
        return String::new();
    }
    labels.get(nearest as usize).cloned().unwrap_or_default()
}

fn series_color(index: usize) -> RGBColor {
    let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
    RGBColor(r, g, b)
}

/// Approximate viridis colour for `t` in `[0, 1]`
fn viridis(t: f64) -> RGBColor {
    const STOPS: [(f64, (u8, u8, u8)); 5] = [
        (0.0, (68, 1, 84)),
        (0.25, (59, 82, 139)),
        (0.5, (33, 145, 140)),
        (0.75, (94, 201, 98)),
        (1.0, (253, 231, 37)),
    ];
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let upper = STOPS.iter().position(|(s, _)| *s >= t).unwrap_or(STOPS.len() - 1).max(1);
    let (s0, c0) = STOPS[upper - 1];
    let (s1, c1) = STOPS[upper];
    let f = (t - s0) / (s1 - s0);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    RGBColor(mix(c0.0, c1.0), mix(c0.1, c1.1), mix(c0.2, c1.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn small() -> ChartSize {
        ChartSize::new(320, 240)
    }

    #[test]
    fn test_bar_chart_is_png() {
        let chart = BarChart {
            title: "Bar Chart".into(),
            x_label: "region".into(),
            y_label: "sales".into(),
            categories: vec!["A".into(), "B".into()],
            values: vec![Some(30.0), Some(30.0)],
        };
        let png = render_bar(&chart, small()).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_line_chart_with_two_series() {
        let chart = LineChart {
            title: "Line Chart".into(),
            x_label: "month".into(),
            x: LineAxis::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)]),
            series: vec![
                ("a".into(), vec![Some(1.0), None, Some(3.0)]),
                ("b".into(), vec![Some(2.0), Some(2.5), Some(1.0)]),
            ],
        };
        let png = render_line(&chart, small()).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_scatter_with_colour_scale() {
        let plot = ScatterPlot {
            title: "Scatter Plot".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            points: vec![(1.0, 2.0), (2.0, 4.0), (3.0, 1.0)],
            colors: Some(PointColors::Continuous {
                label: "z".into(),
                values: vec![Some(0.0), Some(5.0), None],
            }),
        };
        let png = render_scatter(&plot, small()).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_bundled_font_lays_out_text() {
        ensure_font().unwrap();
        let font: FontDesc<'_> = (FONT_FAMILY, 20).into_font();
        let (width, height) = font.box_size("Sales by region").unwrap();
        assert!(width > 0 && height > 0);
    }

    #[test]
    fn test_caption_pixels_are_drawn() {
        let chart = |title: &str| BarChart {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            categories: vec!["A".into()],
            values: vec![Some(1.0)],
        };
        let titled = render_bar(&chart("Quarterly Sales"), small()).unwrap();
        let blank = render_bar(&chart(""), small()).unwrap();
        assert_ne!(titled, blank);
    }

    #[test]
    fn test_data_uri_prefix() {
        assert_eq!(to_data_uri(b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_padded_range() {
        let range = padded_range([10.0, 30.0].into_iter(), true);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 31.5).abs() < 1e-9);
        let flat = padded_range([5.0].into_iter(), false);
        assert!(flat.start < 5.0 && flat.end > 5.0);
    }

    #[test]
    fn test_label_at_only_on_integers() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(label_at(&labels, 1.0), "B");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, 7.0), "");
    }

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
    }
}
