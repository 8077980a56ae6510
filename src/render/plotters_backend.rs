use crate::error::{PlotError, Result};
use crate::render::{ChartRenderer, Figure, Panel, SeriesKind};
use crate::style::{PlotStyle, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::debug;

const MARGIN: u32 = 20;
const X_LABEL_AREA_SIZE: u32 = 50;
const Y_LABEL_AREA_SIZE: u32 = 80;
const MARKER_SIZE: i32 = 4;
const ERROR_BAR_WIDTH: u32 = 10;

/// Draws figures as PNG images with `plotters`.
pub struct PlottersRenderer {
    style: PlotStyle,
}

impl PlottersRenderer {
    pub fn new(style: PlotStyle) -> Self {
        PlottersRenderer { style }
    }
}

fn render_err<E: Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| PlotError::Io { path: dir.to_path_buf(), source })?;
        }

        let root = BitMapBackend::new(path, figure.size).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let areas = root.split_evenly((figure.rows, figure.columns));
        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            draw_panel(panel, area, &self.style)?;
        }

        root.present().map_err(render_err)?;
        debug!(path = %path.display(), panels = figure.panels.len(), "wrote chart");
        Ok(())
    }
}

/// Maps data values onto the drawn y axis: identity, or log10 above a floor.
struct YAxis {
    log: bool,
    floor: f64,
}

impl YAxis {
    fn for_panel(panel: &Panel) -> Self {
        let floor = panel
            .series
            .iter()
            .flat_map(|series| series.y_extent())
            .filter(|&y| y > 0.0)
            .fold(f64::INFINITY, f64::min);
        YAxis { log: panel.log_y, floor: if floor.is_finite() { floor } else { 1.0 } }
    }

    fn map(&self, y: f64) -> f64 {
        if self.log {
            y.max(self.floor).log10()
        } else {
            y
        }
    }

    fn label(&self, value: f64) -> String {
        if self.log {
            format!("{:.3}", 10f64.powf(value))
        } else {
            format!("{:.3}", value)
        }
    }
}

fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn draw_panel<DB: DrawingBackend>(panel: &Panel, area: &DrawingArea<DB, Shift>, style: &PlotStyle) -> Result<()> {
    let y_axis = YAxis::for_panel(panel);
    let (x_min, x_max) = padded(panel.series.iter().flat_map(|series| series.points.iter().map(|&(x, _)| x)));
    let (y_min, y_max) = padded(
        panel
            .series
            .iter()
            .flat_map(|series| series.y_extent())
            .map(|y| y_axis.map(y)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", style.fonts.title))
        .margin(MARGIN)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(Y_LABEL_AREA_SIZE)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(render_err)?;

    let categories = &panel.x_categories;
    let x_formatter = |x: &f64| {
        if categories.is_empty() {
            if x.fract() == 0.0 {
                format!("{:.0}", x)
            } else {
                format!("{:.2}", x)
            }
        } else {
            let index = x.round();
            if index >= 0.0 && (x - index).abs() < 1e-6 {
                categories.get(index as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        }
    };
    let y_formatter = |y: &f64| y_axis.label(*y);

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style(("sans-serif", style.fonts.ticks))
            .axis_desc_style(("sans-serif", style.fonts.axis_labels))
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter);
        if !categories.is_empty() {
            mesh.x_labels(categories.len() + 2);
        }
        mesh.draw().map_err(render_err)?;
    }

    for series in &panel.series {
        let color = rgb(series.color);
        let points: Vec<(f64, f64)> = series.points.iter().map(|&(x, y)| (x, y_axis.map(y))).collect();

        match &series.kind {
            SeriesKind::Line => {
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
            SeriesKind::Scatter => {
                let fill = color.mix(style.scatter_opacity);
                chart
                    .draw_series(points.iter().map(|&point| Circle::new(point, MARKER_SIZE, fill.filled())))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, color.filled()));
            }
            SeriesKind::ErrorBars { std_dev } => {
                chart
                    .draw_series(series.points.iter().zip(std_dev).map(|(&(x, y), s)| {
                        ErrorBar::new_vertical(
                            x,
                            y_axis.map(y - s),
                            y_axis.map(y),
                            y_axis.map(y + s),
                            color.filled(),
                            ERROR_BAR_WIDTH,
                        )
                    }))
                    .map_err(render_err)?;
                chart
                    .draw_series(points.iter().map(|&point| Circle::new(point, MARKER_SIZE, color.filled())))
                    .map_err(render_err)?;
                chart
                    .draw_series(LineSeries::new(points, color.stroke_width(2)))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
            SeriesKind::Band { lower, upper } => {
                let xs = series.points.iter().map(|&(x, _)| x);
                let top = xs.clone().zip(upper.iter()).map(|(x, &y)| (x, y_axis.map(y)));
                let bottom = xs.zip(lower.iter()).map(|(x, &y)| (x, y_axis.map(y))).rev();
                let outline: Vec<(f64, f64)> = top.chain(bottom).collect();
                let fill = color.mix(style.band_opacity);
                chart
                    .draw_series(std::iter::once(Polygon::new(outline, fill.filled())))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled()));
            }
            SeriesKind::HorizontalLine { y } => {
                let y = y_axis.map(*y);
                chart
                    .draw_series(LineSeries::new(vec![(x_min, y), (x_max, y)], color.stroke_width(2)))
                    .map_err(render_err)?
                    .label(series.name.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }
    }

    if panel.series.iter().any(|series| !series.name.is_empty()) {
        chart
            .configure_series_labels()
            .label_font(("sans-serif", style.fonts.legend))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }

    Ok(())
}
