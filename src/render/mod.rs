pub mod plotters_backend;

pub use plotters_backend::PlottersRenderer;

use crate::error::Result;
use crate::style::Rgb;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

/// How a series is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesKind {
    Line,
    Scatter,
    /// Markers joined by a line, with ± one standard deviation per point.
    ErrorBars { std_dev: Vec<f64> },
    /// Shaded area between `lower` and `upper`, aligned with the points' x.
    Band { lower: Vec<f64>, upper: Vec<f64> },
    /// Reference line across the whole x range; points are ignored.
    HorizontalLine { y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
    pub kind: SeriesKind,
}

impl Series {
    pub fn new<S: Into<String>>(name: S, color: Rgb, points: Vec<(f64, f64)>, kind: SeriesKind) -> Self {
        Series { name: name.into(), color, points, kind }
    }

    /// Every y value the series occupies, bands and error bars included.
    pub fn y_extent(&self) -> Vec<f64> {
        match &self.kind {
            SeriesKind::Line | SeriesKind::Scatter => self.points.iter().map(|&(_, y)| y).collect(),
            SeriesKind::ErrorBars { std_dev } => self
                .points
                .iter()
                .zip(std_dev)
                .flat_map(|(&(_, y), s)| [y - s, y + s])
                .collect(),
            SeriesKind::Band { lower, upper } => lower.iter().chain(upper).copied().collect(),
            SeriesKind::HorizontalLine { y } => vec![*y],
        }
    }
}

/// One set of axes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub log_y: bool,
    /// When set, x coordinates are category indices labelled with these names.
    pub x_categories: Vec<String>,
    pub series: Vec<Series>,
}

impl Panel {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Panel { title: title.into(), x_label: x_label.into(), y_label: y_label.into(), ..Panel::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// One image: panels laid out row by row in a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub size: (u32, u32),
    pub columns: usize,
    pub rows: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn single(size: (u32, u32), panel: Panel) -> Self {
        Figure { size, columns: 1, rows: 1, panels: vec![panel] }
    }

    pub fn grid(size: (u32, u32), rows: usize, columns: usize, panels: Vec<Panel>) -> Self {
        Figure { size, columns: columns.max(1), rows: rows.max(1), panels }
    }
}

/// Anything that can turn a figure into an image file.
pub trait ChartRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()>;
}

/// Keeps figures in memory instead of drawing them.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    figures: RefCell<Vec<(PathBuf, Figure)>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.figures.borrow().iter().map(|(path, _)| path.clone()).collect()
    }

    pub fn figure(&self, file_name: &str) -> Option<Figure> {
        self.figures
            .borrow()
            .iter()
            .find(|(path, _)| path.file_name().map(|name| name == file_name).unwrap_or(false))
            .map(|(_, figure)| figure.clone())
    }
}

impl ChartRenderer for RecordingRenderer {
    fn render(&self, figure: &Figure, path: &Path) -> Result<()> {
        self.figures.borrow_mut().push((path.to_path_buf(), figure.clone()));
        Ok(())
    }
}
