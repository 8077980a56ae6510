use crate::error::{PlotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An opaque 24-bit color, written as `#rrggbb` in style files.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const RED: Rgb = Rgb(255, 0, 0);

    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Rgb::parse_hex(&value).ok_or_else(|| format!("invalid color '{}', expected #rrggbb", value))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FontSizes {
    pub base: u32,
    pub title: u32,
    pub axis_labels: u32,
    pub ticks: u32,
    pub legend: u32,
    pub figure_title: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        FontSizes { base: 14, title: 18, axis_labels: 16, ticks: 14, legend: 14, figure_title: 20 }
    }
}

/// Random displacement applied to scatter points so overlapping runs stay visible.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct JitterSettings {
    pub x: f64,
    pub y: f64,
    pub seed: u64,
}

impl Default for JitterSettings {
    fn default() -> Self {
        JitterSettings { x: 0.1, y: 0.01, seed: 42 }
    }
}

/// Immutable plotting style shared by every chart of one invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlotStyle {
    pub function_colors: BTreeMap<String, Rgb>,
    pub fallback_color: Rgb,
    pub optimal_color: Rgb,
    pub fonts: FontSizes,
    pub single_size: (u32, u32),
    pub grid_size: (u32, u32),
    pub burnout_size: (u32, u32),
    pub grid_columns: usize,
    pub grid_rows: usize,
    pub band_opacity: f64,
    pub scatter_opacity: f64,
    pub jitter: JitterSettings,
    pub output_dir: PathBuf,
}

impl Default for PlotStyle {
    fn default() -> Self {
        let function_colors = [
            ("heuristic", Rgb(0x00, 0x00, 0x00)),
            ("randomWalk", Rgb(0xff, 0x00, 0x00)),
            ("randomSearch", Rgb(0x00, 0x00, 0xff)),
            ("localSearchGreedy", Rgb(0xff, 0xa5, 0x00)),
            ("simulatedAnnealing", Rgb(0x00, 0x80, 0x00)),
            ("localSearchSteepest", Rgb(0x80, 0x00, 0x80)),
            ("tabuSearch", Rgb(0x00, 0xce, 0xd1)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        PlotStyle {
            function_colors,
            fallback_color: Rgb::BLACK,
            optimal_color: Rgb::RED,
            fonts: FontSizes::default(),
            single_size: (1200, 800),
            grid_size: (2400, 1200),
            burnout_size: (1000, 600),
            grid_columns: 4,
            grid_rows: 2,
            band_opacity: 0.2,
            scatter_opacity: 0.7,
            jitter: JitterSettings::default(),
            output_dir: PathBuf::from("plots"),
        }
    }
}

impl PlotStyle {
    /// Reads a JSON style file; absent fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => PlotError::NotFound(path.to_path_buf()),
            _ => PlotError::Io { path: path.to_path_buf(), source },
        })?;
        serde_json::from_str(&content).map_err(|source| PlotError::Style { path: path.to_path_buf(), source })
    }

    pub fn color_of(&self, function_name: &str) -> Rgb {
        self.function_colors.get(function_name).copied().unwrap_or(self.fallback_color)
    }

    /// Number of panels one grid figure can hold.
    pub fn grid_capacity(&self) -> usize {
        self.grid_columns.max(1) * self.grid_rows.max(1)
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }
}
