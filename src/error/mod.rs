use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading, analysing or rendering benchmark results.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("results file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("optimal cost must be finite and positive, got {0}")]
    InvalidOptimalCost(f64),

    #[error("length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    #[error("trace has no sample at measure 0")]
    MissingInitialSample,

    #[error("trace measures decrease at sample {index}")]
    UnorderedSamples { index: usize },

    #[error("horizon {horizon} exceeds the interpolation limit of {limit} slots")]
    HorizonTooLarge { horizon: u64, limit: u64 },

    #[error("series has zero variance")]
    DegenerateSeries,

    #[error("{chart} charts cannot be drawn from {experiment} results")]
    WrongExperiment { chart: String, experiment: &'static str },

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("invalid style file {}: {source}", path.display())]
    Style {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PlotError>;
