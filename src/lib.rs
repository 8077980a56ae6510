pub mod aggregate;
pub mod analysis;
pub mod error;
pub mod jitter;
pub mod metrics;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod results;
pub mod style;

pub use error::{PlotError, Result};
