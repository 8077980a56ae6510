//! Stateless metrics over aggregated benchmark data.

pub mod distance;
pub mod interpolation;
pub mod similarity;
pub mod stats;

pub use distance::{scaled_distance, DistanceMode};
pub use interpolation::{max_measure, step_hold, Envelope, MAX_HORIZON};
pub use similarity::permutation_similarity;
pub use stats::{pearson, Summary};
