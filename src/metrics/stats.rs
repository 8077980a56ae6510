use crate::error::{PlotError, Result};

/// Descriptive statistics of one group of scalar results.
///
/// `std_dev` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn of(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(PlotError::EmptyInput("values"));
        }

        let count = values.len();
        let mean = mean(values);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Ok(Summary {
            count,
            mean,
            std_dev: variance.sqrt(),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation coefficient of two paired series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64> {
    if xs.len() != ys.len() {
        return Err(PlotError::LengthMismatch { left: xs.len(), right: ys.len() });
    }
    if xs.is_empty() {
        return Err(PlotError::EmptyInput("series"));
    }

    let (mean_x, mean_y) = (mean(xs), mean(ys));
    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return Err(PlotError::DegenerateSeries);
    }
    Ok(covariance / (variance_x * variance_y).sqrt())
}
