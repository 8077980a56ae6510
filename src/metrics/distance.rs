use crate::error::{PlotError, Result};

/// Whether a scaled distance keeps the sign of the cost gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMode {
    #[default]
    Signed,
    Absolute,
}

/// Normalized gap between `cost` and the optimal cost: `(cost - optimal) / optimal`.
///
/// Zero, negative and non-finite optimal costs are rejected instead of
/// producing infinities.
pub fn scaled_distance(cost: f64, optimal_cost: f64, mode: DistanceMode) -> Result<f64> {
    if !optimal_cost.is_finite() || optimal_cost <= 0.0 {
        return Err(PlotError::InvalidOptimalCost(optimal_cost));
    }

    let distance = (cost - optimal_cost) / optimal_cost;
    Ok(match mode {
        DistanceMode::Signed => distance,
        DistanceMode::Absolute => distance.abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_optimum() {
        assert_eq!(scaled_distance(50.0, 50.0, DistanceMode::Signed).unwrap(), 0.0);
    }

    #[test]
    fn sign_follows_mode() {
        assert!((scaled_distance(55.0, 50.0, DistanceMode::Signed).unwrap() - 0.1).abs() < 1e-12);
        assert!((scaled_distance(45.0, 50.0, DistanceMode::Signed).unwrap() + 0.1).abs() < 1e-12);
        assert!((scaled_distance(45.0, 50.0, DistanceMode::Absolute).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn linear_in_cost() {
        let d1 = scaled_distance(60.0, 50.0, DistanceMode::Signed).unwrap();
        let d2 = scaled_distance(70.0, 50.0, DistanceMode::Signed).unwrap();
        assert!((d2 - 2.0 * d1).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_optimum() {
        assert!(matches!(
            scaled_distance(1.0, 0.0, DistanceMode::Signed),
            Err(PlotError::InvalidOptimalCost(_))
        ));
        assert!(scaled_distance(1.0, f64::NAN, DistanceMode::Absolute).is_err());
        assert!(scaled_distance(1.0, -3.0, DistanceMode::Absolute).is_err());
    }
}
