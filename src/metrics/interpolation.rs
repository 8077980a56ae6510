use crate::error::{PlotError, Result};

/// Largest horizon `step_hold` will materialise, one slot per measure unit.
pub const MAX_HORIZON: u64 = 10_000_000;

/// Holds the last observed cost over every integer measure in `0..=horizon`.
///
/// `samples` are `(measure, cost)` pairs in recording order. The first one
/// must sit at measure 0 and measures must never decrease. Samples past the
/// horizon are ignored. When several samples share a measure, the last one
/// is held. Horizons above [`MAX_HORIZON`] are rejected.
pub fn step_hold(samples: &[(u64, f64)], horizon: u64) -> Result<Vec<f64>> {
    let &(first_measure, first_cost) = samples.first().ok_or(PlotError::EmptyInput("trace"))?;
    if first_measure != 0 {
        return Err(PlotError::MissingInitialSample);
    }
    if let Some(index) = samples.windows(2).position(|w| w[1].0 < w[0].0) {
        return Err(PlotError::UnorderedSamples { index: index + 1 });
    }

    let slots = usize::try_from(horizon)
        .ok()
        .and_then(|h| h.checked_add(1))
        .filter(|_| horizon <= MAX_HORIZON)
        .ok_or(PlotError::HorizonTooLarge { horizon, limit: MAX_HORIZON })?;

    let mut held = Vec::with_capacity(slots);
    let mut current = first_cost;
    let mut next = 0;
    for slot in 0..=horizon {
        while next < samples.len() && samples[next].0 <= slot {
            current = samples[next].1;
            next += 1;
        }
        held.push(current);
    }
    Ok(held)
}

/// Largest measure among the samples.
pub fn max_measure(samples: &[(u64, f64)]) -> Option<u64> {
    samples.iter().map(|&(measure, _)| measure).max()
}

/// Per-index mean, minimum and maximum over several interpolated runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub mean: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl Envelope {
    /// Combines equally long runs.
    pub fn from_runs(runs: &[Vec<f64>]) -> Result<Self> {
        let first = runs.first().ok_or(PlotError::EmptyInput("runs"))?;
        let len = first.len();
        if let Some(ragged) = runs.iter().find(|run| run.len() != len) {
            return Err(PlotError::LengthMismatch { left: len, right: ragged.len() });
        }

        let count = runs.len() as f64;
        let mut envelope = Envelope {
            mean: vec![0.0; len],
            min: vec![f64::INFINITY; len],
            max: vec![f64::NEG_INFINITY; len],
        };
        for run in runs {
            for (i, &value) in run.iter().enumerate() {
                envelope.mean[i] += value / count;
                envelope.min[i] = envelope.min[i].min(value);
                envelope.max[i] = envelope.max[i].max(value);
            }
        }
        Ok(envelope)
    }

    /// Step-holds every trace over their common horizon, then combines them.
    ///
    /// Returns the horizon along with the envelope.
    pub fn from_traces(traces: &[Vec<(u64, f64)>]) -> Result<(u64, Self)> {
        let horizon = traces
            .iter()
            .filter_map(|samples| max_measure(samples))
            .max()
            .ok_or(PlotError::EmptyInput("traces"))?;

        let held = traces
            .iter()
            .map(|samples| step_hold(samples, horizon))
            .collect::<Result<Vec<_>>>()?;
        Ok((horizon, Envelope::from_runs(&held)?))
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_last_value() {
        let held = step_hold(&[(0, 100.0), (3, 80.0), (7, 80.0)], 7).unwrap();
        assert_eq!(held, vec![100.0, 100.0, 100.0, 80.0, 80.0, 80.0, 80.0, 80.0]);
    }

    #[test]
    fn extends_to_longer_horizon() {
        let held = step_hold(&[(0, 5.0), (1, 4.0)], 3).unwrap();
        assert_eq!(held, vec![5.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn latest_duplicate_wins() {
        let held = step_hold(&[(0, 9.0), (2, 7.0), (2, 6.0)], 2).unwrap();
        assert_eq!(held, vec![9.0, 9.0, 6.0]);
    }

    #[test]
    fn requires_initial_sample() {
        assert!(matches!(step_hold(&[(1, 3.0)], 2), Err(PlotError::MissingInitialSample)));
        assert!(matches!(step_hold(&[], 2), Err(PlotError::EmptyInput(_))));
    }

    #[test]
    fn rejects_decreasing_measures() {
        assert!(matches!(
            step_hold(&[(0, 3.0), (4, 2.0), (2, 1.0)], 4),
            Err(PlotError::UnorderedSamples { index: 2 })
        ));
    }

    #[test]
    fn rejects_horizons_past_the_limit() {
        assert!(matches!(
            step_hold(&[(0, 1.0), (u64::MAX, 2.0)], u64::MAX),
            Err(PlotError::HorizonTooLarge { horizon: u64::MAX, .. })
        ));
        assert!(matches!(
            step_hold(&[(0, 1.0), (10_000_000_000, 2.0)], 10_000_000_000),
            Err(PlotError::HorizonTooLarge { .. })
        ));
        assert_eq!(step_hold(&[(0, 1.0)], MAX_HORIZON).unwrap().len(), MAX_HORIZON as usize + 1);
    }

    #[test]
    fn envelope_over_traces() {
        let traces = vec![vec![(0, 10.0), (2, 6.0)], vec![(0, 8.0), (1, 4.0)]];
        let (horizon, envelope) = Envelope::from_traces(&traces).unwrap();

        assert_eq!(horizon, 2);
        assert_eq!(envelope.mean, vec![9.0, 7.0, 5.0]);
        assert_eq!(envelope.min, vec![8.0, 4.0, 4.0]);
        assert_eq!(envelope.max, vec![10.0, 10.0, 6.0]);
    }

    #[test]
    fn envelope_rejects_ragged_runs() {
        let runs = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(Envelope::from_runs(&runs), Err(PlotError::LengthMismatch { .. })));
        assert!(Envelope::from_runs(&[]).is_err());
    }
}
