use crate::style::JitterSettings;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded uniform displacement for scatter points.
///
/// The same settings always produce the same offsets, so rendered scatter
/// plots are reproducible.
pub struct Jitter {
    rng: StdRng,
    x_spread: f64,
    y_spread: f64,
}

impl Jitter {
    pub fn new(settings: &JitterSettings) -> Self {
        Jitter {
            rng: StdRng::seed_from_u64(settings.seed),
            x_spread: settings.x.abs(),
            y_spread: settings.y.abs(),
        }
    }

    pub fn apply(&mut self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(x, y)| {
                let dx = self.rng.gen_range(-self.x_spread..=self.x_spread);
                let dy = self.rng.gen_range(-self.y_spread..=self.y_spread);
                (x + dx, y + dy)
            })
            .collect()
    }
}
