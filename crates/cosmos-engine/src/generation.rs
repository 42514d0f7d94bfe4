//! Scalar state for cells materialised by expansion.

use cosmos_core::{Cell, Coord};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How new cells derive their density and temperature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Half-width of the uniform perturbation around the neighbour mean,
    /// as a fraction of that mean. Default: 0.1.
    pub jitter: f64,
    /// Lower bound of the isolated-cell baseline. Default: 0.1.
    pub baseline_min: f64,
    /// Upper bound (inclusive) of the isolated-cell baseline. Default: 1.0.
    pub baseline_max: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            jitter: 0.1,
            baseline_min: 0.1,
            baseline_max: 1.0,
        }
    }
}

impl GenerationConfig {
    /// Check that jitter and baseline are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.jitter.is_finite() || self.jitter < 0.0 {
            return Err(format!(
                "jitter must be finite and non-negative, got {}",
                self.jitter
            ));
        }
        if !self.baseline_min.is_finite()
            || !self.baseline_max.is_finite()
            || self.baseline_min > self.baseline_max
        {
            return Err(format!(
                "baseline range [{}, {}] is not a finite, ordered interval",
                self.baseline_min, self.baseline_max
            ));
        }
        Ok(())
    }
}

/// `mean` perturbed by a uniform offset in `±|mean * fraction|`.
fn jittered<R: Rng>(mean: f64, fraction: f64, rng: &mut R) -> f64 {
    let span = (mean * fraction).abs();
    mean + span * (rng.gen::<f64>() * 2.0 - 1.0)
}

/// Build the cell for a newly reached coordinate.
///
/// With at least one neighbour (taken from the previous grid), density and
/// temperature are the neighbour means, each jittered independently,
/// density first. With no neighbours both are drawn from the baseline
/// range, density first. `body_seed` is forwarded to [`Cell::new`].
pub fn generate_from_neighbours<R: Rng>(
    neighbours: &[&Cell],
    at: Coord,
    rng: &mut R,
    config: &GenerationConfig,
    body_seed: Option<u64>,
) -> Cell {
    let (density, temperature) = if neighbours.is_empty() {
        let range = config.baseline_min..=config.baseline_max;
        let d = rng.gen_range(range.clone());
        let t = rng.gen_range(range);
        (d, t)
    } else {
        let n = neighbours.len() as f64;
        let mean_d = neighbours.iter().map(|c| c.density).sum::<f64>() / n;
        let mean_t = neighbours.iter().map(|c| c.temperature).sum::<f64>() / n;
        let d = jittered(mean_d, config.jitter, rng);
        let t = jittered(mean_t, config.jitter, rng);
        (d, t)
    };
    Cell::new(at, density, temperature, body_seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(9)
    }

    #[test]
    fn isolated_cells_use_baseline() {
        let cfg = GenerationConfig::default();
        let mut r = rng();
        for i in 0..500 {
            let c = generate_from_neighbours(&[], Coord::new(i, 0), &mut r, &cfg, None);
            assert!((0.1..=1.0).contains(&c.density));
            assert!((0.1..=1.0).contains(&c.temperature));
            assert!(c.bodies().is_empty());
        }
    }

    #[test]
    fn neighbours_set_the_mean() {
        let a = Cell::plain(Coord::new(0, 0), 10.0, 10_000.0);
        let b = Cell::plain(Coord::new(2, 0), 2.0, 2_000.0);
        let cfg = GenerationConfig::default();
        let mut r = rng();
        for _ in 0..500 {
            let c = generate_from_neighbours(&[&a, &b], Coord::new(1, 0), &mut r, &cfg, None);
            assert!((5.4..=6.6).contains(&c.density), "density {}", c.density);
            assert!(
                (5_400.0..=6_600.0).contains(&c.temperature),
                "temperature {}",
                c.temperature
            );
        }
    }

    #[test]
    fn zero_jitter_is_exact_mean() {
        let a = Cell::plain(Coord::new(0, 1), 3.0, 30.0);
        let cfg = GenerationConfig {
            jitter: 0.0,
            ..GenerationConfig::default()
        };
        let c = generate_from_neighbours(&[&a], Coord::ORIGIN, &mut rng(), &cfg, None);
        assert_eq!(c.density, 3.0);
        assert_eq!(c.temperature, 30.0);
    }

    #[test]
    fn negative_means_do_not_panic() {
        let a = Cell::plain(Coord::new(0, 1), -3.0, -30.0);
        let cfg = GenerationConfig::default();
        let c = generate_from_neighbours(&[&a], Coord::ORIGIN, &mut rng(), &cfg, None);
        assert!((-3.3..=-2.7).contains(&c.density));
    }

    #[test]
    fn same_stream_same_cells() {
        let cfg = GenerationConfig::default();
        let n = Cell::plain(Coord::new(1, 1), 4.0, 500.0);
        let a = generate_from_neighbours(&[&n], Coord::new(1, 2), &mut rng(), &cfg, Some(3));
        let b = generate_from_neighbours(&[&n], Coord::new(1, 2), &mut rng(), &cfg, Some(3));
        assert_eq!(a, b);
    }

    #[test]
    fn validate_rejects_inverted_baseline() {
        let cfg = GenerationConfig {
            baseline_min: 2.0,
            baseline_max: 1.0,
            ..GenerationConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = GenerationConfig {
            jitter: f64::NAN,
            ..GenerationConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
