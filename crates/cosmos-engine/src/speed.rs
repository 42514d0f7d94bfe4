//! The enumerated speed levels and their delay factors.
//!
//! A speed level selects a delay factor. The realtime stepper sleeps
//! `delay_factor * tick_base` between steps, and each post-big-bang step
//! advances the time counter by `max(1, trunc(delay_factor))`.

use serde::{Deserialize, Serialize};

/// One selectable speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedLevel {
    /// The level a caller selects.
    pub level: u8,
    /// Delay multiplier for this level.
    pub delay_factor: f64,
}

/// The fixed set of selectable speeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeedTable {
    levels: Vec<SpeedLevel>,
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self::new(
            [(1, 5.0), (2, 2.5), (3, 1.0), (4, 0.5), (5, 0.25), (6, 0.1)]
                .into_iter()
                .map(|(level, delay_factor)| SpeedLevel {
                    level,
                    delay_factor,
                }),
        )
    }
}

impl SpeedTable {
    /// Build a table from levels. Call [`validate`](Self::validate) before use.
    pub fn new(levels: impl IntoIterator<Item = SpeedLevel>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    /// Delay factor for `level`, or `None` if the level is not in the table.
    pub fn delay_factor(&self, level: u8) -> Option<f64> {
        self.levels
            .iter()
            .find(|l| l.level == level)
            .map(|l| l.delay_factor)
    }

    /// Whether `level` is selectable.
    pub fn contains(&self, level: u8) -> bool {
        self.delay_factor(level).is_some()
    }

    /// Time-counter increment for `level`: `max(1, trunc(delay_factor))`.
    pub fn increment(&self, level: u8) -> Option<u64> {
        self.delay_factor(level).map(increment_for)
    }

    /// All levels in table order.
    pub fn levels(&self) -> &[SpeedLevel] {
        &self.levels
    }

    /// Check that the table is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("speed table is empty".to_string());
        }
        for (i, l) in self.levels.iter().enumerate() {
            if !l.delay_factor.is_finite() || l.delay_factor <= 0.0 {
                return Err(format!(
                    "level {} delay_factor must be finite and positive, got {}",
                    l.level, l.delay_factor
                ));
            }
            if self.levels[..i].iter().any(|p| p.level == l.level) {
                return Err(format!("level {} listed twice", l.level));
            }
        }
        Ok(())
    }
}

/// `max(1, trunc(delay_factor))`.
pub fn increment_for(delay_factor: f64) -> u64 {
    // Saturating float-to-int cast; validated factors are finite.
    (delay_factor.trunc() as u64).max(1)
}
