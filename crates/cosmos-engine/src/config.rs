//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the input for constructing a simulator. Every field
//! has a default, so a partial JSON document (or `{}`) is a complete
//! configuration. [`validate()`](EngineConfig::validate) checks structural
//! invariants at startup.

use std::error::Error;
use std::fmt;

use cosmos_space::{IndexError, Rect};
use serde::{Deserialize, Serialize};

use crate::diffusion::DiffusionConfig;
use crate::generation::GenerationConfig;
use crate::schedule::PhaseSchedule;
use crate::speed::SpeedTable;

// ── IndexConfig ────────────────────────────────────────────────────

/// Spatial index parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Maximum points per quadtree node. Default: 4.
    pub capacity: usize,
    /// Root boundary. `None` = a square centred on the origin with side
    /// `4 * max_grid_span`.
    pub bounds: Option<Rect>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            capacity: 4,
            bounds: None,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`EngineConfig::validate()`] or while starting
/// the engine.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// `max_grid_span` is below the minimum of 2.
    GridSpanTooSmall {
        /// The configured span.
        configured: u32,
    },
    /// The phase schedule is malformed.
    InvalidSchedule {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The speed table is malformed.
    InvalidSpeedTable {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// `default_speed` is not a level in the speed table.
    UnknownDefaultSpeed {
        /// The configured level.
        level: u8,
    },
    /// Diffusion parameters are out of range.
    InvalidDiffusion {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// Generation parameters are out of range.
    InvalidGeneration {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// Stepper timing would overflow or never wake.
    InvalidTiming {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// The spatial index could not be built.
    Index(IndexError),
    /// A JSON configuration document could not be parsed.
    Parse {
        /// Parser message.
        reason: String,
    },
    /// The background stepper thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridSpanTooSmall { configured } => {
                write!(f, "max_grid_span {configured} is below minimum of 2")
            }
            Self::InvalidSchedule { reason } => write!(f, "invalid schedule: {reason}"),
            Self::InvalidSpeedTable { reason } => write!(f, "invalid speed table: {reason}"),
            Self::UnknownDefaultSpeed { level } => {
                write!(f, "default_speed {level} is not in the speed table")
            }
            Self::InvalidDiffusion { reason } => write!(f, "invalid diffusion: {reason}"),
            Self::InvalidGeneration { reason } => write!(f, "invalid generation: {reason}"),
            Self::InvalidTiming { reason } => write!(f, "invalid timing: {reason}"),
            Self::Index(e) => write!(f, "index: {e}"),
            Self::Parse { reason } => write!(f, "config parse error: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Index(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IndexError> for ConfigError {
    fn from(e: IndexError) -> Self {
        Self::Index(e)
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for constructing a universe simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Universe seed. `None` = drawn from OS entropy once at construction.
    pub seed: Option<u64>,
    /// Dormant steps before the big bang. Default: 50. Zero is valid.
    pub big_bang_delay: u64,
    /// Span at which the grid stops gaining coordinates. Default: 250.
    pub max_grid_span: u32,
    /// Spatial index parameters.
    pub index: IndexConfig,
    /// Expansion-rate schedule.
    pub schedule: PhaseSchedule,
    /// Diffusion parameters.
    pub diffusion: DiffusionConfig,
    /// New-cell generation parameters.
    pub generation: GenerationConfig,
    /// Selectable speed levels.
    pub speeds: SpeedTable,
    /// Speed level selected at start. Default: 1.
    pub default_speed: u8,
    /// Milliseconds per unit of delay factor in the realtime stepper. Default: 50.
    pub tick_base_ms: u64,
    /// Poll interval of a paused realtime stepper, in milliseconds. Default: 10.
    pub idle_poll_ms: u64,
    /// Whether the simulator starts playing. Default: false.
    pub start_running: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            big_bang_delay: 50,
            max_grid_span: 250,
            index: IndexConfig::default(),
            schedule: PhaseSchedule::default(),
            diffusion: DiffusionConfig::default(),
            generation: GenerationConfig::default(),
            speeds: SpeedTable::default(),
            default_speed: 1,
            tick_base_ms: 50,
            idle_poll_ms: 10,
            start_running: false,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Half the maximum span: the growth radius at factor 1.0.
    pub fn peak_radius(&self) -> u32 {
        self.max_grid_span / 2
    }

    /// The index root: the configured bounds, or the default square.
    pub fn index_bounds(&self) -> Rect {
        self.index
            .bounds
            .unwrap_or_else(|| Rect::centred(0.0, 0.0, 4.0 * f64::from(self.max_grid_span)))
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Span >= 2, so the peak radius is at least 1.
        if self.max_grid_span < 2 {
            return Err(ConfigError::GridSpanTooSmall {
                configured: self.max_grid_span,
            });
        }
        // 2. Index capacity and root boundary.
        if self.index.capacity == 0 {
            return Err(ConfigError::Index(IndexError::ZeroCapacity));
        }
        self.index_bounds()
            .validate()
            .map_err(|reason| ConfigError::Index(IndexError::InvalidBoundary { reason }))?;
        // 3. Schedule, diffusion, generation.
        self.schedule
            .validate()
            .map_err(|reason| ConfigError::InvalidSchedule { reason })?;
        self.diffusion
            .validate()
            .map_err(|reason| ConfigError::InvalidDiffusion { reason })?;
        self.generation
            .validate()
            .map_err(|reason| ConfigError::InvalidGeneration { reason })?;
        // 4. Speed table and the starting level.
        self.speeds
            .validate()
            .map_err(|reason| ConfigError::InvalidSpeedTable { reason })?;
        if !self.speeds.contains(self.default_speed) {
            return Err(ConfigError::UnknownDefaultSpeed {
                level: self.default_speed,
            });
        }
        // 5. Stepper timing. The longest sleep must fit in a Duration.
        if self.idle_poll_ms == 0 {
            return Err(ConfigError::InvalidTiming {
                reason: "idle_poll_ms must be at least 1".to_string(),
            });
        }
        for l in self.speeds.levels() {
            let secs = l.delay_factor * self.tick_base_ms as f64 / 1000.0;
            if !secs.is_finite() || secs > u32::MAX as f64 {
                return Err(ConfigError::InvalidTiming {
                    reason: format!(
                        "level {} sleeps {secs}s per step with tick_base_ms {}",
                        l.level, self.tick_base_ms
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diffusion::DiffusionEdge;

    #[test]
    fn validate_default_config_succeeds() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn small_span_fails() {
        let cfg = EngineConfig {
            max_grid_span: 1,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::GridSpanTooSmall { configured: 1 }) => {}
            other => panic!("expected GridSpanTooSmall, got {other:?}"),
        }
    }

    #[test]
    fn zero_capacity_fails() {
        let mut cfg = EngineConfig::default();
        cfg.index.capacity = 0;
        match cfg.validate() {
            Err(ConfigError::Index(IndexError::ZeroCapacity)) => {}
            other => panic!("expected Index(ZeroCapacity), got {other:?}"),
        }
    }

    #[test]
    fn degenerate_bounds_fail() {
        let mut cfg = EngineConfig::default();
        cfg.index.bounds = Some(Rect::new(0.0, 0.0, 0.0, 10.0));
        match cfg.validate() {
            Err(ConfigError::Index(IndexError::InvalidBoundary { .. })) => {}
            other => panic!("expected Index(InvalidBoundary), got {other:?}"),
        }
    }

    #[test]
    fn unknown_default_speed_fails() {
        let cfg = EngineConfig {
            default_speed: 7,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::UnknownDefaultSpeed { level: 7 }) => {}
            other => panic!("expected UnknownDefaultSpeed, got {other:?}"),
        }
    }

    #[test]
    fn bad_diffusion_rate_fails() {
        let mut cfg = EngineConfig::default();
        cfg.diffusion.rate = -0.1;
        match cfg.validate() {
            Err(ConfigError::InvalidDiffusion { .. }) => {}
            other => panic!("expected InvalidDiffusion, got {other:?}"),
        }
    }

    #[test]
    fn zero_idle_poll_fails() {
        let cfg = EngineConfig {
            idle_poll_ms: 0,
            ..EngineConfig::default()
        };
        match cfg.validate() {
            Err(ConfigError::InvalidTiming { .. }) => {}
            other => panic!("expected InvalidTiming, got {other:?}"),
        }
    }

    #[test]
    fn zero_big_bang_delay_is_valid() {
        let cfg = EngineConfig {
            big_bang_delay: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn default_index_bounds_cover_four_spans() {
        let r = EngineConfig::default().index_bounds();
        assert_eq!(r, Rect::new(-500.0, -500.0, 1000.0, 1000.0));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(
            r#"{ "seed": 7, "big_bang_delay": 3, "diffusion": { "edge": "Absorb" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.big_bang_delay, 3);
        assert_eq!(cfg.diffusion.edge, DiffusionEdge::Absorb);
        assert_eq!(cfg.diffusion.rate, 0.1);
        assert_eq!(cfg.max_grid_span, 250);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        match EngineConfig::from_json_str("{ \"seed\": ") {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = EngineConfig {
            seed: Some(99),
            ..EngineConfig::default()
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), cfg);
    }
}
