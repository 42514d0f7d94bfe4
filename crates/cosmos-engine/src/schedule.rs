//! Phase schedules mapping elapsed time to an expansion rate.
//!
//! After the big bang the engine samples its [`ExpansionSchedule`] with
//! the time elapsed since the bang. The sampled factor in `[0, 1]` scales
//! the peak radius (`max_grid_span / 2`) into the per-step growth radius.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of the universe's life a time step falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CosmicPhase {
    /// Before the big bang.
    Dormant,
    /// Growing, inside the indexed milestone.
    Expansion {
        /// Index into the schedule's milestones.
        milestone: usize,
    },
    /// Growth rate falling towards the floor.
    Collapse,
    /// Growth rate held at the floor.
    PostCollapse,
}

impl fmt::Display for CosmicPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dormant => write!(f, "dormant"),
            Self::Expansion { milestone } => write!(f, "expansion (milestone {milestone})"),
            Self::Collapse => write!(f, "collapse"),
            Self::PostCollapse => write!(f, "post-collapse"),
        }
    }
}

/// One schedule sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateSample {
    /// Phase the sampled time falls in.
    pub phase: CosmicPhase,
    /// Fraction of the peak radius, in `[0, 1]`.
    pub factor: f64,
}

/// Maps time elapsed since the big bang to an expansion rate.
pub trait ExpansionSchedule: Send {
    /// Sample the schedule `elapsed` time units after the big bang.
    fn sample(&self, elapsed: u64) -> RateSample;
}

/// Per-step growth radius: `max(1, floor(peak_radius * factor))`.
///
/// The factor is clamped to `[0, 1]`, so the radius never exceeds the peak.
pub fn radius_for(factor: f64, peak_radius: u32) -> u32 {
    let scaled = (f64::from(peak_radius) * factor.clamp(0.0, 1.0)).floor();
    // NaN casts to 0.
    (scaled as u32).max(1)
}

// ── PhaseSchedule ──────────────────────────────────────────────────

/// A linear segment of the expansion phase.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Where the segment ends, as a fraction of the expansion duration.
    pub end: f64,
    /// Factor at the segment start.
    pub from: f64,
    /// Factor at the segment end.
    pub to: f64,
}

/// The default three-part schedule: milestone ramps, a linear collapse,
/// then a constant floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSchedule {
    /// Length of the expansion phase, in time units.
    pub expansion_duration: u64,
    /// Length of the collapse phase, in time units.
    pub collapse_duration: u64,
    /// Expansion segments in order. The last one must end at `1.0`.
    pub milestones: Vec<Milestone>,
    /// Factor after the collapse ends.
    pub floor_factor: f64,
}

impl Default for PhaseSchedule {
    fn default() -> Self {
        Self {
            expansion_duration: 15_000,
            collapse_duration: 15_000,
            milestones: vec![
                Milestone { end: 0.25, from: 0.0, to: 0.25 },
                Milestone { end: 0.50, from: 0.25, to: 0.50 },
                Milestone { end: 0.75, from: 0.50, to: 0.75 },
                Milestone { end: 1.00, from: 0.75, to: 1.00 },
            ],
            floor_factor: 0.0,
        }
    }
}

impl PhaseSchedule {
    fn peak_factor(&self) -> f64 {
        self.milestones.last().map_or(1.0, |m| m.to)
    }

    /// Check milestone ordering and factor ranges.
    pub fn validate(&self) -> Result<(), String> {
        let in_unit = |v: f64| v.is_finite() && (0.0..=1.0).contains(&v);
        if self.milestones.is_empty() {
            return Err("at least one milestone is required".to_string());
        }
        let mut prev_end = 0.0;
        for (i, m) in self.milestones.iter().enumerate() {
            if !m.end.is_finite() || m.end <= prev_end || m.end > 1.0 {
                return Err(format!(
                    "milestone {i} end {} must be in ({prev_end}, 1.0]",
                    m.end
                ));
            }
            if !in_unit(m.from) || !in_unit(m.to) {
                return Err(format!(
                    "milestone {i} factors must be in [0, 1], got {} -> {}",
                    m.from, m.to
                ));
            }
            prev_end = m.end;
        }
        if prev_end != 1.0 {
            return Err(format!("last milestone must end at 1.0, got {prev_end}"));
        }
        if !in_unit(self.floor_factor) {
            return Err(format!(
                "floor_factor must be in [0, 1], got {}",
                self.floor_factor
            ));
        }
        Ok(())
    }
}

impl ExpansionSchedule for PhaseSchedule {
    fn sample(&self, elapsed: u64) -> RateSample {
        if elapsed < self.expansion_duration {
            let t = elapsed as f64 / self.expansion_duration as f64;
            let mut start = 0.0;
            for (i, m) in self.milestones.iter().enumerate() {
                if t < m.end {
                    let local = (t - start) / (m.end - start);
                    return RateSample {
                        phase: CosmicPhase::Expansion { milestone: i },
                        factor: m.from + (m.to - m.from) * local,
                    };
                }
                start = m.end;
            }
            // Only reachable for unvalidated milestone lists.
            return RateSample {
                phase: CosmicPhase::Expansion {
                    milestone: self.milestones.len().saturating_sub(1),
                },
                factor: self.peak_factor(),
            };
        }

        let into_collapse = elapsed - self.expansion_duration;
        if into_collapse < self.collapse_duration {
            let t = into_collapse as f64 / self.collapse_duration as f64;
            let peak = self.peak_factor();
            return RateSample {
                phase: CosmicPhase::Collapse,
                factor: peak + (self.floor_factor - peak) * t,
            };
        }

        RateSample {
            phase: CosmicPhase::PostCollapse,
            factor: self.floor_factor,
        }
    }
}

// ── ConstantSchedule ───────────────────────────────────────────────

/// A schedule that never changes: always the first expansion milestone
/// at a fixed factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantSchedule {
    /// The factor returned for every sample.
    pub factor: f64,
}

impl ExpansionSchedule for ConstantSchedule {
    fn sample(&self, _elapsed: u64) -> RateSample {
        RateSample {
            phase: CosmicPhase::Expansion { milestone: 0 },
            factor: self.factor,
        }
    }
}
