//! Density diffusion over the 4-connected neighbourhood.
//!
//! Cells are visited once each in traversal order. A visited cell with
//! positive density sends `rate * d` to every neighbour direction, where
//! `d` is the density it holds when its turn comes. Cells visited later
//! therefore see transfers made earlier in the same pass. Temperature is
//! not diffused.
//!
//! A neighbour direction that leaves the `i32` range counts as a missing
//! neighbour.

use cosmos_core::{Grid, NEIGHBOUR_OFFSETS};
use serde::{Deserialize, Serialize};

/// What happens to a share addressed to a coordinate with no cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiffusionEdge {
    /// The share stays with the source. Only existing neighbours take
    /// part, so total density is conserved.
    #[default]
    Retain,
    /// The share leaves the source and is lost. Total density falls by
    /// exactly [`DiffusionReport::dropped`].
    Absorb,
}

/// Diffusion parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionConfig {
    /// Fraction of a cell's density sent to each neighbour. Default: 0.1.
    pub rate: f64,
    /// Handling of missing neighbours. Default: [`DiffusionEdge::Retain`].
    pub edge: DiffusionEdge,
}

impl Default for DiffusionConfig {
    fn default() -> Self {
        Self {
            rate: 0.1,
            edge: DiffusionEdge::Retain,
        }
    }
}

impl DiffusionConfig {
    /// The rate must lie in `[0, 0.25]` so a visited cell never sends
    /// more than it holds.
    pub fn validate(&self) -> Result<(), String> {
        if !self.rate.is_finite() || !(0.0..=0.25).contains(&self.rate) {
            return Err(format!("rate must be in [0, 0.25], got {}", self.rate));
        }
        Ok(())
    }
}

/// Totals from one diffusion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DiffusionReport {
    /// Number of shares delivered to an existing neighbour.
    pub transfers: u64,
    /// Density delivered to existing neighbours.
    pub transferred: f64,
    /// Density addressed to missing neighbours and lost.
    pub dropped: f64,
}

/// Run one diffusion pass over `grid` in place.
pub fn diffuse(grid: &mut Grid, config: &DiffusionConfig) -> DiffusionReport {
    let mut report = DiffusionReport::default();
    for i in 0..grid.len() {
        let Some(cell) = grid.get_index(i) else {
            continue;
        };
        let total = cell.density;
        // Also skips NaN.
        if !(total > 0.0) {
            continue;
        }
        let at = cell.coord();
        let share = total * config.rate;
        let mut remaining = total;

        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let target = match at.checked_offset(dx, dy) {
                Some(n) => grid.get_mut(n),
                None => None,
            };
            match target {
                Some(target) => {
                    target.density += share;
                    remaining -= share;
                    report.transfers += 1;
                    report.transferred += share;
                }
                None => {
                    if config.edge == DiffusionEdge::Absorb {
                        remaining -= share;
                        report.dropped += share;
                    }
                }
            }
        }

        if let Some(cell) = grid.get_index_mut(i) {
            cell.density = remaining;
        }
    }
    report
}
