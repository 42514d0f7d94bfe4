//! Immutable views of the universe published to observers.

use std::sync::Arc;

use cosmos_core::{Cell, Coord, Grid};
use cosmos_space::{QuadTree, Rect};

use crate::metrics::StepMetrics;
use crate::schedule::CosmicPhase;
use crate::simulator::EngineState;

/// Everything a renderer needs from one step.
///
/// The grid and index are shared with the simulator through `Arc`, so a
/// snapshot is cheap to take and is never observed half-written.
#[derive(Clone, Debug)]
pub struct UniverseSnapshot {
    /// Time counter after the step.
    pub time_step: u64,
    /// Big-bang state.
    pub state: EngineState,
    /// Phase the step fell in.
    pub phase: CosmicPhase,
    /// Selected speed level.
    pub speed: u8,
    /// Whether the simulator was playing.
    pub running: bool,
    /// The focus pointer, if a cell view is open.
    pub focused: Option<Coord>,
    /// The grid after the step.
    pub grid: Arc<Grid>,
    /// The spatial index after the step.
    pub index: Arc<QuadTree>,
    /// Metrics of the step.
    pub metrics: StepMetrics,
}

impl UniverseSnapshot {
    /// The focused cell, if the pointer resolves in this grid.
    pub fn focused_cell(&self) -> Option<&Cell> {
        self.focused.and_then(|c| self.grid.get(c))
    }

    /// Indexed coordinates inside `range`.
    pub fn query_region(&self, range: &Rect) -> Vec<Coord> {
        self.index.query(range)
    }

    /// Cells inside `range`, found through the index.
    pub fn cells_in(&self, range: &Rect) -> Vec<&Cell> {
        self.index
            .query(range)
            .into_iter()
            .filter_map(|c| self.grid.get(c))
            .collect()
    }
}
