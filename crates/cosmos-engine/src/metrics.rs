//! Per-step metrics for the universe simulator.
//!
//! [`StepMetrics`] captures timing and growth data for a single step.
//! The simulator overwrites it after every call to `step()`; snapshots
//! carry a copy for observers.

/// Timing, growth, and diffusion totals collected during a single step.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step, in microseconds.
    pub total_us: u64,
    /// Time spent rebuilding the grid and indexing new cells, in microseconds.
    pub expansion_us: u64,
    /// Time spent in the diffusion pass, in microseconds.
    pub diffusion_us: u64,
    /// Growth radius applied this step (0 when no expansion ran).
    pub radius: u32,
    /// Cells before the step.
    pub cells_before: usize,
    /// Cells after the step.
    pub cells_after: usize,
    /// Cells materialised at new coordinates.
    pub cells_generated: usize,
    /// New coordinates accepted by the spatial index.
    pub index_inserts: usize,
    /// New coordinates outside the index root.
    pub index_rejections: usize,
    /// Density moved between existing cells.
    pub density_transferred: f64,
    /// Density lost across the grid edge.
    pub density_dropped: f64,
    /// Whether the grid was at the ceiling.
    pub frozen: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.expansion_us, 0);
        assert_eq!(m.diffusion_us, 0);
        assert_eq!(m.radius, 0);
        assert_eq!(m.cells_before, 0);
        assert_eq!(m.cells_after, 0);
        assert_eq!(m.cells_generated, 0);
        assert_eq!(m.index_inserts, 0);
        assert_eq!(m.index_rejections, 0);
        assert_eq!(m.density_transferred, 0.0);
        assert_eq!(m.density_dropped, 0.0);
        assert!(!m.frozen);
    }
}
