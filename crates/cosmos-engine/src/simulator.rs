//! The time-stepped universe state machine.
//!
//! [`UniverseSimulator`] owns the grid, the spatial index, the engine
//! generator, and the time counter. Each call to [`step()`] either does
//! nothing (paused), advances the dormant counter, or rebuilds the grid
//! and diffuses density.
//!
//! [`step()`]: UniverseSimulator::step

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use cosmos_core::{Cell, CellRecord, Coord, Grid};
use cosmos_space::{QuadTree, Rect};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, EngineConfig};
use crate::control::SimControl;
use crate::diffusion::diffuse;
use crate::expansion::expand;
use crate::metrics::StepMetrics;
use crate::persist::{SavedUniverse, SAVE_VERSION};
use crate::schedule::{radius_for, CosmicPhase, ExpansionSchedule};
use crate::snapshot::UniverseSnapshot;

/// Whether the big bang has happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EngineState {
    /// Counting down the dormant delay.
    PreBigBang,
    /// Expanding, collapsing, or still.
    BigBangOccurred,
}

/// What one call to [`UniverseSimulator::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Paused: nothing changed.
    Paused,
    /// Still before the big bang: only the counter advanced.
    Dormant,
    /// The big bang fired and the first expansion ran.
    BigBang,
    /// The grid grew and diffused.
    Expanded,
    /// The grid was at the ceiling: it diffused without growing.
    Frozen,
}

/// The universe simulation engine.
pub struct UniverseSimulator {
    config: EngineConfig,
    schedule: Box<dyn ExpansionSchedule>,
    control: Arc<SimControl>,
    rng: ChaCha8Rng,
    seed: u64,
    time_step: u64,
    state: EngineState,
    phase: CosmicPhase,
    grid: Arc<Grid>,
    index: Arc<QuadTree>,
    focus: Option<Coord>,
    metrics: StepMetrics,
    ceiling_reached: bool,
}

impl UniverseSimulator {
    /// A fresh universe: a single origin cell, dormant, counter at zero.
    ///
    /// Uses the configured [`PhaseSchedule`](crate::schedule::PhaseSchedule).
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        let schedule = Box::new(config.schedule.clone());
        Self::with_schedule(config, schedule)
    }

    /// A fresh universe driven by a custom schedule.
    pub fn with_schedule(
        config: EngineConfig,
        schedule: Box<dyn ExpansionSchedule>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let grid = Grid::singleton(Cell::origin(Some(seed)));
        Self::assemble(config, schedule, seed, grid, 0, EngineState::PreBigBang)
    }

    /// A fresh universe seeded with a persisted cell mapping.
    ///
    /// Counters start from zero as for [`new`](Self::new). Loaded cells
    /// carry no bodies. An empty mapping falls back to the origin cell.
    pub fn with_cells(
        config: EngineConfig,
        records: impl IntoIterator<Item = CellRecord>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let grid = loaded_grid(records, seed);
        let schedule = Box::new(config.schedule.clone());
        Self::assemble(config, schedule, seed, grid, 0, EngineState::PreBigBang)
    }

    /// Resume a saved universe: its seed, counter, state, and cells.
    ///
    /// The saved seed overrides `config.seed`. The engine generator is
    /// reseeded from the saved seed and counter, so a restored run is
    /// reproducible from the save but does not continue the saved
    /// run's random stream.
    pub fn restore(config: EngineConfig, saved: SavedUniverse) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = if saved.big_bang_occurred {
            EngineState::BigBangOccurred
        } else {
            EngineState::PreBigBang
        };
        let grid = loaded_grid(saved.cells, saved.seed);
        let schedule = Box::new(config.schedule.clone());
        let mut sim = Self::assemble(config, schedule, saved.seed, grid, saved.time_step, state)?;
        sim.rng = ChaCha8Rng::seed_from_u64(saved.seed ^ saved.time_step.rotate_left(32));
        Ok(sim)
    }

    fn assemble(
        config: EngineConfig,
        schedule: Box<dyn ExpansionSchedule>,
        seed: u64,
        grid: Grid,
        time_step: u64,
        state: EngineState,
    ) -> Result<Self, ConfigError> {
        let mut index = QuadTree::new(config.index_bounds(), config.index.capacity)?;
        let mut rejected = 0usize;
        for c in grid.coords() {
            if !index.insert(c) {
                rejected += 1;
            }
        }
        if rejected > 0 {
            log::warn!("{rejected} loaded cells fall outside the spatial index root");
        }

        let control = Arc::new(SimControl::new(
            config.speeds.clone(),
            config.default_speed,
            config.start_running,
        ));
        let mut sim = Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            schedule,
            control,
            seed,
            time_step,
            state,
            phase: CosmicPhase::Dormant,
            grid: Arc::new(grid),
            index: Arc::new(index),
            focus: None,
            metrics: StepMetrics::default(),
            ceiling_reached: false,
            config,
        };
        if state == EngineState::BigBangOccurred {
            sim.phase = sim.schedule.sample(sim.elapsed()).phase;
        }
        log::debug!(
            "universe assembled: seed {seed}, {} cells, time step {time_step}",
            sim.grid.len()
        );
        Ok(sim)
    }

    // ── Stepping ────────────────────────────────────────────────

    /// Advance one step if playing.
    pub fn step(&mut self) -> StepOutcome {
        if !self.control.is_running() {
            return StepOutcome::Paused;
        }
        let start = Instant::now();

        match self.state {
            EngineState::PreBigBang => {
                self.time_step = self.time_step.saturating_add(1);
                if self.time_step < self.config.big_bang_delay {
                    let cells = self.grid.len();
                    self.metrics = StepMetrics {
                        total_us: start.elapsed().as_micros() as u64,
                        cells_before: cells,
                        cells_after: cells,
                        ..StepMetrics::default()
                    };
                    return StepOutcome::Dormant;
                }
                self.state = EngineState::BigBangOccurred;
                log::info!("big bang at time step {}", self.time_step);
                self.expand_and_diffuse(start);
                StepOutcome::BigBang
            }
            EngineState::BigBangOccurred => {
                self.time_step = self.time_step.saturating_add(self.control.increment());
                if self.expand_and_diffuse(start) {
                    StepOutcome::Frozen
                } else {
                    StepOutcome::Expanded
                }
            }
        }
    }

    /// Time elapsed since the big bang (zero before it).
    pub fn elapsed(&self) -> u64 {
        self.time_step.saturating_sub(self.config.big_bang_delay)
    }

    /// Rebuild, index, and diffuse. Returns whether the grid was frozen.
    fn expand_and_diffuse(&mut self, start: Instant) -> bool {
        let sample = self.schedule.sample(self.elapsed());
        if sample.phase != self.phase {
            log::info!(
                "phase {} -> {} at time step {}",
                self.phase,
                sample.phase,
                self.time_step
            );
            self.phase = sample.phase;
        }
        let radius = radius_for(sample.factor, self.config.peak_radius());
        let cells_before = self.grid.len();

        let expansion = expand(
            &self.grid,
            radius,
            self.config.max_grid_span,
            &mut self.rng,
            &self.config.generation,
            Some(self.seed),
        );

        let mut index_inserts = 0;
        let mut index_rejections = 0;
        // Carried cells were indexed when first generated or loaded; only
        // new coordinates are inserted, so each enters the index once.
        if !expansion.generated.is_empty() {
            let index = Arc::make_mut(&mut self.index);
            for &c in &expansion.generated {
                if index.insert(c) {
                    index_inserts += 1;
                } else {
                    index_rejections += 1;
                    log::debug!("cell {c} lies outside the spatial index root");
                }
            }
        }
        if expansion.frozen && !self.ceiling_reached {
            self.ceiling_reached = true;
            log::info!(
                "grid reached max span {} at time step {} with {} cells",
                self.config.max_grid_span,
                self.time_step,
                cells_before
            );
        }
        let expansion_us = start.elapsed().as_micros() as u64;

        let mut grid = expansion.grid;
        let diffusion_start = Instant::now();
        let report = diffuse(&mut grid, &self.config.diffusion);
        let diffusion_us = diffusion_start.elapsed().as_micros() as u64;

        self.metrics = StepMetrics {
            total_us: start.elapsed().as_micros() as u64,
            expansion_us,
            diffusion_us,
            radius: if expansion.frozen { 0 } else { radius },
            cells_before,
            cells_after: grid.len(),
            cells_generated: expansion.generated.len(),
            index_inserts,
            index_rejections,
            density_transferred: report.transferred,
            density_dropped: report.dropped,
            frozen: expansion.frozen,
        };
        self.grid = Arc::new(grid);

        log::debug!(
            "step {}: radius {}, {} -> {} cells, dropped {:.4}",
            self.time_step,
            self.metrics.radius,
            cells_before,
            self.metrics.cells_after,
            report.dropped
        );
        expansion.frozen
    }

    // ── Controls ────────────────────────────────────────────────

    /// Allow steps to run.
    pub fn play(&self) {
        self.control.play();
    }

    /// Stop the next step from starting.
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Select a speed level. Unknown levels are ignored and return `false`.
    pub fn set_speed(&self, level: u8) -> bool {
        self.control.set_speed(level)
    }

    /// Point the cell view at `c`.
    pub fn open_cell_view(&mut self, c: Coord) {
        self.focus = Some(c);
    }

    /// Clear the cell view.
    pub fn close_cell_view(&mut self) {
        self.focus = None;
    }

    /// The shared controls.
    pub fn control(&self) -> &Arc<SimControl> {
        &self.control
    }

    // ── Read surface ────────────────────────────────────────────

    /// Whether steps are allowed to run.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Selected speed level.
    pub fn speed(&self) -> u8 {
        self.control.speed()
    }

    /// Current time counter.
    pub fn time_step(&self) -> u64 {
        self.time_step
    }

    /// Big-bang state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Whether the big bang has happened.
    pub fn big_bang_occurred(&self) -> bool {
        self.state == EngineState::BigBangOccurred
    }

    /// Phase of the most recent expanding step.
    pub fn phase(&self) -> CosmicPhase {
        self.phase
    }

    /// The universe seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The current grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current spatial index.
    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// The focus pointer, if a cell view is open.
    pub fn focus(&self) -> Option<Coord> {
        self.focus
    }

    /// The focused cell, if the pointer resolves in the current grid.
    pub fn focused_cell(&self) -> Option<&Cell> {
        self.focus.and_then(|c| self.grid.get(c))
    }

    /// Indexed coordinates inside `range`.
    pub fn query_region(&self, range: &Rect) -> Vec<Coord> {
        self.index.query(range)
    }

    /// Metrics of the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.metrics
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// An immutable view sharing the current grid and index.
    pub fn snapshot(&self) -> UniverseSnapshot {
        UniverseSnapshot {
            time_step: self.time_step,
            state: self.state,
            phase: self.phase,
            speed: self.control.speed(),
            running: self.control.is_running(),
            focused: self.focus,
            grid: Arc::clone(&self.grid),
            index: Arc::clone(&self.index),
            metrics: self.metrics.clone(),
        }
    }

    /// The persistable state: seed, counters, and cell scalars.
    pub fn save(&self) -> SavedUniverse {
        SavedUniverse {
            version: SAVE_VERSION,
            seed: self.seed,
            time_step: self.time_step,
            big_bang_occurred: self.big_bang_occurred(),
            cells: self.grid.records(),
        }
    }
}

impl fmt::Debug for UniverseSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniverseSimulator")
            .field("seed", &self.seed)
            .field("time_step", &self.time_step)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .field("cells", &self.grid.len())
            .field("indexed", &self.index.len())
            .field("running", &self.control.is_running())
            .field("speed", &self.control.speed())
            .field("focus", &self.focus)
            .finish()
    }
}

fn loaded_grid(records: impl IntoIterator<Item = CellRecord>, seed: u64) -> Grid {
    let grid = Grid::from_records(records);
    if grid.is_empty() {
        log::warn!("persisted mapping is empty; starting from the origin cell");
        return Grid::singleton(Cell::origin(Some(seed)));
    }
    grid
}
