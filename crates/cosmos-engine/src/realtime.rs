//! Background stepping on a dedicated thread.
//!
//! [`RealtimeUniverse`] moves a [`UniverseSimulator`] onto a named thread
//! that steps it at the selected speed and publishes a snapshot after
//! every step.
//!
//! ```text
//! Controlling thread               Stepper thread (cosmos-step)
//!     |                                 |
//!     |--play/pause/set_speed---------->| SimControl atomics
//!     |--open/close_cell_view---------->| cmd_rx.try_recv()
//!     |   [cmd_tx: bounded(16)]         | sim.step()
//!     |                                 | slot.publish(snapshot)
//!     |<--latest_snapshot()-------------| park(delay * tick_base)
//!     |                                 |
//!     |--shutdown()-------------------->| flag, unpark, join
//!     |<--UniverseSimulator-------------|
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cosmos_core::Coord;
use cosmos_space::Rect;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::config::{ConfigError, EngineConfig};
use crate::control::SimControl;
use crate::publish::SnapshotSlot;
use crate::simulator::{StepOutcome, UniverseSimulator};
use crate::snapshot::UniverseSnapshot;

/// Capacity of the focus command channel.
const COMMAND_CAPACITY: usize = 16;

/// Focus changes sent to the stepper thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepperCommand {
    /// Point the cell view at a coordinate.
    OpenCellView(Coord),
    /// Clear the cell view.
    CloseCellView,
}

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`RealtimeUniverse::shutdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Time spent shutting down, in milliseconds.
    pub total_ms: u64,
    /// Whether the stepper thread was joined and the simulator recovered.
    pub stepper_joined: bool,
    /// Snapshots published over the stepper's lifetime.
    pub snapshots_published: u64,
}

// ── Stepper loop ─────────────────────────────────────────────────

struct StepperLoop {
    sim: UniverseSimulator,
    slot: Arc<SnapshotSlot>,
    control: Arc<SimControl>,
    cmd_rx: Receiver<StepperCommand>,
    stopped: Arc<AtomicBool>,
    tick_base: Duration,
    idle_poll: Duration,
}

impl StepperLoop {
    /// Main loop. Runs until shutdown is requested, then hands the
    /// simulator back through the join handle.
    fn run(mut self) -> UniverseSimulator {
        log::info!("stepper started at time step {}", self.sim.time_step());
        let mut was_running = self.control.is_running();
        loop {
            if self.control.is_shutdown_requested() {
                break;
            }

            let focus_changed = self.drain_commands();

            if self.control.is_running() {
                was_running = true;
                let step_start = Instant::now();
                let stepped = self.sim.step() != StepOutcome::Paused;
                if stepped || focus_changed {
                    self.slot.publish(self.sim.snapshot());
                }
                let budget = self.tick_base.mul_f64(self.control.delay_factor());
                if let Some(remaining) = budget.checked_sub(step_start.elapsed()) {
                    // park_timeout so shutdown() can wake us early.
                    thread::park_timeout(remaining);
                }
            } else {
                // Republish once on pause so readers see the flag drop.
                if focus_changed || was_running {
                    self.slot.publish(self.sim.snapshot());
                }
                was_running = false;
                thread::park_timeout(self.idle_poll);
            }
        }
        log::info!("stepper stopped at time step {}", self.sim.time_step());
        self.stopped.store(true, Ordering::Release);
        self.sim
    }

    fn drain_commands(&mut self) -> bool {
        let mut changed = false;
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            match cmd {
                StepperCommand::OpenCellView(c) => self.sim.open_cell_view(c),
                StepperCommand::CloseCellView => self.sim.close_cell_view(),
            }
            changed = true;
        }
        changed
    }
}

// ── RealtimeUniverse ─────────────────────────────────────────────

/// A universe stepping itself on a background thread.
///
/// Controls take effect through shared atomics and never block. Readers
/// take `Arc` snapshots from a shared slot, so a complete grid is always
/// observed. Dropping the handle shuts the stepper down.
pub struct RealtimeUniverse {
    slot: Arc<SnapshotSlot>,
    control: Arc<SimControl>,
    cmd_tx: Option<Sender<StepperCommand>>,
    stopped: Arc<AtomicBool>,
    stepper: Option<JoinHandle<UniverseSimulator>>,
    recovered: Option<UniverseSimulator>,
}

impl RealtimeUniverse {
    /// Build a simulator from `config` and start stepping it.
    pub fn spawn(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::start(UniverseSimulator::new(config)?)
    }

    /// Move `sim` onto a new stepper thread.
    ///
    /// The slot is seeded with the simulator's current snapshot, so
    /// [`latest_snapshot`](Self::latest_snapshot) is never `None` while
    /// the stepper runs.
    pub fn start(sim: UniverseSimulator) -> Result<Self, ConfigError> {
        let cfg = sim.config();
        let slot = Arc::new(SnapshotSlot::new());
        let tick_base = Duration::from_millis(cfg.tick_base_ms);
        let idle_poll = Duration::from_millis(cfg.idle_poll_ms);
        slot.publish(sim.snapshot());

        let control = Arc::clone(sim.control());
        control.clear_shutdown();
        let stopped = Arc::new(AtomicBool::new(false));
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded(COMMAND_CAPACITY);

        let state = StepperLoop {
            sim,
            slot: Arc::clone(&slot),
            control: Arc::clone(&control),
            cmd_rx,
            stopped: Arc::clone(&stopped),
            tick_base,
            idle_poll,
        };
        let stepper = thread::Builder::new()
            .name("cosmos-step".into())
            .spawn(move || state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("cosmos-step: {e}"),
            })?;

        Ok(Self {
            slot,
            control,
            cmd_tx: Some(cmd_tx),
            stopped,
            stepper: Some(stepper),
            recovered: None,
        })
    }

    /// The most recently published snapshot.
    pub fn latest_snapshot(&self) -> Option<Arc<UniverseSnapshot>> {
        self.slot.latest()
    }

    /// Indexed coordinates inside `range`, from the latest snapshot.
    pub fn query_region(&self, range: &Rect) -> Vec<Coord> {
        self.latest_snapshot()
            .map(|s| s.query_region(range))
            .unwrap_or_default()
    }

    /// Allow steps to run.
    pub fn play(&self) {
        self.control.play();
        self.wake();
    }

    /// Stop the next step from starting.
    pub fn pause(&self) {
        self.control.pause();
    }

    /// Select a speed level. Unknown levels are ignored and return `false`.
    pub fn set_speed(&self, level: u8) -> bool {
        let accepted = self.control.set_speed(level);
        if accepted {
            self.wake();
        }
        accepted
    }

    /// Whether steps are allowed to run.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Selected speed level.
    pub fn speed(&self) -> u8 {
        self.control.speed()
    }

    /// Point the cell view at `c`. Returns `false` if the stepper has shut
    /// down or its command queue is full.
    pub fn open_cell_view(&self, c: Coord) -> bool {
        self.send(StepperCommand::OpenCellView(c))
    }

    /// Clear the cell view. Returns `false` if the command was not queued.
    pub fn close_cell_view(&self) -> bool {
        self.send(StepperCommand::CloseCellView)
    }

    fn send(&self, cmd: StepperCommand) -> bool {
        let Some(tx) = self.cmd_tx.as_ref() else {
            return false;
        };
        match tx.try_send(cmd) {
            Ok(()) => {
                self.wake();
                true
            }
            Err(TrySendError::Full(_)) => {
                log::debug!("stepper command queue full; dropped {cmd:?}");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    fn wake(&self) {
        if let Some(handle) = &self.stepper {
            handle.thread().unpark();
        }
    }

    /// Whether the stepper thread has exited.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Stop the stepper and recover the simulator. Idempotent.
    pub fn shutdown(&mut self) -> ShutdownReport {
        let start = Instant::now();
        let Some(handle) = self.stepper.take() else {
            return ShutdownReport {
                total_ms: 0,
                stepper_joined: self.recovered.is_some(),
                snapshots_published: self.slot.published(),
            };
        };

        self.control.request_shutdown();
        // Wake the stepper if it is parked in a step or idle sleep.
        handle.thread().unpark();
        self.cmd_tx.take();

        let stepper_joined = match handle.join() {
            Ok(sim) => {
                self.recovered = Some(sim);
                true
            }
            Err(_) => {
                log::warn!("stepper thread panicked; simulator lost");
                false
            }
        };

        ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            stepper_joined,
            snapshots_published: self.slot.published(),
        }
    }

    /// Shut down and take the simulator back, e.g. to save it.
    ///
    /// Returns `None` only if the stepper thread panicked. The simulator
    /// can be passed to [`start`](Self::start) again.
    pub fn into_simulator(mut self) -> Option<UniverseSimulator> {
        self.shutdown();
        self.recovered.take()
    }
}

impl Drop for RealtimeUniverse {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> EngineConfig {
        EngineConfig {
            seed: Some(5),
            big_bang_delay: 3,
            tick_base_ms: 1,
            idle_poll_ms: 1,
            default_speed: 6,
            ..EngineConfig::default()
        }
    }

    fn wait_for(deadline: Duration, mut f: impl FnMut() -> bool) -> bool {
        let end = Instant::now() + deadline;
        while Instant::now() < end {
            if f() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    #[test]
    fn first_snapshot_is_available_immediately() {
        let rt = RealtimeUniverse::spawn(fast_config()).unwrap();
        let snap = rt.latest_snapshot().unwrap();
        assert_eq!(snap.time_step, 0);
        assert!(!snap.running);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut rt = RealtimeUniverse::spawn(fast_config()).unwrap();
        let first = rt.shutdown();
        assert!(first.stepper_joined);
        assert!(rt.is_stopped());
        let second = rt.shutdown();
        assert!(second.stepper_joined);
        assert_eq!(second.total_ms, 0);
        assert!(!rt.open_cell_view(Coord::ORIGIN));
    }

    #[test]
    fn shutdown_wakes_a_slow_stepper() {
        let cfg = EngineConfig {
            tick_base_ms: 10_000,
            ..fast_config()
        };
        let mut rt = RealtimeUniverse::spawn(cfg).unwrap();
        rt.set_speed(1);
        rt.play();
        assert!(wait_for(Duration::from_secs(5), || rt
            .latest_snapshot()
            .is_some_and(|s| s.time_step > 0)));
        let report = rt.shutdown();
        assert!(report.stepper_joined);
        assert!(report.total_ms < 2_000, "took {}ms", report.total_ms);
    }

    #[test]
    fn recovered_simulator_can_restart() {
        let rt = RealtimeUniverse::spawn(fast_config()).unwrap();
        let sim = rt.into_simulator().unwrap();
        let rt = RealtimeUniverse::start(sim).unwrap();
        rt.play();
        assert!(wait_for(Duration::from_secs(5), || rt
            .latest_snapshot()
            .is_some_and(|s| s.time_step > 0)));
        assert!(!rt.is_stopped());
    }

    #[test]
    fn focus_commands_publish_while_paused() {
        let rt = RealtimeUniverse::spawn(fast_config()).unwrap();
        assert!(rt.open_cell_view(Coord::ORIGIN));
        assert!(wait_for(Duration::from_secs(5), || rt
            .latest_snapshot()
            .is_some_and(|s| s.focused == Some(Coord::ORIGIN))));
        let snap = rt.latest_snapshot().unwrap();
        assert_eq!(snap.focused_cell().map(|c| c.coord()), Some(Coord::ORIGIN));
        assert_eq!(snap.time_step, 0);
    }
}
