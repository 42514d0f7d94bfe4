//! Shared play/pause/speed controls.
//!
//! [`SimControl`] is the only state the controlling thread writes while a
//! background stepper runs. Every field is atomic, so controls never block
//! and never fail: an unknown speed level is ignored.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::speed::{increment_for, SpeedTable};

/// Running flag, speed selection, and shutdown request.
#[derive(Debug)]
pub struct SimControl {
    running: AtomicBool,
    speed: AtomicU8,
    shutdown: AtomicBool,
    speeds: SpeedTable,
}

// Compile-time assertion: SimControl must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SimControl>();
};

impl SimControl {
    /// Create controls over a validated speed table.
    ///
    /// `speed` should be a level present in `speeds`; the engine config
    /// validates this before construction.
    pub fn new(speeds: SpeedTable, speed: u8, running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            speed: AtomicU8::new(speed),
            shutdown: AtomicBool::new(false),
            speeds,
        }
    }

    /// Allow steps to run.
    pub fn play(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Stop the next step from starting. A step already in progress
    /// completes.
    pub fn pause(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Whether steps are allowed to run.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Select a speed level. Returns `false` and changes nothing if the
    /// level is not in the table.
    pub fn set_speed(&self, level: u8) -> bool {
        if self.speeds.contains(level) {
            self.speed.store(level, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// The selected speed level.
    pub fn speed(&self) -> u8 {
        self.speed.load(Ordering::Acquire)
    }

    /// Delay factor of the selected level.
    pub fn delay_factor(&self) -> f64 {
        self.speeds.delay_factor(self.speed()).unwrap_or(1.0)
    }

    /// Post-big-bang time-counter increment for the selected level.
    pub fn increment(&self) -> u64 {
        increment_for(self.delay_factor())
    }

    /// The speed table.
    pub fn speeds(&self) -> &SpeedTable {
        &self.speeds
    }

    /// Ask a background stepper to exit.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Withdraw a shutdown request before starting a new stepper.
    pub(crate) fn clear_shutdown(&self) {
        self.shutdown.store(false, Ordering::Release);
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}
