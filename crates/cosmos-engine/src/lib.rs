//! Universe simulation engine for Cosmos.
//!
//! Provides [`UniverseSimulator`], the time-stepped state machine that
//! carries a sparse grid of cells from a dormant origin through the big
//! bang, phase-scheduled expansion, collapse, and stillness. Each
//! expanding step rebuilds the grid over a grown rectangle, generates new
//! cells from their neighbours, and diffuses density.
//!
//! [`RealtimeUniverse`] runs a simulator on a background thread and
//! publishes [`UniverseSnapshot`]s through a [`SnapshotSlot`].
//!
//! The library never installs a logger; it reports through the `log`
//! facade.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod control;
pub mod diffusion;
pub mod expansion;
pub mod generation;
pub mod hash;
pub mod metrics;
pub mod persist;
pub mod publish;
pub mod realtime;
pub mod schedule;
pub mod simulator;
pub mod snapshot;
pub mod speed;

pub use config::{ConfigError, EngineConfig, IndexConfig};
pub use control::SimControl;
pub use diffusion::{diffuse, DiffusionConfig, DiffusionEdge, DiffusionReport};
pub use expansion::{expand, Expansion};
pub use generation::{generate_from_neighbours, GenerationConfig};
pub use hash::grid_hash;
pub use metrics::StepMetrics;
pub use persist::{PersistError, SavedUniverse, SAVE_VERSION};
pub use publish::SnapshotSlot;
pub use realtime::{RealtimeUniverse, ShutdownReport, StepperCommand};
pub use schedule::{
    radius_for, ConstantSchedule, CosmicPhase, ExpansionSchedule, Milestone, PhaseSchedule,
    RateSample,
};
pub use simulator::{EngineState, StepOutcome, UniverseSimulator};
pub use snapshot::UniverseSnapshot;
pub use speed::{SpeedLevel, SpeedTable};
