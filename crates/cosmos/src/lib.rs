//! Cosmos: a procedural universe simulator.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Cosmos sub-crates. For most users, adding `cosmos` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use cosmos::prelude::*;
//!
//! let config = EngineConfig {
//!     seed: Some(42),
//!     big_bang_delay: 3,
//!     start_running: true,
//!     ..EngineConfig::default()
//! };
//! let mut sim = UniverseSimulator::new(config).unwrap();
//!
//! // Dormant until the delay elapses, then the origin grows a ring.
//! assert_eq!(sim.step(), StepOutcome::Dormant);
//! assert_eq!(sim.step(), StepOutcome::Dormant);
//! assert_eq!(sim.step(), StepOutcome::BigBang);
//! assert_eq!(sim.grid().len(), 9);
//!
//! // Region queries go through the spatial index.
//! let near = sim.query_region(&Rect::centred(0.0, 0.0, 3.0));
//! assert_eq!(near.len(), 9);
//! assert!(near.contains(&Coord::ORIGIN));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `cosmos-core` | Coordinates, cells, the grid, celestial bodies |
//! | [`space`] | `cosmos-space` | Rectangles and the region quadtree |
//! | [`engine`] | `cosmos-engine` | The simulator, schedules, diffusion, persistence, realtime stepping |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid and body types (`cosmos-core`).
///
/// Contains [`types::Coord`], [`types::Cell`], [`types::Grid`], and the
/// [`types::CelestialBody`] catalogue.
pub use cosmos_core as types;

/// Spatial indexing (`cosmos-space`).
///
/// Provides [`space::Rect`] and [`space::QuadTree`].
pub use cosmos_space as space;

/// The simulation engine (`cosmos-engine`).
///
/// [`engine::UniverseSimulator`] for caller-driven stepping,
/// [`engine::RealtimeUniverse`] for a background stepper thread.
pub use cosmos_engine as engine;

/// Common imports for typical Cosmos usage.
///
/// ```rust
/// use cosmos::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use cosmos_core::{BodyKind, Cell, CelestialBody, CellRecord, Coord, Grid};

    // Space
    pub use cosmos_space::{QuadTree, Rect};

    // Errors
    pub use cosmos_engine::{ConfigError, PersistError};

    // Engine
    pub use cosmos_engine::{
        CosmicPhase, EngineConfig, EngineState, RealtimeUniverse, SavedUniverse, StepMetrics,
        StepOutcome, UniverseSimulator, UniverseSnapshot,
    };
}
