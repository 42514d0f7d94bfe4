//! Core types for the Cosmos universe simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! grid coordinates, the [`Cell`] and [`Grid`] types the engine rebuilds
//! every step, and the decorative [`CelestialBody`] variants placed inside
//! cells.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod cell;
pub mod coord;

pub use body::{
    generate_bodies, BodyKind, BodyList, BodyPosition, CelestialBody, Composition, RenderStyle,
    MAX_BODIES_PER_CELL,
};
pub use cell::{Cell, CellRecord, Grid, ORIGIN_DENSITY, ORIGIN_TEMPERATURE};
pub use coord::{Coord, GridBounds, NEIGHBOUR_OFFSETS};
