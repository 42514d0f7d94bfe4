//! Test fixtures for Cosmos development.
//!
//! Grid builders for hand-shaped universes and a float comparison helper
//! shared by the engine tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    assert_close, line_grid, scattered_coords, square_grid, uniform_grid, GridBuilder,
};
