//! Spatial indexing for Cosmos universes.
//!
//! This crate provides the [`QuadTree`] region index over populated cell
//! coordinates, the floating-point [`Rect`] it partitions, and the
//! [`IndexError`] returned when an index is misconfigured.
//!
//! The index is insert-only: points are never removed or relocated, and a
//! node's stored points stay where they landed after it subdivides.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod quadtree;
pub mod rect;

pub use error::IndexError;
pub use quadtree::{QuadNode, QuadTree};
pub use rect::Rect;
