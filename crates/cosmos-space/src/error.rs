//! Error types for spatial index construction.

use std::fmt;

/// Errors arising from quadtree construction.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexError {
    /// Node capacity must be at least 1.
    ZeroCapacity,
    /// The root boundary cannot hold any point.
    InvalidBoundary {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "quadtree node capacity must be at least 1"),
            Self::InvalidBoundary { reason } => {
                write!(f, "invalid quadtree boundary: {reason}")
            }
        }
    }
}

impl std::error::Error for IndexError {}
