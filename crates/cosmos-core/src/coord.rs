//! Integer grid coordinates and bounding rectangles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Offsets of the 4-connected neighbourhood, in the fixed order
/// west, east, north, south.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A cell coordinate in the universe grid.
///
/// Ordering is lexicographic on `(x, y)`. Grids built by the engine are
/// traversed in this ascending order, which is what makes diffusion
/// reproducible.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    /// Horizontal axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
}

impl Coord {
    /// The origin `(0, 0)`, home of the primordial cell.
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate displaced by `(dx, dy)`, or `None` if it would leave
    /// the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    /// The 4-connected neighbours in [`NEIGHBOUR_OFFSETS`] order.
    ///
    /// Directions that leave the `i32` range are skipped, so a coordinate
    /// on the edge of the range has fewer than four neighbours. The grid
    /// never wraps.
    pub fn neighbours(self) -> SmallVec<[Coord; 4]> {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| self.checked_offset(dx, dy))
            .collect()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Inclusive axis-aligned bounding rectangle over integer coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridBounds {
    /// Smallest x (inclusive).
    pub min_x: i32,
    /// Largest x (inclusive).
    pub max_x: i32,
    /// Smallest y (inclusive).
    pub min_y: i32,
    /// Largest y (inclusive).
    pub max_y: i32,
}

impl GridBounds {
    /// A degenerate rectangle covering a single coordinate.
    pub fn point(c: Coord) -> Self {
        Self {
            min_x: c.x,
            max_x: c.x,
            min_y: c.y,
            max_y: c.y,
        }
    }

    /// Grow the rectangle so it covers `c`.
    pub fn include(&mut self, c: Coord) {
        self.min_x = self.min_x.min(c.x);
        self.max_x = self.max_x.max(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_y = self.max_y.max(c.y);
    }

    /// `max_x - min_x`. A single column has span 0.
    pub fn span_x(&self) -> u32 {
        self.max_x.abs_diff(self.min_x)
    }

    /// `max_y - min_y`. A single row has span 0.
    pub fn span_y(&self) -> u32 {
        self.max_y.abs_diff(self.min_y)
    }

    /// Number of columns covered (`span_x + 1`).
    pub fn width(&self) -> u64 {
        u64::from(self.span_x()) + 1
    }

    /// Number of rows covered (`span_y + 1`).
    pub fn height(&self) -> u64 {
        u64::from(self.span_y()) + 1
    }

    /// Number of coordinates inside the rectangle.
    pub fn area(&self) -> u64 {
        self.width() * self.height()
    }

    /// The rectangle grown by `radius` on every side, saturating at the
    /// `i32` range.
    pub fn expanded(&self, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            min_x: self.min_x.saturating_sub(r),
            max_x: self.max_x.saturating_add(r),
            min_y: self.min_y.saturating_sub(r),
            max_y: self.max_y.saturating_add(r),
        }
    }

    /// Whether `c` lies inside the rectangle.
    pub fn contains(&self, c: Coord) -> bool {
        (self.min_x..=self.max_x).contains(&c.x) && (self.min_y..=self.max_y).contains(&c.y)
    }

    /// Every coordinate in the rectangle, x-major then y, ascending.
    ///
    /// This is the same order as [`Coord`]'s `Ord`.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let (min_y, max_y) = (self.min_y, self.max_y);
        (self.min_x..=self.max_x).flat_map(move |x| (min_y..=max_y).map(move |y| Coord { x, y }))
    }
}
