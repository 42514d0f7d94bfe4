//! Floating-point axis-aligned rectangles.

use cosmos_core::{Coord, GridBounds};
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle with origin `(x, y)` and extent `(w, h)`.
///
/// Point containment is half-open (`x <= px < x + w`) so adjacent
/// quadrants never share a point. Rectangle intersection is closed, so
/// rectangles that merely touch along an edge still intersect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A square of side `side` centred on `(cx, cy)`.
    pub fn centred(cx: f64, cy: f64, side: f64) -> Self {
        let half = side / 2.0;
        Self::new(cx - half, cy - half, side, side)
    }

    /// The smallest rectangle containing every coordinate in `b`.
    pub fn covering(b: &GridBounds) -> Self {
        Self::new(
            f64::from(b.min_x),
            f64::from(b.min_y),
            b.width() as f64,
            b.height() as f64,
        )
    }

    /// Half-open point containment.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        self.x <= px && px < self.x + self.w && self.y <= py && py < self.y + self.h
    }

    /// Half-open containment of a cell coordinate.
    pub fn contains(&self, c: Coord) -> bool {
        self.contains_point(f64::from(c.x), f64::from(c.y))
    }

    /// Closed intersection test.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x > self.x + self.w
            || other.x + other.w < self.x
            || other.y > self.y + self.h
            || other.y + other.h < self.y)
    }

    /// The four equal quadrants, NW, NE, SW, SE.
    pub fn quadrants(&self) -> [Rect; 4] {
        let (hw, hh) = (self.w / 2.0, self.h / 2.0);
        [
            Rect::new(self.x, self.y, hw, hh),
            Rect::new(self.x + hw, self.y, hw, hh),
            Rect::new(self.x, self.y + hh, hw, hh),
            Rect::new(self.x + hw, self.y + hh, hw, hh),
        ]
    }

    /// Why this rectangle cannot hold points, if it cannot.
    pub fn validate(&self) -> Result<(), String> {
        if ![self.x, self.y, self.w, self.h].iter().all(|v| v.is_finite()) {
            return Err(format!("non-finite rectangle {self:?}"));
        }
        if self.w <= 0.0 || self.h <= 0.0 {
            return Err(format!("extent must be positive, got {}x{}", self.w, self.h));
        }
        Ok(())
    }
}
