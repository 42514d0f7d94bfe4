//! Grid and coordinate fixtures.
//!
//! - [`GridBuilder`] places plain cells one at a time.
//! - [`square_grid`] / [`uniform_grid`] fill a centred square.
//! - [`line_grid`] lays cells along the x axis with given densities.
//! - [`scattered_coords`] produces a deterministic cloud of points.

use cosmos_core::{Cell, Coord, Grid};
use cosmos_space::Rect;

/// Incremental builder for grids of plain (body-free) cells.
pub struct GridBuilder {
    grid: Grid,
    temperature: f64,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            temperature: 1_000.0,
        }
    }

    /// Temperature given to cells placed after this call.
    pub fn temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn cell(mut self, x: i32, y: i32, density: f64) -> Self {
        self.grid
            .insert(Cell::plain(Coord::new(x, y), density, self.temperature));
        self
    }

    pub fn build(self) -> Grid {
        self.grid
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A `(2r+1) x (2r+1)` square centred on the origin, density chosen per
/// coordinate by `density`.
pub fn square_grid(radius: i32, mut density: impl FnMut(Coord) -> f64) -> Grid {
    let side = (2 * radius + 1) as usize;
    let mut grid = Grid::with_capacity(side * side);
    for x in -radius..=radius {
        for y in -radius..=radius {
            let c = Coord::new(x, y);
            grid.insert(Cell::plain(c, density(c), 1_000.0));
        }
    }
    grid
}

/// A centred square with the same density everywhere.
pub fn uniform_grid(radius: i32, density: f64) -> Grid {
    square_grid(radius, |_| density)
}

/// Cells at `(0, 0), (1, 0), ...` with the given densities.
pub fn line_grid(densities: &[f64]) -> Grid {
    let mut grid = Grid::with_capacity(densities.len());
    for (i, &d) in densities.iter().enumerate() {
        grid.insert(Cell::plain(Coord::new(i as i32, 0), d, 1_000.0));
    }
    grid
}

/// `n` distinct-ish integer points inside `bounds`, from a fixed LCG so
/// runs are repeatable without an RNG dependency.
pub fn scattered_coords(n: usize, bounds: &Rect, seed: u64) -> Vec<Coord> {
    let mut state = seed | 1;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 33) as f64 / (1u64 << 31) as f64
    };
    (0..n)
        .map(|_| {
            let x = bounds.x + next() * bounds.w;
            let y = bounds.y + next() * bounds.h;
            Coord::new(x.floor() as i32, y.floor() as i32)
        })
        .collect()
}

/// Assert two floats agree to within `eps`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected} (+/- {eps}), got {actual}"
    );
}
