//! Cells and the coordinate-keyed grid that holds them.

use crate::body::{generate_bodies, BodyList, CelestialBody};
use crate::coord::{Coord, GridBounds};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Density of the primordial cell.
pub const ORIGIN_DENSITY: f64 = 10.0;

/// Temperature of the primordial cell.
pub const ORIGIN_TEMPERATURE: f64 = 10_000.0;

/// One unit of the simulated universe.
///
/// The coordinate is fixed at creation. Density and temperature are
/// mutated in place by diffusion; bodies are fixed once generated.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    coord: Coord,
    /// Matter density. Expected non-negative.
    pub density: f64,
    /// Temperature.
    pub temperature: f64,
    seed: Option<u64>,
    bodies: BodyList,
}

impl Cell {
    /// Create a cell, placing bodies when a seed is supplied.
    pub fn new(coord: Coord, density: f64, temperature: f64, seed: Option<u64>) -> Self {
        let bodies = match seed {
            Some(s) => generate_bodies(s, coord, density, temperature),
            None => BodyList::new(),
        };
        Self {
            coord,
            density,
            temperature,
            seed,
            bodies,
        }
    }

    /// The primordial cell at the origin.
    pub fn origin(seed: Option<u64>) -> Self {
        Self::new(Coord::ORIGIN, ORIGIN_DENSITY, ORIGIN_TEMPERATURE, seed)
    }

    /// A cell with no seed and no bodies, as loaded from persisted state.
    pub fn plain(coord: Coord, density: f64, temperature: f64) -> Self {
        Self::new(coord, density, temperature, None)
    }

    /// The cell's coordinate.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// The seed used to place bodies, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Bodies in generation order.
    pub fn bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    /// The persistable view of this cell.
    pub fn record(&self) -> CellRecord {
        CellRecord {
            x: self.coord.x,
            y: self.coord.y,
            density: self.density,
            temperature: self.temperature,
        }
    }
}

/// The persisted form of a cell: coordinates and scalar state only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// Matter density.
    pub density: f64,
    /// Temperature.
    pub temperature: f64,
}

impl CellRecord {
    /// The record's coordinate.
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Coordinate-keyed mapping of cells.
///
/// Backed by an insertion-ordered map. The engine builds each grid in
/// ascending coordinate order, and [`Grid::from_records`] sorts its input,
/// so iteration order is always ascending for grids the engine handles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    cells: IndexMap<Coord, Cell>,
}

impl Grid {
    /// An empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty grid with room for `n` cells.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            cells: IndexMap::with_capacity(n),
        }
    }

    /// A grid holding only `cell`.
    pub fn singleton(cell: Cell) -> Self {
        let mut g = Self::with_capacity(1);
        g.insert(cell);
        g
    }

    /// Rebuild plain cells from persisted records.
    ///
    /// Records are sorted by coordinate first. When two records share a
    /// coordinate, the later one wins.
    pub fn from_records(records: impl IntoIterator<Item = CellRecord>) -> Self {
        let mut records: Vec<CellRecord> = records.into_iter().collect();
        records.sort_by_key(CellRecord::coord);
        let mut g = Self::with_capacity(records.len());
        for r in records {
            g.insert(Cell::plain(r.coord(), r.density, r.temperature));
        }
        g
    }

    /// Insert a cell, returning any cell it replaced.
    ///
    /// A replacement keeps the original position in traversal order.
    pub fn insert(&mut self, cell: Cell) -> Option<Cell> {
        self.cells.insert(cell.coord, cell)
    }

    /// The cell at `c`, or `None` if nothing has been generated there.
    pub fn get(&self, c: Coord) -> Option<&Cell> {
        self.cells.get(&c)
    }

    /// Mutable access to the cell at `c`.
    pub fn get_mut(&mut self, c: Coord) -> Option<&mut Cell> {
        self.cells.get_mut(&c)
    }

    /// The `i`-th cell in traversal order.
    pub fn get_index(&self, i: usize) -> Option<&Cell> {
        self.cells.get_index(i).map(|(_, cell)| cell)
    }

    /// Mutable access to the `i`-th cell in traversal order.
    pub fn get_index_mut(&mut self, i: usize) -> Option<&mut Cell> {
        self.cells.get_index_mut(i).map(|(_, cell)| cell)
    }

    /// Whether a cell exists at `c`.
    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains_key(&c)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid holds no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.values()
    }

    /// Coordinates in traversal order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }

    /// Existing 4-connected neighbours of `c`, west, east, north, south.
    pub fn neighbours(&self, c: Coord) -> SmallVec<[&Cell; 4]> {
        c.neighbours()
            .into_iter()
            .filter_map(|n| self.cells.get(&n))
            .collect()
    }

    /// Bounding rectangle of all coordinates, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<GridBounds> {
        let mut keys = self.cells.keys();
        let first = keys.next()?;
        let mut b = GridBounds::point(*first);
        for c in keys {
            b.include(*c);
        }
        Some(b)
    }

    /// Sum of density over all cells.
    pub fn total_density(&self) -> f64 {
        self.cells.values().map(|c| c.density).sum()
    }

    /// Persistable records in traversal order.
    pub fn records(&self) -> Vec<CellRecord> {
        self.cells.values().map(Cell::record).collect()
    }
}
