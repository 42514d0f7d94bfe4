//! A 64-bit fingerprint of a grid's scalar state.
//!
//! Two runs from the same seed and the same control calls must produce
//! equal fingerprints at every step. The fingerprint is 64-bit FNV-1a
//! over little-endian fields; it says nothing about bodies and is not a
//! security primitive.

use cosmos_core::Grid;

const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const PRIME: u64 = 0x00000100000001B3;

fn absorb(hash: u64, bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(hash, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}

/// Hash every cell's coordinate, density bits, and temperature bits in
/// traversal order.
///
/// The cell count is folded in first, so an empty grid and a grid of
/// zeroed cells differ. Bodies are not hashed; they follow from the seed.
pub fn grid_hash(grid: &Grid) -> u64 {
    grid.iter().fold(
        absorb(OFFSET_BASIS, &(grid.len() as u64).to_le_bytes()),
        |hash, cell| {
            let c = cell.coord();
            let hash = absorb(hash, &c.x.to_le_bytes());
            let hash = absorb(hash, &c.y.to_le_bytes());
            let hash = absorb(hash, &cell.density.to_bits().to_le_bytes());
            absorb(hash, &cell.temperature.to_bits().to_le_bytes())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmos_core::{Cell, Coord};

    #[test]
    fn matches_published_fnv1a_vectors() {
        assert_eq!(absorb(OFFSET_BASIS, b""), 0xcbf29ce484222325);
        assert_eq!(absorb(OFFSET_BASIS, b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(absorb(OFFSET_BASIS, b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn equal_grids_hash_equal() {
        let a = Grid::singleton(Cell::origin(Some(1)));
        let b = Grid::singleton(Cell::origin(Some(2)));
        assert_eq!(grid_hash(&a), grid_hash(&b));
    }

    #[test]
    fn density_change_changes_hash() {
        let a = Grid::singleton(Cell::origin(None));
        let mut b = a.clone();
        if let Some(c) = b.get_mut(Coord::ORIGIN) {
            c.density += 1e-9;
        }
        assert_ne!(grid_hash(&a), grid_hash(&b));
    }

    #[test]
    fn coordinate_order_matters() {
        let mut a = Grid::singleton(Cell::plain(Coord::new(0, 0), 1.0, 1.0));
        a.insert(Cell::plain(Coord::new(0, 1), 1.0, 1.0));
        let mut b = Grid::singleton(Cell::plain(Coord::new(0, 1), 1.0, 1.0));
        b.insert(Cell::plain(Coord::new(0, 0), 1.0, 1.0));
        assert_ne!(grid_hash(&a), grid_hash(&b));
        assert_ne!(grid_hash(&Grid::new()), grid_hash(&a));
    }
}
