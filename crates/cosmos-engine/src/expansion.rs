//! Grid rebuild over a grown bounding rectangle.

use crate::generation::{generate_from_neighbours, GenerationConfig};
use cosmos_core::{Coord, Grid};
use rand::Rng;

/// Result of one rebuild.
#[derive(Clone, Debug)]
pub struct Expansion {
    /// The rebuilt grid, in ascending coordinate order.
    pub grid: Grid,
    /// Coordinates that did not exist in the previous grid, in build order.
    pub generated: Vec<Coord>,
    /// `true` if the previous grid already spanned the ceiling.
    pub frozen: bool,
}

/// Rebuild `old` over its bounding rectangle grown by `radius`.
///
/// If either span of `old` already reaches `max_span`, the grid is
/// refreshed without adding coordinates and `frozen` is set. Otherwise
/// every coordinate of the grown rectangle is visited in ascending order:
/// existing cells are carried over unchanged, and new ones are generated
/// from their neighbours in `old`.
pub fn expand<R: Rng>(
    old: &Grid,
    radius: u32,
    max_span: u32,
    rng: &mut R,
    generation: &GenerationConfig,
    body_seed: Option<u64>,
) -> Expansion {
    let Some(bounds) = old.bounds() else {
        return Expansion {
            grid: Grid::new(),
            generated: Vec::new(),
            frozen: false,
        };
    };

    if bounds.span_x() >= max_span || bounds.span_y() >= max_span {
        return Expansion {
            grid: old.clone(),
            generated: Vec::new(),
            frozen: true,
        };
    }

    let target = bounds.expanded(radius);
    let capacity = usize::try_from(target.area()).unwrap_or(old.len());
    let mut grid = Grid::with_capacity(capacity);
    let mut generated = Vec::with_capacity(capacity.saturating_sub(old.len()));

    for c in target.coords() {
        match old.get(c) {
            Some(cell) => {
                grid.insert(cell.clone());
            }
            None => {
                let neighbours = old.neighbours(c);
                grid.insert(generate_from_neighbours(
                    &neighbours,
                    c,
                    rng,
                    generation,
                    body_seed,
                ));
                generated.push(c);
            }
        }
    }

    Expansion {
        grid,
        generated,
        frozen: false,
    }
}
