//! Insert-only quadtree over cell coordinates.
//!
//! Nodes live in a flat arena and refer to their children by index, so
//! cloning a tree is a single `Vec` copy and traversal never recurses.

use crate::error::IndexError;
use crate::rect::Rect;
use cosmos_core::Coord;
use smallvec::SmallVec;

/// One node of a [`QuadTree`].
///
/// Every point held by a node lies inside its boundary. A node holds at
/// most `capacity` points and, once subdivided, has exactly four children.
#[derive(Clone, Debug)]
pub struct QuadNode {
    boundary: Rect,
    points: SmallVec<[Coord; 4]>,
    children: Option<[usize; 4]>,
    depth: u32,
}

impl QuadNode {
    fn leaf(boundary: Rect, depth: u32) -> Self {
        Self {
            boundary,
            points: SmallVec::new(),
            children: None,
            depth,
        }
    }

    /// The region this node covers.
    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Points stored directly in this node.
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Whether this node has not subdivided.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Arena indices of the NW, NE, SW, SE children.
    pub fn children(&self) -> Option<[usize; 4]> {
        self.children
    }

    /// Distance from the root (the root is depth 0).
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// Region index over populated coordinates.
///
/// A full node splits into four equal quadrants when it receives one more
/// point; the new point goes to the first quadrant (NW, NE, SW, SE) that
/// contains it. Points already stored are not redistributed.
#[derive(Clone, Debug)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    capacity: usize,
    len: usize,
}

impl QuadTree {
    /// Create an empty index covering `boundary`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::ZeroCapacity`] if `capacity` is 0, or
    /// [`IndexError::InvalidBoundary`] if `boundary` is non-finite or has a
    /// non-positive extent.
    pub fn new(boundary: Rect, capacity: usize) -> Result<Self, IndexError> {
        if capacity == 0 {
            return Err(IndexError::ZeroCapacity);
        }
        boundary
            .validate()
            .map_err(|reason| IndexError::InvalidBoundary { reason })?;
        Ok(Self {
            nodes: vec![QuadNode::leaf(boundary, 0)],
            capacity,
            len: 0,
        })
    }

    /// Insert a point.
    ///
    /// Returns `false` if the point lies outside the root boundary, or if
    /// float rounding leaves no child quadrant containing it.
    pub fn insert(&mut self, p: Coord) -> bool {
        if !self.nodes[0].boundary.contains(p) {
            return false;
        }
        let mut idx = 0;
        loop {
            if self.nodes[idx].points.len() < self.capacity {
                self.nodes[idx].points.push(p);
                self.len += 1;
                return true;
            }
            let existing = self.nodes[idx].children;
            let children = match existing {
                Some(c) => c,
                None => self.subdivide(idx),
            };
            match children
                .into_iter()
                .find(|&c| self.nodes[c].boundary.contains(p))
            {
                Some(next) => idx = next,
                None => return false,
            }
        }
    }

    fn subdivide(&mut self, idx: usize) -> [usize; 4] {
        let depth = self.nodes[idx].depth + 1;
        let quads = self.nodes[idx].boundary.quadrants();
        let base = self.nodes.len();
        self.nodes
            .extend(quads.into_iter().map(|q| QuadNode::leaf(q, depth)));
        let children = [base, base + 1, base + 2, base + 3];
        self.nodes[idx].children = Some(children);
        children
    }

    /// All indexed points inside `range`.
    ///
    /// Only nodes whose boundary intersects `range` are visited. Results are
    /// in pre-order: a node's own points, then its NW, NE, SW, SE subtrees.
    pub fn query(&self, range: &Rect) -> Vec<Coord> {
        let mut found = Vec::new();
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.boundary.intersects(range) {
                continue;
            }
            found.extend(node.points.iter().copied().filter(|p| range.contains(*p)));
            if let Some(children) = node.children {
                stack.extend(children.into_iter().rev());
            }
        }
        found
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no point has been stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum points per node.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The root boundary.
    pub fn boundary(&self) -> Rect {
        self.nodes[0].boundary
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Read-only view of every node; index 0 is the root.
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(cap: usize) -> QuadTree {
        QuadTree::new(Rect::new(0.0, 0.0, 800.0, 800.0), cap).unwrap()
    }

    #[test]
    fn rejects_bad_construction() {
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(QuadTree::new(r, 0).unwrap_err(), IndexError::ZeroCapacity);
        match QuadTree::new(Rect::new(0.0, 0.0, -1.0, 1.0), 4) {
            Err(IndexError::InvalidBoundary { .. }) => {}
            other => panic!("expected InvalidBoundary, got {other:?}"),
        }
    }

    #[test]
    fn outside_points_are_rejected() {
        let mut t = tree(4);
        assert!(!t.insert(Coord::new(-1, 0)));
        assert!(!t.insert(Coord::new(800, 0)));
        assert!(t.is_empty());
    }

    #[test]
    fn fifth_point_subdivides() {
        let mut t = tree(4);
        for i in 0..4 {
            assert!(t.insert(Coord::new(i, i)));
        }
        assert_eq!(t.node_count(), 1);
        assert!(t.insert(Coord::new(500, 100)));
        assert_eq!(t.node_count(), 5);
        // (500, 100) belongs to NE; earlier points stay in the root.
        let root = &t.nodes()[0];
        assert_eq!(root.points().len(), 4);
        let ne = root.children().unwrap()[1];
        assert_eq!(t.nodes()[ne].points(), &[Coord::new(500, 100)]);
        assert_eq!(t.depth(), 1);
    }

    #[test]
    fn duplicate_points_are_stored() {
        let mut t = tree(1);
        assert!(t.insert(Coord::new(3, 3)));
        assert!(t.insert(Coord::new(3, 3)));
        assert_eq!(t.len(), 2);
        assert_eq!(t.query(&Rect::new(0.0, 0.0, 10.0, 10.0)).len(), 2);
    }

    #[test]
    fn query_filters_by_range() {
        let mut t = tree(2);
        for x in 0..20 {
            t.insert(Coord::new(x * 10, x * 10));
        }
        let mut got = t.query(&Rect::new(0.0, 0.0, 50.0, 50.0));
        got.sort();
        let want: Vec<Coord> = (0..5).map(|x| Coord::new(x * 10, x * 10)).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn clone_is_independent() {
        let mut a = tree(4);
        a.insert(Coord::new(1, 1));
        let b = a.clone();
        a.insert(Coord::new(2, 2));
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
    }
}
