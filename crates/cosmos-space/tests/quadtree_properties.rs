use cosmos_core::Coord;
use cosmos_space::{QuadTree, Rect};
use proptest::prelude::*;

fn arb_points() -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec((-200i32..200, -200i32..200).prop_map(Coord::from), 0..300)
}

fn build(points: &[Coord], cap: usize) -> QuadTree {
    let mut t = QuadTree::new(Rect::centred(0.0, 0.0, 400.0), cap).unwrap();
    for p in points {
        assert!(t.insert(*p), "in-bounds point {p} rejected");
    }
    t
}

proptest! {
    #[test]
    fn covering_query_returns_every_point(points in arb_points(), cap in 1usize..8) {
        let t = build(&points, cap);
        let mut got = t.query(&Rect::centred(0.0, 0.0, 402.0));
        let mut want = points.clone();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn disjoint_query_returns_nothing(points in arb_points(), cap in 1usize..8) {
        let t = build(&points, cap);
        prop_assert!(t.query(&Rect::new(500.0, 500.0, 100.0, 100.0)).is_empty());
        prop_assert!(t.query(&Rect::new(-700.0, -50.0, 100.0, 100.0)).is_empty());
    }

    #[test]
    fn query_matches_brute_force(
        points in arb_points(),
        cap in 1usize..8,
        qx in -250.0f64..250.0,
        qy in -250.0f64..250.0,
        qw in 1.0f64..200.0,
        qh in 1.0f64..200.0,
    ) {
        let t = build(&points, cap);
        let range = Rect::new(qx, qy, qw, qh);
        let mut got = t.query(&range);
        let mut want: Vec<Coord> = points.iter().copied().filter(|p| range.contains(*p)).collect();
        got.sort();
        want.sort();
        prop_assert_eq!(got, want);
    }

    #[test]
    fn nodes_respect_capacity_and_boundary(points in arb_points(), cap in 1usize..8) {
        let t = build(&points, cap);
        let mut stored = 0;
        for node in t.nodes() {
            prop_assert!(node.points().len() <= cap);
            for p in node.points() {
                prop_assert!(node.boundary().contains(*p));
            }
            if let Some(children) = node.children() {
                prop_assert_eq!(node.points().len(), cap);
                for c in children {
                    prop_assert_eq!(t.nodes()[c].depth(), node.depth() + 1);
                }
            }
            stored += node.points().len();
        }
        prop_assert_eq!(stored, t.len());
        prop_assert_eq!(t.len(), points.len());
    }
}

#[test]
fn default_engine_root_holds_a_full_grid() {
    // Root square of side 4 * 250 centred on the origin.
    let mut t = QuadTree::new(Rect::centred(0.0, 0.0, 1000.0), 4).unwrap();
    for x in -125..=125 {
        assert!(t.insert(Coord::new(x, x)));
        assert!(t.insert(Coord::new(x, -x)));
    }
    assert_eq!(t.len(), 502);
    assert!(!t.insert(Coord::new(500, 0)));
}
