// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

use tilemap_geom::{
    close_line_pairs, close_point_pairs, convex_hull, Aabb, AllPairs, BroadPhase, Point,
};

// Seed pinned so failures reproduce across machines; override locally with
// PROPTEST_SEED when exploring.
const SEED_BYTES: [u8; 32] = [
    0x7e, 0x11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];

fn runner() -> TestRunner {
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    TestRunner::new_with_rng(PropConfig::default(), rng)
}

// Integer-valued coordinates keep every cross product exact.
fn grid_point(extent: i32) -> impl Strategy<Value = Point> {
    (-extent..=extent, -extent..=extent).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
}

#[test]
fn hull_vertices_are_inputs_and_enclose_every_point() {
    let points = prop::collection::vec(grid_point(1000), 2..250)
        .prop_filter("two distinct points", |pts| pts.iter().any(|p| *p != pts[0]));

    runner()
        .run(&points, |pts| {
            let hull = convex_hull(&pts).expect("hull of valid input");
            prop_assert!(hull.len() >= 2);
            for v in &hull {
                prop_assert!(pts.contains(v));
            }
            for (i, a) in hull.iter().enumerate() {
                let b = &hull[(i + 1) % hull.len()];
                prop_assert!(a != b);
                for p in &pts {
                    prop_assert!(p.cross(a, b) <= 0.0, "{p:?} outside edge {a:?} -> {b:?}");
                }
            }
            Ok(())
        })
        .expect("hull property");
}

#[test]
fn sweep_agrees_with_all_pairs() {
    let boxes = prop::collection::vec((grid_point(200), 0..30i32, 0..30i32), 0..80);

    runner()
        .run(&boxes, |boxes| {
            let lines: Vec<Vec<Point>> = boxes
                .iter()
                .map(|&(c, w, h)| {
                    vec![c, Point::new(c.x + f64::from(w), c.y + f64::from(h))]
                })
                .collect();
            let margin = 0.5;
            let swept = close_line_pairs(&lines, margin).expect("sweep");

            let mut reference = AllPairs::new();
            for (id, l) in lines.iter().enumerate() {
                let bb = Aabb::from_points(l).expect("non-empty line");
                reference.upsert(id, bb.inflate(margin));
            }
            prop_assert_eq!(swept, reference.pairs().expect("reference"));
            Ok(())
        })
        .expect("sweep property");
}

#[test]
fn point_sweep_agrees_with_brute_force() {
    let clouds = (
        prop::collection::vec(grid_point(40), 0..60),
        prop::collection::vec(grid_point(40), 0..60),
        1..6i32,
    );

    runner()
        .run(&clouds, |(a, b, m)| {
            let margin = f64::from(m) + 0.5;
            let mut sweep = close_point_pairs(&a, &b, margin).expect("sweep");
            let mut found: Vec<(usize, usize)> = sweep.by_ref().collect();
            prop_assert_eq!(sweep.active_len(), 0);
            found.sort_unstable();

            let mut brute = Vec::new();
            for (i, p) in a.iter().enumerate() {
                for (j, q) in b.iter().enumerate() {
                    if p.dist_sq(q) < margin * margin {
                        brute.push((i, j));
                    }
                }
            }
            prop_assert_eq!(found, brute);
            Ok(())
        })
        .expect("point sweep property");
}
