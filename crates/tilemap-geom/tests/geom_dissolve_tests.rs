// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the fragment dissolver.

use tilemap_geom::{dissolve, dissolve_with_report, is_closed, GeomError, Line, Point};

const EQ: f64 = 0.1;

fn line(raw: &[(f64, f64)]) -> Line {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn closed_lines_pass_through_unchanged() {
    let ring = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let nearly = line(&[(5.0, 5.0), (6.0, 5.0), (5.0, 6.0), (5.05, 5.0)]);
    let input = vec![ring, nearly];
    let out = dissolve(input.clone(), EQ).expect("dissolve");
    assert_eq!(out, input);
}

#[test]
fn closed_lines_come_before_open_ones() {
    let open = line(&[(10.0, 0.0), (11.0, 0.0)]);
    let ring = line(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
    let out = dissolve(vec![open.clone(), ring.clone()], EQ).expect("dissolve");
    assert_eq!(out, vec![ring, open]);
}

#[test]
fn connected_fragments_merge_in_either_input_order() {
    let a = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    let b = line(&[(2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
    let expected = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);

    assert_eq!(dissolve(vec![a.clone(), b.clone()], EQ).expect("dissolve"), vec![expected.clone()]);
    assert_eq!(dissolve(vec![b, a], EQ).expect("dissolve"), vec![expected]);
}

#[test]
fn short_fragments_still_connect() {
    let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
    let b = line(&[(1.0, 0.0), (2.0, 0.0)]);
    let out = dissolve(vec![a, b], EQ).expect("dissolve");
    assert_eq!(out, vec![line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])]);
}

#[test]
fn overlapping_run_is_collapsed() {
    let a = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0)]);
    let b = line(&[(3.0, 0.0), (4.0, 0.0), (5.0, 0.0), (6.0, 0.0), (7.0, 0.0)]);
    let (out, report) = dissolve_with_report(vec![a.clone(), b.clone()], EQ).expect("dissolve");

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), a.len() + b.len() - 3);
    assert_eq!(out[0][0], Point::new(0.0, 0.0));
    assert_eq!(out[0][7], Point::new(7.0, 0.0));
    assert_eq!(report.candidate_pairs, 1);
    assert_eq!(report.overlaps, 1);
    assert_eq!(report.merges, 1);
}

#[test]
fn clip_points_at_the_seam_are_trimmed() {
    // Each fragment runs one clip point past the shared vertices.
    let a = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (3.4, 0.5)]);
    let b = line(&[(1.6, -0.5), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0)]);
    let out = dissolve(vec![a, b], EQ).expect("dissolve");
    assert_eq!(
        out,
        vec![line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0), (5.0, 0.0)])]
    );
}

#[test]
fn covered_fragment_is_discarded() {
    let a = line(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0), (4.0, 0.0)]);
    let b = line(&[(1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    let (out, report) = dissolve_with_report(vec![a.clone(), b], EQ).expect("dissolve");
    assert_eq!(out, vec![a]);
    assert_eq!(report.contained, 1);
    assert_eq!(report.merges, 0);
}

#[test]
fn fragment_overlapping_itself_closes_into_a_loop() {
    let fragment = line(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 4.0),
        (0.0, 4.0),
        (0.01, 0.0),
        (4.0, 0.01),
        (4.01, 4.0),
    ]);
    let (out, report) = dissolve_with_report(vec![fragment], EQ).expect("dissolve");
    assert_eq!(
        out,
        vec![line(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)])]
    );
    assert_eq!(report.loops_closed, 1);
}

#[test]
fn degenerate_loop_is_dropped() {
    // Tail slack, one matched point, head slack: the loop body keeps only
    // two points.
    let fragment = line(&[(0.0, 10.0), (0.0, 0.0), (5.0, 5.0), (0.0, 0.01), (10.0, 10.0)]);
    let (out, report) = dissolve_with_report(vec![fragment], EQ).expect("dissolve");
    assert!(out.is_empty());
    assert_eq!(report.degenerate_dropped, 1);
}

#[test]
fn split_polygon_round_trips_to_one_ring() {
    let f1 = line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    let f2 = line(&[(10.0, 10.0), (5.0, 15.0), (0.0, 10.0)]);
    let f3 = line(&[(0.0, 10.0), (0.0, 0.0)]);
    let (out, report) = dissolve_with_report(vec![f2, f3, f1], EQ).expect("dissolve");

    assert_eq!(out.len(), 1);
    assert!(is_closed(&out[0], EQ));
    assert_eq!(
        out[0],
        line(&[(10.0, 10.0), (5.0, 15.0), (0.0, 10.0), (0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
    );
    assert_eq!(report.connections, 3);
    assert_eq!(report.merges, 2);
    assert_eq!(report.loops_closed, 1);
}

/// Points `from..=to` of a parabola; every point is distinct.
fn parabola(from: u32, to: u32) -> Line {
    (from..=to)
        .map(|k| Point::new(f64::from(k), f64::from(k * k) * 0.1))
        .collect()
}

#[test]
fn short_bridge_fragment_is_merged_not_discarded() {
    // The middle fragment's last point runs past the end of the first one and
    // is the only link to the third.
    let (out, report) =
        dissolve_with_report(vec![parabola(0, 7), parabola(5, 8), parabola(6, 12)], 0.5)
            .expect("dissolve");
    assert_eq!(out, vec![parabola(0, 12)]);
    assert_eq!(report.contained, 0);
    assert_eq!(report.merges, 2);
}

#[test]
fn ring_split_with_overlapping_seams_closes_again() {
    let ring: Vec<Point> = (0..12_u32)
        .map(|k| {
            let t = f64::from(k) * std::f64::consts::TAU / 12.0;
            Point::new(10.0 * t.cos(), 10.0 * t.sin())
        })
        .collect();
    let arc = |from: usize, count: usize| -> Line {
        (from..from + count).map(|k| ring[k % ring.len()]).collect()
    };
    // Neighbouring fragments share three points; the first and the last
    // share only two points around the short middle fragment.
    let fragments = vec![arc(0, 6), arc(3, 4), arc(4, 11)];

    let (out, report) = dissolve_with_report(fragments.clone(), EQ).expect("dissolve");
    let mut expected = ring.clone();
    expected.push(ring[0]);
    assert_eq!(out, vec![expected]);
    assert_eq!(report.contained, 0);
    assert_eq!(report.loops_closed, 1);

    for shift in 1..fragments.len() {
        let mut rotated = fragments.clone();
        rotated.rotate_left(shift);
        let out = dissolve(rotated, EQ).expect("dissolve");
        assert_eq!(out.len(), 1);
        assert!(is_closed(&out[0], EQ));
        assert_eq!(out[0].len(), ring.len() + 1);
        for p in &ring {
            assert_eq!(out[0][..ring.len()].iter().filter(|&q| q == p).count(), 1);
        }
    }
}

#[test]
fn unrelated_fragments_are_left_alone() {
    let a = line(&[(0.0, 0.0), (1.0, 1.0)]);
    let b = line(&[(100.0, 0.0), (101.0, 1.0)]);
    let out = dissolve(vec![a.clone(), vec![], b.clone()], EQ).expect("dissolve");
    assert_eq!(out, vec![a, b]);
}

#[test]
fn invalid_tolerance_and_coordinates_are_rejected() {
    let a = line(&[(0.0, 0.0), (1.0, 0.0)]);
    for eq in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            dissolve(vec![a.clone()], eq),
            Err(GeomError::InvalidInput { .. })
        ));
    }
    let bad = line(&[(0.0, 0.0), (f64::INFINITY, 0.0)]);
    assert!(matches!(dissolve(vec![bad], EQ), Err(GeomError::InvalidInput { .. })));
}
