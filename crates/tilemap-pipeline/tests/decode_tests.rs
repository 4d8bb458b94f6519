// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Integration tests for the geometry command decoder.

use tilemap_geom::Point;
use tilemap_pipeline::{decode_geometry, DecodeError, TileFrame};

fn unit_frame() -> TileFrame {
    TileFrame::for_tile(Point::new(0.0, 0.0), 4096.0, 0, 0, 4096).unwrap()
}

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

#[test]
fn line_string_accumulates_deltas() {
    // MoveTo(25, 17), LineTo(+0, +10), (+10, +0)
    let commands = [9, 50, 34, 18, 0, 20, 20, 0];
    let shapes = decode_geometry(&commands, &unit_frame()).unwrap();
    assert_eq!(shapes, vec![pts(&[(25.0, 17.0), (25.0, 27.0), (35.0, 27.0)])]);
}

#[test]
fn close_path_repeats_the_first_point() {
    // MoveTo(0, 0), LineTo(+10, 0), (0, +10), ClosePath
    let commands = [9, 0, 0, 18, 20, 0, 0, 20, 15];
    let shapes = decode_geometry(&commands, &unit_frame()).unwrap();
    assert_eq!(
        shapes,
        vec![pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)])]
    );
}

#[test]
fn each_move_to_starts_a_shape_and_the_cursor_carries_over() {
    // MoveTo(0, 0), LineTo(+10, 0), MoveTo(+0, +10), LineTo(-10, 0)
    let commands = [9, 0, 0, 10, 20, 0, 9, 0, 20, 10, 19, 0];
    let shapes = decode_geometry(&commands, &unit_frame()).unwrap();
    assert_eq!(
        shapes,
        vec![
            pts(&[(0.0, 0.0), (10.0, 0.0)]),
            pts(&[(10.0, 10.0), (0.0, 10.0)]),
        ]
    );

    // Multi-point: one MoveTo with two pairs.
    let shapes = decode_geometry(&[17, 2, 4, 6, 8], &unit_frame()).unwrap();
    assert_eq!(shapes, vec![pts(&[(1.0, 2.0)]), pts(&[(4.0, 6.0)])]);
}

#[test]
fn tile_frame_places_and_scales_coordinates() {
    let frame = TileFrame::for_tile(Point::new(100.0, 200.0), 1000.0, 2, 3, 500).unwrap();
    assert_eq!(frame.origin, Point::new(2100.0, 3200.0));
    assert_eq!(frame.scale, 2.0);
    let shapes = decode_geometry(&[9, 2, 4], &frame).unwrap();
    assert_eq!(shapes, vec![pts(&[(2102.0, 3204.0)])]);

    let bb = frame.tile_box();
    assert_eq!(bb.min(), Point::new(2100.0, 3200.0));
    assert_eq!(bb.max(), Point::new(3100.0, 4200.0));
    assert!(bb.contains(&shapes[0][0]));
    assert!(bb.contains(&Point::new(3100.0, 4200.0)));
    // Past the extent: MoveTo(501, 0) lands one tile unit beyond the edge.
    let beyond = decode_geometry(&[9, 1002, 0], &frame).unwrap();
    assert!(!bb.contains(&beyond[0][0]));

    assert!(matches!(
        TileFrame::for_tile(Point::new(0.0, 0.0), 1.0, 0, 0, 0),
        Err(DecodeError::InvalidFrame { .. })
    ));
}

#[test]
fn malformed_streams_are_rejected() {
    let frame = unit_frame();
    assert_eq!(
        decode_geometry(&[11], &frame),
        Err(DecodeError::UnknownCommand { id: 3, offset: 0 })
    );
    assert_eq!(
        decode_geometry(&[9, 50], &frame),
        Err(DecodeError::TruncatedParameters {
            id: 1,
            offset: 0,
            needed: 2,
            available: 1,
        })
    );
    assert_eq!(
        decode_geometry(&[10, 2, 2], &frame),
        Err(DecodeError::MissingMoveTo { offset: 0 })
    );
    assert_eq!(
        decode_geometry(&[15], &frame),
        Err(DecodeError::MissingMoveTo { offset: 0 })
    );
    assert_eq!(decode_geometry(&[], &frame), Ok(vec![]));
}
