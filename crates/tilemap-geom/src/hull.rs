// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Convex hull via octagon pruning followed by gift wrapping (Jarvis march).
//!
//! Conventions:
//! - "Outside" an edge `a -> b` means `p.cross(a, b) > 0`; the march picks
//!   the next vertex so that no point is outside the new edge. In a y-up frame
//!   the hull therefore comes out clockwise.
//! - Exactly collinear points never win on turn; among collinear candidates
//!   the farthest one is taken, so only true extreme vertices are reported.
//!
//! Cost is `O(n * h)` for `h` hull vertices. Densely sampled map shapes have
//! small hulls, and the pruning pass drops most interior points first.

use core::cmp::Ordering;

use crate::error::GeomError;
use crate::types::point::Point;

/// Inputs larger than this run the octagon pruning pass before the march.
pub const PRUNE_THRESHOLD: usize = 100;

/// Computes the convex hull of `points`.
///
/// The result starts at the leftmost point (lowest on ties), lists each
/// extreme vertex once, and does not repeat the first vertex at the end.
/// Fully collinear inputs yield their two extreme points.
///
/// # Errors
/// [`GeomError::InvalidInput`] if `points` is empty, contains a non-finite
/// coordinate, or does not contain two distinct points.
pub fn convex_hull(points: &[Point]) -> Result<Vec<Point>, GeomError> {
    let Some(first) = points.first() else {
        return Err(GeomError::InvalidInput {
            reason: "convex hull of an empty point set",
        });
    };
    if points.iter().any(|p| !p.is_finite()) {
        return Err(GeomError::InvalidInput {
            reason: "convex hull input contains a non-finite coordinate",
        });
    }
    if points.iter().all(|p| p == first) {
        return Err(GeomError::InvalidInput {
            reason: "convex hull needs at least two distinct points",
        });
    }

    if points.len() > PRUNE_THRESHOLD {
        let kept = prune_interior(points);
        Ok(jarvis_march(&kept))
    } else {
        Ok(jarvis_march(points))
    }
}

/// Perimeter of the closed polygon described by `hull` (last vertex joins the first).
#[must_use]
pub fn hull_perimeter(hull: &[Point]) -> f64 {
    hull.iter()
        .zip(hull.iter().cycle().skip(1))
        .map(|(a, b)| a.dist(b))
        .sum()
}

/// Mean width of a point set: perimeter of its convex hull divided by π.
///
/// # Errors
/// Propagates [`convex_hull`] errors.
pub fn mean_width(points: &[Point]) -> Result<f64, GeomError> {
    let hull = convex_hull(points)?;
    Ok(hull_perimeter(&hull) / core::f64::consts::PI)
}

type Key = fn(&Point) -> f64;

const EXTREMAL_KEYS: [Key; 4] = [|p| p.x, |p| p.x + p.y, |p| p.y, |p| p.y - p.x];

/// Up to eight support points: minimizers of `x`, `x+y`, `y`, `y-x`, then the
/// maximizers of the same keys, first-seen on ties, duplicates removed.
///
/// Taken in this order the points walk the boundary counter-clockwise (y-up),
/// so interior points are strictly left of (`cross > 0`) every edge.
fn extremal_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(8);
    let minimizers = EXTREMAL_KEYS.iter().map(|key| extreme_by(points, *key, |a, b| a < b));
    let maximizers = EXTREMAL_KEYS.iter().map(|key| extreme_by(points, *key, |a, b| a > b));
    for p in minimizers.chain(maximizers).flatten() {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

fn extreme_by(points: &[Point], key: Key, better: fn(f64, f64) -> bool) -> Option<Point> {
    points
        .iter()
        .copied()
        .reduce(|best, p| if better(key(&p), key(&best)) { p } else { best })
}

/// Drops points strictly inside the extremal octagon. Octagon vertices and
/// points on or outside any of its edges are kept.
fn prune_interior(points: &[Point]) -> Vec<Point> {
    let polygon = extremal_points(points);
    if polygon.len() < 3 {
        return points.to_vec();
    }
    let edges: Vec<(Point, Point)> = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| (*a, *b))
        .collect();
    points
        .iter()
        .filter(|p| polygon.contains(p) || edges.iter().any(|(a, b)| p.cross(a, b) <= 0.0))
        .copied()
        .collect()
}

fn leftmost(points: &[Point]) -> Option<Point> {
    points.iter().copied().reduce(|best, p| {
        if (p.x, p.y) < (best.x, best.y) {
            p
        } else {
            best
        }
    })
}

/// Gift wrapping over `points`; callers guarantee two distinct points.
fn jarvis_march(points: &[Point]) -> Vec<Point> {
    let Some(start) = leftmost(points) else {
        return Vec::new();
    };
    let mut hull = vec![start];
    // Each round either closes the loop or adds a distinct input point.
    for _ in 0..points.len() {
        let current = hull[hull.len() - 1];
        let Some(mut next) = points.iter().copied().find(|p| *p != current) else {
            break;
        };
        for p in points {
            if *p == current || *p == next {
                continue;
            }
            let more_extreme = match p.cross(&current, &next).partial_cmp(&0.0) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => current.dist_sq(p) > current.dist_sq(&next),
                _ => false,
            };
            if more_extreme {
                next = *p;
            }
        }
        if hull.contains(&next) {
            break;
        }
        hull.push(next);
    }
    hull
}
