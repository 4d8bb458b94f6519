// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

/// A point in the shared planar map coordinate system.
///
/// Conventions:
/// - Coordinates are `f64` map units (tile decoders produce meters for
///   projected sources, so values routinely reach the millions).
/// - Equality is exact; tolerance-based comparisons go through
///   [`Point::dist_sq`] against a squared tolerance.
/// - With the `serde` feature enabled a point is encoded as `[x, y]`.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 2]", into = "[f64; 2]"))]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point from its coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn dist_sq(&self, other: &Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn dist(&self, other: &Self) -> f64 {
        self.dist_sq(other).sqrt()
    }

    /// Returns `true` when both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// 2-D cross product of `(b - a)` and `(self - a)`.
    ///
    /// Positive when `self` lies to the left of the directed edge `a -> b`
    /// in a y-up frame, zero when collinear.
    #[must_use]
    pub fn cross(&self, a: &Self, b: &Self) -> f64 {
        (b.x - a.x) * (self.y - a.y) - (b.y - a.y) * (self.x - a.x)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// An ordered polyline. Must hold at least one point to be meaningful.
pub type Line = Vec<Point>;

/// Returns `true` if the first and last point of `line` coincide within
/// `equal_dist` (strict, squared comparison).
///
/// An empty line is never closed; a single-point line always is.
#[must_use]
pub fn is_closed(line: &[Point], equal_dist: f64) -> bool {
    match (line.first(), line.last()) {
        (Some(first), Some(last)) => first.dist_sq(last) < equal_dist * equal_dist,
        _ => false,
    }
}
