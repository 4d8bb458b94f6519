// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use super::point::Point;

/// Axis-aligned bounding box in map coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Boxes are values: inflating produces a new box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Point,
    max: Point,
}

impl Aabb {
    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Point {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Point {
        self.max
    }

    /// Builds a box centered at `center` with half-extents `hx, hy`.
    #[must_use]
    pub fn from_center_half_extents(center: Point, hx: f64, hy: f64) -> Self {
        let (hx, hy) = (hx.abs(), hy.abs());
        Self {
            min: Point::new(center.x - hx, center.y - hy),
            max: Point::new(center.x + hx, center.y + hy),
        }
    }

    /// Builds the minimal box that contains all `points`, or `None` if empty.
    #[must_use]
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = Point::new(min.x.min(p.x), min.y.min(p.y));
            max = Point::new(max.x.max(p.x), max.y.max(p.y));
        }
        Some(Self { min, max })
    }

    /// Returns `true` if this box overlaps another (inclusive on edges).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        // Touching edges count as overlap so fragments meeting exactly at a
        // tile seam still pair up.
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y)
    }

    /// Inflates the box by a uniform margin `m` in all directions.
    ///
    /// Negative margins are treated as their absolute value.
    #[must_use]
    pub fn inflate(&self, m: f64) -> Self {
        let m = m.abs();
        Self {
            min: Point::new(self.min.x - m, self.min.y - m),
            max: Point::new(self.max.x + m, self.max.y + m),
        }
    }

    /// Returns `true` if `p` lies inside or on the boundary of the box.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
