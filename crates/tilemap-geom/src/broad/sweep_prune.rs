// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::{BTreeMap, BTreeSet};

use super::all_pairs::BroadPhase;
use super::{canonical, Coord};
use crate::error::GeomError;
use crate::types::aabb::Aabb;
use crate::types::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bound {
    Lo,
    Hi,
}

type MarkerKey = (Coord, usize, Bound);

/// Ordered-by-y set of the boxes currently crossed by the sweep line.
///
/// Every active box contributes two markers, one at each end of its
/// y-interval. Each marker owns the set of active boxes whose y-interval
/// covers the marker's `y`, so a range query only has to look at markers
/// inside the range plus the covering set of the nearest marker below it.
///
/// Invariant: a box id appears in the covering set of marker `m` iff the box
/// is active and `lo <= m.y <= hi`.
#[derive(Debug, Default)]
pub struct ActiveIntervals {
    markers: BTreeMap<MarkerKey, BTreeSet<usize>>,
    spans: BTreeMap<usize, (f64, f64)>,
}

impl ActiveIntervals {
    /// Creates an empty structure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` when no box and no marker is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.markers.is_empty()
    }

    /// Active boxes whose y-interval intersects `[lo, hi]` (inclusive), ascending.
    #[must_use]
    pub fn query(&self, lo: f64, hi: f64) -> BTreeSet<usize> {
        let mut hits = BTreeSet::new();
        if let Some((_, covering)) = self.markers.range(..(Coord(lo), 0, Bound::Lo)).next_back() {
            hits.extend(covering.iter().copied().filter(|id| {
                self.spans
                    .get(id)
                    .is_some_and(|&(_, other_hi)| other_hi >= lo)
            }));
        }
        hits.extend(
            self.markers
                .range((Coord(lo), 0, Bound::Lo)..=(Coord(hi), usize::MAX, Bound::Hi))
                .map(|(&(_, id, _), _)| id),
        );
        hits
    }

    /// Activates box `id` spanning `[lo, hi]` in y and returns the ids of the
    /// active boxes it intersects, ascending.
    ///
    /// Re-inserting an active id replaces its previous interval.
    pub fn insert(&mut self, id: usize, lo: f64, hi: f64) -> Vec<usize> {
        self.remove(id);
        let hits = self.query(lo, hi);

        for (_, covering) in self
            .markers
            .range_mut((Coord(lo), 0, Bound::Lo)..=(Coord(hi), usize::MAX, Bound::Hi))
        {
            covering.insert(id);
        }

        let covering_at = |y: f64| -> BTreeSet<usize> {
            hits.iter()
                .copied()
                .filter(|other| {
                    self.spans
                        .get(other)
                        .is_some_and(|&(o_lo, o_hi)| o_lo <= y && y <= o_hi)
                })
                .chain(core::iter::once(id))
                .collect()
        };
        let lo_covering = covering_at(lo);
        let hi_covering = covering_at(hi);

        self.markers.insert((Coord(lo), id, Bound::Lo), lo_covering);
        self.markers.insert((Coord(hi), id, Bound::Hi), hi_covering);
        self.spans.insert(id, (lo, hi));
        hits.into_iter().collect()
    }

    /// Deactivates box `id`; returns `false` if it was not active.
    pub fn remove(&mut self, id: usize) -> bool {
        let Some((lo, hi)) = self.spans.remove(&id) else {
            return false;
        };
        for (_, covering) in self
            .markers
            .range_mut((Coord(lo), 0, Bound::Lo)..=(Coord(hi), usize::MAX, Bound::Hi))
        {
            covering.remove(&id);
        }
        self.markers.remove(&(Coord(lo), id, Bound::Lo));
        self.markers.remove(&(Coord(hi), id, Bound::Hi));
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    // Starts sort before ends at equal x so touching boxes pair up.
    Start,
    End,
}

/// Sweep-and-prune broad phase: sweeps box x-extents in order while an
/// [`ActiveIntervals`] structure answers y-overlap queries.
///
/// Cost is `O((n + k) log n)` plus the covering-set upkeep, for `k` reported
/// pairs, instead of the `O(n^2)` of [`AllPairs`].
///
/// [`AllPairs`]: super::all_pairs::AllPairs
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    items: BTreeMap<usize, Aabb>,
}

impl SweepAndPrune {
    /// Creates an empty broad phase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of boxes currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if no box is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BroadPhase for SweepAndPrune {
    fn upsert(&mut self, id: usize, aabb: Aabb) {
        self.items.insert(id, aabb);
    }

    fn remove(&mut self, id: usize) {
        self.items.remove(&id);
    }

    fn pairs(&self) -> Result<Vec<(usize, usize)>, GeomError> {
        let mut events: Vec<(Coord, Edge, usize, Aabb)> = Vec::with_capacity(self.items.len() * 2);
        for (&id, bb) in &self.items {
            events.push((Coord(bb.min().x), Edge::Start, id, *bb));
            events.push((Coord(bb.max().x), Edge::End, id, *bb));
        }
        events.sort_unstable_by_key(|&(x, edge, id, _)| (x, edge, id));

        let mut active = ActiveIntervals::new();
        let mut pairs = BTreeSet::new();
        for (_, edge, id, bb) in events {
            match edge {
                Edge::Start => {
                    for other in active.insert(id, bb.min().y, bb.max().y) {
                        pairs.insert(canonical(id, other));
                    }
                }
                Edge::End => {
                    active.remove(id);
                }
            }
        }

        if !active.is_empty() {
            return Err(GeomError::StructuralInvariantViolation {
                remaining: active.len(),
            });
        }
        Ok(pairs.into_iter().collect())
    }
}

/// Pairs of lines whose bounding boxes, inflated by `margin`, overlap.
///
/// Returned pairs index into `lines`, are canonical `(smaller, larger)`, and
/// sorted ascending. Empty lines have no box and never pair.
///
/// A zero margin is allowed: box overlap is inclusive, so lines whose boxes
/// touch still pair. [`close_point_pairs`](crate::close_point_pairs) compares
/// distances strictly and needs a positive margin instead.
///
/// # Errors
/// - [`GeomError::InvalidInput`] if `margin` is negative or non-finite, or a
///   coordinate is non-finite.
/// - [`GeomError::StructuralInvariantViolation`] if the sweep leaks state.
pub fn close_line_pairs<L>(lines: &[L], margin: f64) -> Result<Vec<(usize, usize)>, GeomError>
where
    L: AsRef<[Point]>,
{
    if !(margin.is_finite() && margin >= 0.0) {
        return Err(GeomError::InvalidInput {
            reason: "margin must be finite and non-negative",
        });
    }
    let mut broad = SweepAndPrune::new();
    for (id, line) in lines.iter().enumerate() {
        let points = line.as_ref();
        if points.iter().any(|p| !p.is_finite()) {
            return Err(GeomError::InvalidInput {
                reason: "line contains a non-finite coordinate",
            });
        }
        if let Some(bb) = Aabb::from_points(points) {
            broad.upsert(id, bb.inflate(margin));
        }
    }
    broad.pairs()
}
