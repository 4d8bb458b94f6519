// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad-phase proximity: which lines (and which points of two lines) are
//! close enough to be worth an exact comparison.
//!
//! Determinism contract (applies to every implementation here):
//! - Pair identity is canonicalized as `(min_id, max_id)`.
//! - Emitted pair lists are strictly sorted lexicographically by that tuple.
//! - Overlap is inclusive on edges (touching boxes are overlapping).
//! - Sweep structures are empty once a sweep completes; anything left over is
//!   reported as [`GeomError::StructuralInvariantViolation`].
//!
//! [`GeomError::StructuralInvariantViolation`]: crate::GeomError::StructuralInvariantViolation

use core::cmp::Ordering;

#[doc = "Broad-phase trait and the `O(n^2)` reference implementation."]
pub mod all_pairs;
#[doc = "Point-level sweep reporting close point pairs between two lines."]
pub mod point_pairs;
#[doc = "Sweep-and-prune over x with an ordered y-interval structure."]
pub mod sweep_prune;

/// Totally ordered wrapper for sweep keys.
///
/// Uses IEEE-754 `totalOrder`, so keys sort deterministically even if a caller
/// slips a NaN past validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Coord(pub(crate) f64);

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Coord {}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Canonical `(min, max)` ordering of an id pair.
pub(crate) fn canonical(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
