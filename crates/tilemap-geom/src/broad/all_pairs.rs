// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use crate::error::GeomError;
use crate::types::aabb::Aabb;
use std::collections::BTreeMap;

/// Broad-phase interface for inserting boxes and querying overlapping pairs.
///
/// Implementations must return pairs deterministically: the pair `(a, b)` is
/// canonicalized such that `a < b`, and the full list is sorted ascending by
/// `(a, b)`.
pub trait BroadPhase {
    /// Inserts or updates the box with the given `id`.
    fn upsert(&mut self, id: usize, aabb: Aabb);
    /// Removes a box if present.
    fn remove(&mut self, id: usize);
    /// Returns a canonical, deterministically-ordered list of overlapping pairs.
    fn pairs(&self) -> Result<Vec<(usize, usize)>, GeomError>;
}

/// Reference broad-phase comparing every pair of boxes (`O(n^2)`).
///
/// Kept as a correctness baseline for [`SweepAndPrune`]: both must agree on
/// pair identity, ordering, and inclusive edge-touch semantics.
///
/// [`SweepAndPrune`]: super::sweep_prune::SweepAndPrune
#[derive(Debug, Default)]
pub struct AllPairs {
    items: BTreeMap<usize, Aabb>,
}

impl AllPairs {
    /// Creates an empty set of boxes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }
}

impl BroadPhase for AllPairs {
    fn upsert(&mut self, id: usize, aabb: Aabb) {
        self.items.insert(id, aabb);
    }

    fn remove(&mut self, id: usize) {
        self.items.remove(&id);
    }

    fn pairs(&self) -> Result<Vec<(usize, usize)>, GeomError> {
        // BTreeMap iteration is sorted by key, so nested loops emit canonical
        // pairs already in lexicographic order.
        let items: Vec<(usize, Aabb)> = self.items.iter().map(|(id, bb)| (*id, *bb)).collect();
        let mut out = Vec::new();
        for (i, (a_id, a_bb)) in items.iter().enumerate() {
            for (b_id, b_bb) in items.iter().skip(i + 1) {
                if a_bb.overlaps(b_bb) {
                    out.push((*a_id, *b_id));
                }
            }
        }
        Ok(out)
    }
}
