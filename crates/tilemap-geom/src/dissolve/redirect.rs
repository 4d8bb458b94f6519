// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Live,
    Redirect(usize),
    Dead,
}

/// Tracks which live fragment currently owns each original fragment id.
///
/// A fragment absorbed by a merge redirects to its absorber; a fragment
/// discarded or closed into a loop is dead, and so is everything that
/// redirects to it.
#[derive(Debug)]
pub(crate) struct RedirectMap {
    slots: Vec<Slot>,
}

impl RedirectMap {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::Live; len],
        }
    }

    /// Live fragment owning `id`, or `None` if its chain ends in a dead slot.
    /// Compresses the visited chain onto the result.
    pub(crate) fn resolve(&mut self, id: usize) -> Option<usize> {
        let mut current = id;
        let mut owner = None;
        for _ in 0..=self.slots.len() {
            match self.slots.get(current)? {
                Slot::Live => {
                    owner = Some(current);
                    break;
                }
                Slot::Redirect(next) => current = *next,
                Slot::Dead => break,
            }
        }
        let target = owner.map_or(Slot::Dead, Slot::Redirect);
        let mut walk = id;
        while let Some(&Slot::Redirect(next)) = self.slots.get(walk) {
            self.slots[walk] = target;
            walk = next;
        }
        owner
    }

    pub(crate) fn redirect(&mut self, from: usize, to: usize) {
        if from != to {
            self.slots[from] = Slot::Redirect(to);
        }
    }

    pub(crate) fn kill(&mut self, id: usize) {
        self.slots[id] = Slot::Dead;
    }

    pub(crate) fn is_live(&self, id: usize) -> bool {
        matches!(self.slots.get(id), Some(Slot::Live))
    }
}
