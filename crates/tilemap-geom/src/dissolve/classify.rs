// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use core::cmp::Reverse;

use crate::broad::point_pairs::close_point_pairs;
use crate::error::GeomError;
use crate::types::point::Point;

/// Minimum overlap length (and minimum fragment length) for overlap merges.
pub const MIN_OVERLAP: usize = 3;

/// Unmatched points tolerated between a run and a fragment boundary.
const MAX_SLACK: usize = 1;

/// How two fragments fit together; produced per candidate pair and consumed
/// by the merge worklist of the same dissolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeRecord {
    /// The last point of `tail` coincides with the first point of `head`.
    Connection {
        /// Fragment whose end is joined.
        tail: usize,
        /// Fragment whose start is joined.
        head: usize,
    },
    /// Trailing points of `tail` coincide with leading points of `head`.
    Overlap(Overlap),
    /// `covered` lies entirely along `by`, up to one point at either end.
    Containment {
        /// Fragment to discard.
        covered: usize,
        /// Fragment that covers it.
        by: usize,
    },
}

/// A run of coincident points at the tail of one fragment and the head of
/// another (or of the same fragment, for a self-closing loop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    /// Fragment whose trailing points overlap.
    pub tail: usize,
    /// Fragment whose leading points overlap.
    pub head: usize,
    /// Points of `tail` after the run.
    pub tail_slack: usize,
    /// Points of `head` before the run.
    pub head_slack: usize,
    /// Number of matched point pairs in the run.
    pub run: usize,
}

impl Overlap {
    /// Overlap length: run plus slack at both ends.
    #[must_use]
    pub fn length(&self) -> usize {
        self.run + self.tail_slack + self.head_slack
    }
}

/// Maximal diagonal run of matched pairs `(i + k, j + k)` for `k < len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    i: usize,
    j: usize,
    len: usize,
}

fn diagonal_runs(mut pairs: Vec<(usize, usize)>) -> Vec<Run> {
    pairs.sort_unstable_by_key(|&(i, j)| (j.wrapping_sub(i), i));
    let mut runs: Vec<Run> = Vec::new();
    for (i, j) in pairs {
        match runs.last_mut() {
            Some(run) if run.i + run.len == i && run.j + run.len == j => run.len += 1,
            _ => runs.push(Run { i, j, len: 1 }),
        }
    }
    runs
}

/// Slack pair `(tail_slack, head_slack)` if a run starting at `tail_start` in
/// a fragment of `tail_len` points and at `head_start` in the other reaches
/// both boundaries closely enough and is long enough.
fn tail_head_slack(
    tail_start: usize,
    tail_len: usize,
    head_start: usize,
    run: usize,
) -> Option<(usize, usize)> {
    let tail_slack = tail_len.checked_sub(tail_start + run)?;
    let head_slack = head_start;
    (tail_slack <= MAX_SLACK
        && head_slack <= MAX_SLACK
        && run + tail_slack + head_slack >= MIN_OVERLAP)
        .then_some((tail_slack, head_slack))
}

/// Longest candidate; ties go to the run starting earliest in the tail, then
/// in the head.
fn best_overlap(candidates: impl Iterator<Item = (usize, usize, Overlap)>) -> Option<Overlap> {
    candidates
        .min_by_key(|&(tail_start, head_start, ov)| (Reverse(ov.length()), tail_start, head_start))
        .map(|(_, _, ov)| ov)
}

/// Whether a run starting at `start` of a `len`-point fragment covers it,
/// given the run starts at `by_start` of the `by_len`-point covering fragment.
///
/// A slack point only counts where the coverer continues past the run on the
/// same side; a slack point sticking out beyond the coverer's end may be the
/// bridge to a third fragment.
fn covers(start: usize, len: usize, by_start: usize, by_len: usize, run: usize) -> bool {
    let head_ok = start == 0 || by_start > 0;
    let tail_ok = start + run == len || by_start + run < by_len;
    len >= MIN_OVERLAP
        && run >= 2
        && start <= MAX_SLACK
        && start + run + MAX_SLACK >= len
        && head_ok
        && tail_ok
}

/// Classifies how fragments `a` and `b` fit together.
///
/// Emits, per direction, either a connection or the best overlap, plus at
/// most one containment record. Output is independent of the order in which
/// point pairs are discovered.
///
/// # Errors
/// [`GeomError::InvalidInput`] if `equal_dist` is not finite and positive.
pub fn classify_pair(
    a_id: usize,
    a: &[Point],
    b_id: usize,
    b: &[Point],
    equal_dist: f64,
) -> Result<Vec<MergeRecord>, GeomError> {
    let (n, m) = (a.len(), b.len());
    let (Some(a_first), Some(a_last), Some(b_first), Some(b_last)) =
        (a.first(), a.last(), b.first(), b.last())
    else {
        return Ok(Vec::new());
    };
    let runs = diagonal_runs(close_point_pairs(a, b, equal_dist)?.collect());
    let eq_sq = equal_dist * equal_dist;
    let overlap_eligible = n >= MIN_OVERLAP && m >= MIN_OVERLAP;
    let mut records = Vec::new();

    // a's tail onto b's head
    if a_last.dist_sq(b_first) < eq_sq {
        records.push(MergeRecord::Connection {
            tail: a_id,
            head: b_id,
        });
    } else if overlap_eligible {
        let best = best_overlap(runs.iter().filter_map(|r| {
            let (tail_slack, head_slack) = tail_head_slack(r.i, n, r.j, r.len)?;
            Some((
                r.i,
                r.j,
                Overlap {
                    tail: a_id,
                    head: b_id,
                    tail_slack,
                    head_slack,
                    run: r.len,
                },
            ))
        }));
        records.extend(best.map(MergeRecord::Overlap));
    }

    // b's tail onto a's head
    if b_last.dist_sq(a_first) < eq_sq {
        records.push(MergeRecord::Connection {
            tail: b_id,
            head: a_id,
        });
    } else if overlap_eligible {
        let best = best_overlap(runs.iter().filter_map(|r| {
            let (tail_slack, head_slack) = tail_head_slack(r.j, m, r.i, r.len)?;
            Some((
                r.j,
                r.i,
                Overlap {
                    tail: b_id,
                    head: a_id,
                    tail_slack,
                    head_slack,
                    run: r.len,
                },
            ))
        }));
        records.extend(best.map(MergeRecord::Overlap));
    }

    let a_covered = runs.iter().any(|r| covers(r.i, n, r.j, m, r.len));
    let b_covered = runs.iter().any(|r| covers(r.j, m, r.i, n, r.len));
    let discard_a = match (a_covered, b_covered) {
        (true, true) => Some(n < m || (n == m && a_id > b_id)),
        (true, false) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    };
    records.extend(discard_a.map(|discard_a| {
        if discard_a {
            MergeRecord::Containment {
                covered: a_id,
                by: b_id,
            }
        } else {
            MergeRecord::Containment {
                covered: b_id,
                by: a_id,
            }
        }
    }));
    Ok(records)
}

/// Finds the best overlap of a fragment's tail with its own head.
///
/// The tail run must start strictly after the head run ends, so the trivial
/// diagonal and near-diagonal matches of densely sampled lines never count.
///
/// # Errors
/// [`GeomError::InvalidInput`] if `equal_dist` is not finite and positive.
pub fn classify_self(
    id: usize,
    line: &[Point],
    equal_dist: f64,
) -> Result<Option<MergeRecord>, GeomError> {
    let n = line.len();
    if n < MIN_OVERLAP {
        return Ok(None);
    }
    let pairs: Vec<(usize, usize)> = close_point_pairs(line, line, equal_dist)?
        .filter(|&(i, j)| i > j)
        .collect();
    let best = best_overlap(diagonal_runs(pairs).into_iter().filter_map(|r| {
        if r.i < r.j + r.len {
            return None;
        }
        let (tail_slack, head_slack) = tail_head_slack(r.i, n, r.j, r.len)?;
        Some((
            r.i,
            r.j,
            Overlap {
                tail: id,
                head: id,
                tail_slack,
                head_slack,
                run: r.len,
            },
        ))
    }));
    Ok(best.map(MergeRecord::Overlap))
}
