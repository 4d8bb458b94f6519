// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Dissolving of tile-clipped polyline fragments.
//!
//! Tiling cuts one long line into fragments that touch or overlap at tile
//! seams, usually with one extra clip point on each side of the seam.
//! [`dissolve`] stitches them back together:
//!
//! 1. closed lines pass through unchanged, ahead of everything else;
//! 2. candidate fragment pairs come from the line-pair sweep, and each pair is
//!    classified into [`MergeRecord`]s from its close point pairs;
//! 3. fragments covered by another fragment are discarded;
//! 4. connections, then overlaps by descending length, are merged in order,
//!    skipping entries whose endpoints were consumed by an earlier merge;
//! 5. a merge of a fragment with itself closes it into a loop.
//!
//! The result depends only on the input lines and tolerance.

mod classify;
mod redirect;

pub use classify::{classify_pair, classify_self, MergeRecord, Overlap, MIN_OVERLAP};

use core::cmp::Reverse;

use tracing::debug;

use crate::broad::sweep_prune::close_line_pairs;
use crate::error::{check_tolerance, GeomError};
use crate::types::point::{is_closed, Line};
use redirect::RedirectMap;

/// Counters describing one [`dissolve_with_report`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DissolveReport {
    /// Closed input lines passed through unchanged.
    pub closed_passthrough: usize,
    /// Open fragments entering the pass.
    pub fragments: usize,
    /// Fragment pairs whose inflated boxes overlap.
    pub candidate_pairs: usize,
    /// Connection records found.
    pub connections: usize,
    /// Overlap records found, self-overlaps included.
    pub overlaps: usize,
    /// Fragments discarded as covered by another fragment.
    pub contained: usize,
    /// Merges of two distinct fragments.
    pub merges: usize,
    /// Fragments closed into loops.
    pub loops_closed: usize,
    /// Loops dropped for having fewer than three points.
    pub degenerate_dropped: usize,
    /// Worklist entries skipped because an endpoint was already consumed.
    pub skipped: usize,
}

/// A worklist entry: join `tail`'s end onto `head`'s start.
#[derive(Debug, Clone, Copy)]
struct Join {
    tail: usize,
    head: usize,
    tail_slack: usize,
    head_slack: usize,
    run: usize,
}

impl Join {
    const fn connection(tail: usize, head: usize) -> Self {
        Self {
            tail,
            head,
            tail_slack: 0,
            head_slack: 0,
            run: 1,
        }
    }

    const fn length(&self) -> usize {
        self.run + self.tail_slack + self.head_slack
    }
}

impl From<Overlap> for Join {
    fn from(ov: Overlap) -> Self {
        Self {
            tail: ov.tail,
            head: ov.head,
            tail_slack: ov.tail_slack,
            head_slack: ov.head_slack,
            run: ov.run,
        }
    }
}

/// Original fragment ids whose head and tail a live fragment currently exposes.
#[derive(Debug, Clone, Copy)]
struct Ends {
    head: usize,
    tail: usize,
}

/// Merges open fragments of `lines` into maximal lines and loops.
///
/// See [`dissolve_with_report`].
///
/// # Errors
/// [`GeomError::InvalidInput`] if `equal_dist` is not finite and positive or a
/// coordinate is non-finite.
pub fn dissolve(lines: Vec<Line>, equal_dist: f64) -> Result<Vec<Line>, GeomError> {
    dissolve_with_report(lines, equal_dist).map(|(out, _)| out)
}

/// Merges open fragments of `lines` into maximal lines and loops and reports
/// what the pass did.
///
/// Closed lines come first in the output, in input order, followed by loops
/// in the order they closed and finally the surviving open lines by original
/// fragment order. Empty lines are dropped.
///
/// # Errors
/// [`GeomError::InvalidInput`] if `equal_dist` is not finite and positive or a
/// coordinate is non-finite.
pub fn dissolve_with_report(
    lines: Vec<Line>,
    equal_dist: f64,
) -> Result<(Vec<Line>, DissolveReport), GeomError> {
    check_tolerance(equal_dist)?;
    if lines.iter().flatten().any(|p| !p.is_finite()) {
        return Err(GeomError::InvalidInput {
            reason: "line contains a non-finite coordinate",
        });
    }

    let mut report = DissolveReport::default();
    let mut out: Vec<Line> = Vec::new();
    let mut fragments: Vec<Line> = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if is_closed(&line, equal_dist) {
            out.push(line);
        } else {
            fragments.push(line);
        }
    }
    report.closed_passthrough = out.len();
    report.fragments = fragments.len();

    let pairs = close_line_pairs(&fragments, equal_dist)?;
    report.candidate_pairs = pairs.len();

    let mut records = Vec::new();
    for (a, b) in pairs {
        records.extend(classify_pair(a, &fragments[a], b, &fragments[b], equal_dist)?);
    }
    for (id, fragment) in fragments.iter().enumerate() {
        records.extend(classify_self(id, fragment, equal_dist)?);
    }

    let mut slots = RedirectMap::new(fragments.len());
    let mut covered: Vec<(usize, usize)> = Vec::new();
    let mut joins: Vec<(u8, Join)> = Vec::new();
    for record in records {
        match record {
            MergeRecord::Connection { tail, head } => {
                report.connections += 1;
                joins.push((0, Join::connection(tail, head)));
            }
            MergeRecord::Overlap(ov) => {
                report.overlaps += 1;
                joins.push((1, ov.into()));
            }
            MergeRecord::Containment { covered: id, by } => covered.push((id, by)),
        }
    }

    covered.sort_unstable();
    for (id, by) in covered {
        if slots.is_live(by) && slots.is_live(id) {
            slots.kill(id);
            report.contained += 1;
        }
    }

    joins.sort_unstable_by_key(|&(rank, j)| (rank, Reverse(j.length()), j.tail, j.head));

    let mut ends: Vec<Ends> = (0..fragments.len())
        .map(|id| Ends { head: id, tail: id })
        .collect();
    for (_, join) in joins {
        let (Some(x), Some(y)) = (slots.resolve(join.tail), slots.resolve(join.head)) else {
            report.skipped += 1;
            continue;
        };
        if ends[x].tail != join.tail || ends[y].head != join.head {
            report.skipped += 1;
            continue;
        }

        if x == y {
            let line = std::mem::take(&mut fragments[x]);
            let end = line.len().saturating_sub(join.tail_slack + join.run);
            let start = join.head_slack.min(end);
            let mut body = line[start..end].to_vec();
            slots.kill(x);
            match body.first().copied() {
                Some(first) if body.len() >= MIN_OVERLAP => {
                    body.push(first);
                    out.push(body);
                    report.loops_closed += 1;
                }
                _ => report.degenerate_dropped += 1,
            }
        } else {
            let donor = std::mem::take(&mut fragments[y]);
            let receiver = &mut fragments[x];
            receiver.truncate(receiver.len().saturating_sub(join.tail_slack));
            receiver.extend(donor.into_iter().skip(join.head_slack + join.run));
            ends[x].tail = ends[y].tail;
            slots.redirect(y, x);
            report.merges += 1;
        }
    }

    for (id, fragment) in fragments.into_iter().enumerate() {
        if slots.is_live(id) && !fragment.is_empty() {
            out.push(fragment);
        }
    }

    debug!(
        closed = report.closed_passthrough,
        fragments = report.fragments,
        candidates = report.candidate_pairs,
        merges = report.merges,
        loops = report.loops_closed,
        dropped = report.degenerate_dropped,
        contained = report.contained,
        skipped = report.skipped,
        "dissolve pass finished"
    );
    Ok((out, report))
}
