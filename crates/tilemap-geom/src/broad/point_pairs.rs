// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use std::collections::{BTreeSet, VecDeque};

use super::Coord;
use crate::error::{check_tolerance, GeomError};
use crate::types::point::Point;

/// Points of one stream that are still within `margin` of the sweep in x.
#[derive(Debug, Default)]
struct Window {
    by_x: VecDeque<usize>,
    by_y: BTreeSet<(Coord, usize)>,
}

impl Window {
    fn insert(&mut self, points: &[Point], idx: usize) {
        self.by_x.push_back(idx);
        self.by_y.insert((Coord(points[idx].y), idx));
    }

    /// Drops points whose x fell strictly below `min_x`. Relies on insertion
    /// happening in ascending x.
    fn expire(&mut self, points: &[Point], min_x: f64) {
        while let Some(&front) = self.by_x.front() {
            if points[front].x >= min_x {
                break;
            }
            self.by_x.pop_front();
            self.by_y.remove(&(Coord(points[front].y), front));
        }
    }

    fn band(&self, y: f64, margin: f64) -> impl Iterator<Item = usize> + '_ {
        self.by_y
            .range((Coord(y - margin), 0)..=(Coord(y + margin), usize::MAX))
            .map(|&(_, idx)| idx)
    }

    fn len(&self) -> usize {
        self.by_x.len()
    }

    fn clear(&mut self) {
        self.by_x.clear();
        self.by_y.clear();
    }
}

/// Lazy sweep over two point sequences yielding index pairs `(i, j)` with
/// `a[i].dist_sq(&b[j]) < margin²`.
///
/// Built by [`close_point_pairs`]. Pairs come out in sweep order (ascending x
/// of the later point of the pair); callers needing a canonical order sort.
#[derive(Debug)]
pub struct PointPairs<'a> {
    a: &'a [Point],
    b: &'a [Point],
    order_a: Vec<usize>,
    order_b: Vec<usize>,
    next_a: usize,
    next_b: usize,
    window_a: Window,
    window_b: Window,
    margin: f64,
    margin_sq: f64,
    pending: VecDeque<(usize, usize)>,
}

impl PointPairs<'_> {
    /// Number of points held in the two x-windows.
    ///
    /// Zero once the iterator has returned `None`.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.window_a.len() + self.window_b.len()
    }
}

impl Iterator for PointPairs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pair) = self.pending.pop_front() {
                return Some(pair);
            }
            let take_a = match (self.order_a.get(self.next_a), self.order_b.get(self.next_b)) {
                (Some(&ia), Some(&ib)) => self.a[ia].x <= self.b[ib].x,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => {
                    self.window_a.clear();
                    self.window_b.clear();
                    return None;
                }
            };

            if take_a {
                let ia = self.order_a[self.next_a];
                self.next_a += 1;
                let p = self.a[ia];
                self.window_b.expire(self.b, p.x - self.margin);
                for ib in self.window_b.band(p.y, self.margin) {
                    if p.dist_sq(&self.b[ib]) < self.margin_sq {
                        self.pending.push_back((ia, ib));
                    }
                }
                self.window_a.insert(self.a, ia);
            } else {
                let ib = self.order_b[self.next_b];
                self.next_b += 1;
                let p = self.b[ib];
                self.window_a.expire(self.a, p.x - self.margin);
                for ia in self.window_a.band(p.y, self.margin) {
                    if p.dist_sq(&self.a[ia]) < self.margin_sq {
                        self.pending.push_back((ia, ib));
                    }
                }
                self.window_b.insert(self.b, ib);
            }
        }
    }
}

fn x_order(points: &[Point]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    // Stable: equal x keeps index order.
    order.sort_by(|&i, &j| points[i].x.total_cmp(&points[j].x));
    order
}

/// Starts a sweep reporting every pair `(i, j)` with `a[i]` strictly closer
/// than `margin` to `b[j]`.
///
/// Inputs need not be sorted; the sweep orders indices by x itself. Total
/// cost is `O((n + m) log(n + m) + k)` for `k` candidate pairs in the y-band.
///
/// Unlike [`close_line_pairs`](crate::close_line_pairs), a zero margin is
/// rejected: no distance is strictly below zero, so the sweep could never
/// report a pair.
///
/// # Errors
/// [`GeomError::InvalidInput`] if `margin` is not finite and positive.
pub fn close_point_pairs<'a>(
    a: &'a [Point],
    b: &'a [Point],
    margin: f64,
) -> Result<PointPairs<'a>, GeomError> {
    check_tolerance(margin)?;
    Ok(PointPairs {
        a,
        b,
        order_a: x_order(a),
        order_b: x_order(b),
        next_a: 0,
        next_b: 0,
        window_a: Window::default(),
        window_b: Window::default(),
        margin,
        margin_sq: margin * margin,
        pending: VecDeque::new(),
    })
}
