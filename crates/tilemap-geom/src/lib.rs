// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![doc = r"Planar geometry core for tiled vector maps.

This crate provides:
- Points, polylines and axis-aligned bounding boxes (`Point`, `Line`, `Aabb`).
- Convex hulls with octagon pruning and gift wrapping (`convex_hull`).
- Proximity sweeps: line pairs with overlapping boxes (`close_line_pairs`)
  and close point pairs between two lines (`close_point_pairs`).
- Dissolving of tile-clipped polyline fragments into maximal lines and loops
  (`dissolve`).

Design notes:
- Deterministic: outputs depend only on inputs; pair lists are canonical.
- `f64` throughout; distance tests compare squared distances.
- No global state; every call owns its working structures.
"]

/// Proximity sweeps over boxes and points.
pub mod broad;
/// Merging of tile-clipped polyline fragments.
pub mod dissolve;
/// Convex hull and mean width.
pub mod hull;
/// Foundational geometric types.
pub mod types;

mod error;

pub use broad::all_pairs::{AllPairs, BroadPhase};
pub use broad::point_pairs::{close_point_pairs, PointPairs};
pub use broad::sweep_prune::{close_line_pairs, ActiveIntervals, SweepAndPrune};
pub use dissolve::{dissolve, dissolve_with_report, DissolveReport, MergeRecord};
pub use error::GeomError;
pub use hull::{convex_hull, hull_perimeter, mean_width};
pub use types::aabb::Aabb;
pub use types::point::{is_closed, Line, Point};
