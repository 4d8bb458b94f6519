// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Core geometry types shared by the hull, sweep, and dissolve code.
//!
//! Notes:
//! - Overlap semantics are inclusive on edges so that fragments meeting
//!   exactly on a tile seam are still paired.
//! - Distances are compared squared against squared tolerances; no square
//!   roots on the hot paths.

#[doc = "Axis-aligned bounding boxes (map space)."]
pub mod aabb;
#[doc = "Points, polylines, and the closed-line test."]
pub mod point;
