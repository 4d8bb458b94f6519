// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tile geometry decoding and per-group shape processing.
//!
//! Features decoded from tiles are grouped by kind, layer and tags
//! ([`group_features`]); each group then runs the processing steps its map
//! configuration names ([`process_group`], or [`process_groups`] to handle
//! independent groups in parallel).

pub mod decode;
pub mod process;
pub mod shape;

pub use decode::{decode_geometry, zigzag, DecodeError, TileFrame};
pub use process::{
    apply_step, fir_filter_line, fir_filter_ring, process_group, process_groups,
    process_with_config, remove_small_shapes, ProcessError, ProcessedGroup,
};
pub use shape::{group_features, Feature, ShapeGroup, ShapeKind, Tags};
