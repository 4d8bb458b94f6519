// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Decoded features and the groups they are processed in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tilemap_geom::Line;

/// Geometry type of a tile feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Single points or multi-points (tile geometry type 1).
    Point,
    /// Open or closed polylines (tile geometry type 2).
    LineString,
    /// Polygon rings (tile geometry type 3).
    Polygon,
}

impl ShapeKind {
    /// Kind for a tile geometry type code, `None` for unknown codes.
    pub const fn from_geom_type(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Point),
            2 => Some(Self::LineString),
            3 => Some(Self::Polygon),
            _ => None,
        }
    }

    /// Tile geometry type code.
    pub const fn geom_type(self) -> u32 {
        match self {
            Self::Point => 1,
            Self::LineString => 2,
            Self::Polygon => 3,
        }
    }
}

/// Feature attributes, ordered by key.
pub type Tags = BTreeMap<String, serde_json::Value>;

/// One decoded shape with its layer and attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Source layer name.
    pub layer: String,
    /// Geometry type.
    pub kind: ShapeKind,
    /// Attributes.
    #[serde(default)]
    pub tags: Tags,
    /// Points in map coordinates.
    pub shape: Line,
}

/// Shapes sharing kind, layer and tags, processed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeGroup {
    /// Source layer name.
    pub layer: String,
    /// Geometry type shared by every shape.
    pub kind: ShapeKind,
    /// Attributes shared by every shape.
    #[serde(default)]
    pub tags: Tags,
    /// The shapes.
    pub shapes: Vec<Line>,
}

impl ShapeGroup {
    /// Shapes whose last point equals their first.
    pub fn closed_count(&self) -> usize {
        self.shapes
            .iter()
            .filter(|s| s.len() > 1 && s.first() == s.last())
            .count()
    }
}

/// Collects features into groups of equal kind, layer and tags.
///
/// Groups appear in the order their first feature appears; shapes keep
/// their input order within a group.
pub fn group_features(features: impl IntoIterator<Item = Feature>) -> Vec<ShapeGroup> {
    let mut groups: Vec<ShapeGroup> = Vec::new();
    for feature in features {
        let existing = groups
            .iter_mut()
            .find(|g| g.kind == feature.kind && g.layer == feature.layer && g.tags == feature.tags);
        match existing {
            Some(group) => group.shapes.push(feature.shape),
            None => groups.push(ShapeGroup {
                layer: feature.layer,
                kind: feature.kind,
                tags: feature.tags,
                shapes: vec![feature.shape],
            }),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_geom::Point;

    fn feature(layer: &str, kind: ShapeKind, class: &str, x: f64) -> Feature {
        Feature {
            layer: layer.to_owned(),
            kind,
            tags: [("class".to_owned(), serde_json::Value::from(class))].into(),
            shape: vec![Point::new(x, 0.0), Point::new(x + 1.0, 0.0)],
        }
    }

    #[test]
    fn groups_split_on_kind_layer_and_tags_in_first_seen_order() {
        let groups = group_features([
            feature("roads", ShapeKind::LineString, "primary", 0.0),
            feature("water", ShapeKind::Polygon, "lake", 1.0),
            feature("roads", ShapeKind::LineString, "minor", 2.0),
            feature("roads", ShapeKind::LineString, "primary", 3.0),
            feature("roads", ShapeKind::Polygon, "primary", 4.0),
        ]);
        let summary: Vec<(&str, ShapeKind, usize)> = groups
            .iter()
            .map(|g| (g.layer.as_str(), g.kind, g.shapes.len()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("roads", ShapeKind::LineString, 2),
                ("water", ShapeKind::Polygon, 1),
                ("roads", ShapeKind::LineString, 1),
                ("roads", ShapeKind::Polygon, 1),
            ]
        );
        assert_eq!(groups[0].shapes[1][0], Point::new(3.0, 0.0));
    }

    #[test]
    fn geom_type_codes_round_trip() {
        for kind in [ShapeKind::Point, ShapeKind::LineString, ShapeKind::Polygon] {
            assert_eq!(ShapeKind::from_geom_type(kind.geom_type()), Some(kind));
        }
        assert_eq!(ShapeKind::from_geom_type(0), None);
    }
}
