// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Map configuration schema.
//!
//! A configuration names a viewport, the tile sources to read, and per
//! source the groups of features to keep together with the processing steps
//! to run on them:
//!
//! ```json
//! {
//!   "viewport": [0.0, 0.0, 20000.0, 20000.0],
//!   "attributes": { "style": "background:#fff" },
//!   "sources": [{
//!     "url": "https://tiles.example/index.json",
//!     "zoom": 12,
//!     "groups": [{
//!       "layer": "roads",
//!       "filters": [["==", "class", "\"primary\""]],
//!       "colour": "#333",
//!       "processing": [
//!         { "dissolve_lines": { "equal_dist": 1.0 } },
//!         { "coord_fir_filter": { "coefficients": [0.25, 0.5, 0.25] } }
//!       ]
//!     }]
//!   }]
//! }
//! ```
//!
//! Filters are carried verbatim; evaluating them is up to the tile reader.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Axis-aligned map region `[min_x, min_y, max_x, max_y]` in map units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Viewport {
    /// Left edge.
    pub min_x: f64,
    /// Bottom edge.
    pub min_y: f64,
    /// Right edge.
    pub max_x: f64,
    /// Top edge.
    pub max_y: f64,
}

impl Viewport {
    /// Width and height.
    pub fn size(&self) -> (f64, f64) {
        (self.max_x - self.min_x, self.max_y - self.min_y)
    }

    fn is_valid(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_y < self.max_y
    }
}

impl From<[f64; 4]> for Viewport {
    fn from([min_x, min_y, max_x, max_y]: [f64; 4]) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl From<Viewport> for [f64; 4] {
    fn from(v: Viewport) -> Self {
        [v.min_x, v.min_y, v.max_x, v.max_y]
    }
}

/// Default tolerance for [`ProcessingStep::DissolveLines`].
pub const DEFAULT_EQUAL_DIST: f64 = 1.0;
/// Default threshold for [`ProcessingStep::RemoveSmallShapes`].
pub const DEFAULT_MEAN_WIDTH: f64 = 1000.0;

const fn default_equal_dist() -> f64 {
    DEFAULT_EQUAL_DIST
}

const fn default_mean_width() -> f64 {
    DEFAULT_MEAN_WIDTH
}

/// One post-processing step applied to a feature group, in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum ProcessingStep {
    /// Stitch tile-clipped line fragments back together (line strings only).
    DissolveLines {
        /// Distance below which two points are the same place.
        #[serde(default = "default_equal_dist")]
        equal_dist: f64,
    },
    /// Drop line strings and polygons whose mean width (hull perimeter / π)
    /// is below `mean_width`.
    RemoveSmallShapes {
        /// Threshold in map units.
        #[serde(default = "default_mean_width")]
        mean_width: f64,
    },
    /// Smooth line strings and polygons with an FIR filter over the coordinates.
    CoordFirFilter {
        /// Filter taps, applied centered on each point.
        coefficients: Vec<f64>,
    },
}

impl ProcessingStep {
    /// Name used in configuration files and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DissolveLines { .. } => "dissolve_lines",
            Self::RemoveSmallShapes { .. } => "remove_small_shapes",
            Self::CoordFirFilter { .. } => "coord_fir_filter",
        }
    }

    /// Why the step's parameters are unusable, or `None` if they are fine.
    pub fn problem(&self) -> Option<&'static str> {
        match self {
            Self::DissolveLines { equal_dist } => (!(equal_dist.is_finite() && *equal_dist > 0.0))
                .then_some("equal_dist must be finite and positive"),
            Self::RemoveSmallShapes { mean_width } => (!(mean_width.is_finite()
                && *mean_width >= 0.0))
                .then_some("mean_width must be finite and non-negative"),
            Self::CoordFirFilter { coefficients } => {
                if coefficients.is_empty() {
                    Some("coefficients must not be empty")
                } else if coefficients.iter().any(|c| !c.is_finite()) {
                    Some("coefficients must be finite")
                } else {
                    None
                }
            }
        }
    }
}

/// Features of one layer drawn and processed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Source layer name.
    pub layer: String,
    /// Feature filters as `[op, lhs, rhs]` triples, carried verbatim.
    #[serde(default)]
    pub filters: Vec<serde_json::Value>,
    /// Stroke (lines) or fill (polygons) colour.
    #[serde(default)]
    pub colour: Option<String>,
    /// Extra output attributes for the group.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Steps applied in order.
    #[serde(default)]
    pub processing: Vec<ProcessingStep>,
}

/// One tile source and the groups read from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Tile index URL.
    pub url: String,
    /// Zoom level to read.
    pub zoom: u8,
    /// Feature groups.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Top-level map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Region to render.
    pub viewport: Viewport,
    /// Extra output attributes for the whole map.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Tile sources.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

impl MapConfig {
    /// Every configured group, in source then group order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupConfig> + '_ {
        self.sources.iter().flat_map(|s| s.groups.iter())
    }

    /// Configured groups reading `layer`.
    pub fn groups_for_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a GroupConfig> + 'a {
        self.groups().filter(move |g| g.layer == layer)
    }

    /// Checks the viewport and every processing step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "viewport {:?} must be finite with min < max",
                <[f64; 4]>::from(self.viewport)
            )));
        }
        for group in self.groups() {
            for step in &group.processing {
                if let Some(reason) = step.problem() {
                    return Err(ConfigError::Invalid(format!(
                        "group `{}` step `{}`: {reason}",
                        group.layer,
                        step.name()
                    )));
                }
            }
        }
        Ok(())
    }
}
