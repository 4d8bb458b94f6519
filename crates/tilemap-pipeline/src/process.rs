// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-group post-processing: dissolving, small-shape removal and smoothing.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use tilemap_config::{MapConfig, ProcessingStep};
use tilemap_geom::{dissolve, mean_width, GeomError, Line, Point};

use crate::shape::{ShapeGroup, ShapeKind};

/// Errors raised while processing shape groups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    /// A geometry operation rejected its input.
    #[error(transparent)]
    Geom(#[from] GeomError),
    /// A processing step carries unusable parameters.
    #[error("step `{step}`: {reason}")]
    InvalidStep {
        /// Step name.
        step: &'static str,
        /// What is wrong with its parameters.
        reason: &'static str,
    },
}

/// Runs one step over the shapes of a group of `kind`.
///
/// Dissolving applies to line strings only; small-shape removal and FIR
/// smoothing to line strings and polygons. Other kinds pass through.
pub fn apply_step(
    kind: ShapeKind,
    shapes: Vec<Line>,
    step: &ProcessingStep,
) -> Result<Vec<Line>, ProcessError> {
    if let Some(reason) = step.problem() {
        return Err(ProcessError::InvalidStep {
            step: step.name(),
            reason,
        });
    }
    let shapes = match (step, kind) {
        (ProcessingStep::DissolveLines { equal_dist }, ShapeKind::LineString) => {
            dissolve(shapes, *equal_dist)?
        }
        (
            ProcessingStep::RemoveSmallShapes { mean_width: threshold },
            ShapeKind::LineString | ShapeKind::Polygon,
        ) => remove_small_shapes(shapes, *threshold),
        (ProcessingStep::CoordFirFilter { coefficients }, ShapeKind::LineString) => shapes
            .iter()
            .map(|s| fir_filter_line(s, coefficients))
            .collect(),
        (ProcessingStep::CoordFirFilter { coefficients }, ShapeKind::Polygon) => shapes
            .iter()
            .map(|s| fir_filter_ring(s, coefficients))
            .collect(),
        _ => shapes,
    };
    Ok(shapes)
}

/// Keeps shapes whose mean width (convex hull perimeter / π) is at least
/// `threshold`. Shapes without two distinct points have no hull and count as
/// small.
pub fn remove_small_shapes(shapes: Vec<Line>, threshold: f64) -> Vec<Line> {
    shapes
        .into_iter()
        .filter(|s| mean_width(s).is_ok_and(|w| w >= threshold))
        .collect()
}

fn weighted_sum(coefficients: &[f64], window: impl Iterator<Item = Point>) -> Point {
    let (x, y) = coefficients
        .iter()
        .zip(window)
        .fold((0.0, 0.0), |(x, y), (c, p)| (x + c * p.x, y + c * p.y));
    Point::new(x, y)
}

/// Smooths an open line.
///
/// Point `i` becomes `sum(c[k] * p[i - (taps - 1) / 2 + k])`. The first and
/// last `max(taps / 2, 1)` points keep their position, so the length and both
/// endpoints are preserved. Lines no longer than the filter are returned
/// unchanged.
pub fn fir_filter_line(line: &[Point], coefficients: &[f64]) -> Line {
    let taps = coefficients.len();
    if taps == 0 || line.len() <= taps {
        return line.to_vec();
    }
    let keep = (taps / 2).max(1);
    let before = (taps - 1) / 2;
    line.iter()
        .enumerate()
        .map(|(i, p)| {
            if i < keep || i + keep >= line.len() {
                *p
            } else {
                let start = i - before;
                weighted_sum(coefficients, line[start..start + taps].iter().copied())
            }
        })
        .collect()
}

/// Smooths a polygon ring cyclically.
///
/// A ring whose last point repeats its first is filtered over its distinct
/// points and closed again. Rings no longer than the filter are returned
/// unchanged.
pub fn fir_filter_ring(ring: &[Point], coefficients: &[f64]) -> Line {
    let taps = coefficients.len();
    if taps == 0 || ring.len() <= taps {
        return ring.to_vec();
    }
    let closed = ring.first() == ring.last();
    let body = if closed { &ring[..ring.len() - 1] } else { ring };
    let n = body.len();
    let before = (taps - 1) / 2;
    let mut out: Line = (0..n)
        .map(|i| {
            let window = (0..taps).map(|k| body[(i + k + n - before) % n]);
            weighted_sum(coefficients, window)
        })
        .collect();
    if closed {
        if let Some(&first) = out.first() {
            out.push(first);
        }
    }
    out
}

/// Applies `steps` in order to the shapes of `group`.
#[instrument(skip_all, fields(layer = %group.layer, kind = ?group.kind))]
pub fn process_group(
    group: ShapeGroup,
    steps: &[ProcessingStep],
) -> Result<ShapeGroup, ProcessError> {
    let ShapeGroup {
        layer,
        kind,
        tags,
        mut shapes,
    } = group;
    let before = shapes.len();
    for step in steps {
        let count = shapes.len();
        shapes = apply_step(kind, shapes, step)?;
        debug!(step = step.name(), before = count, after = shapes.len(), "applied step");
    }
    info!(before, after = shapes.len(), "processed group");
    Ok(ShapeGroup {
        layer,
        kind,
        tags,
        shapes,
    })
}

/// Processes independent groups in parallel with the same steps.
///
/// Output order matches input order, and results equal sequential
/// [`process_group`] calls.
pub fn process_groups(
    groups: Vec<ShapeGroup>,
    steps: &[ProcessingStep],
) -> Result<Vec<ShapeGroup>, ProcessError> {
    groups
        .into_par_iter()
        .map(|group| process_group(group, steps))
        .collect()
}

/// Shapes produced for one configured group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedGroup {
    /// Configured layer.
    pub layer: String,
    /// Configured colour, if any.
    pub colour: Option<String>,
    /// Processed shape groups of that layer.
    pub groups: Vec<ShapeGroup>,
}

/// Runs every configured group (optionally only those reading `layer`) over
/// the shape groups of its layer.
///
/// A shape group is processed once per configured group naming its layer;
/// layers without a configured group produce nothing.
pub fn process_with_config(
    groups: &[ShapeGroup],
    config: &MapConfig,
    layer: Option<&str>,
) -> Result<Vec<ProcessedGroup>, ProcessError> {
    let mut out = Vec::new();
    for configured in config.groups() {
        if layer.is_some_and(|l| l != configured.layer) {
            continue;
        }
        let inputs: Vec<ShapeGroup> = groups
            .iter()
            .filter(|g| g.layer == configured.layer)
            .cloned()
            .collect();
        debug!(
            layer = %configured.layer,
            groups = inputs.len(),
            steps = configured.processing.len(),
            "processing configured group"
        );
        out.push(ProcessedGroup {
            layer: configured.layer.clone(),
            colour: configured.colour.clone(),
            groups: process_groups(inputs, &configured.processing)?,
        });
    }
    Ok(out)
}
