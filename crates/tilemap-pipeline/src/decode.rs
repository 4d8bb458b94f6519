// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Decoder for vector-tile geometry command streams.
//!
//! A stream is a sequence of `u32`s. Each command integer carries the command
//! id in its low three bits and a repeat count in the rest; it is followed by
//! `2 * count` zig-zag encoded parameters for `MoveTo`/`LineTo` and none for
//! `ClosePath`. Parameters are deltas applied to a cursor that persists across
//! commands and shapes.

use thiserror::Error;
use tilemap_geom::{Aabb, Line, Point};

/// Errors reported while decoding a geometry command stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The command id is not `MoveTo` (1), `LineTo` (2) or `ClosePath` (7).
    #[error("unknown geometry command {id} at offset {offset}")]
    UnknownCommand {
        /// Command id (low three bits).
        id: u32,
        /// Index of the command integer in the stream.
        offset: usize,
    },
    /// The stream ended before all parameters of a command were read.
    #[error("command {id} at offset {offset} needs {needed} parameters, {available} left")]
    TruncatedParameters {
        /// Command id.
        id: u32,
        /// Index of the command integer in the stream.
        offset: usize,
        /// Parameters the command announced.
        needed: usize,
        /// Parameters left in the stream.
        available: usize,
    },
    /// `LineTo` or `ClosePath` without a preceding `MoveTo`.
    #[error("command at offset {offset} has no current shape (missing MoveTo)")]
    MissingMoveTo {
        /// Index of the command integer in the stream.
        offset: usize,
    },
    /// The tile frame cannot map tile units to map units.
    #[error("invalid tile frame: {reason}")]
    InvalidFrame {
        /// What is wrong with the frame.
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveTo,
    LineTo,
    ClosePath,
}

impl Command {
    const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::MoveTo),
            2 => Some(Self::LineTo),
            7 => Some(Self::ClosePath),
            _ => None,
        }
    }
}

/// Maps tile-local integer coordinates to map coordinates:
/// `origin + cursor * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileFrame {
    /// Map position of tile coordinate `(0, 0)`.
    pub origin: Point,
    /// Map units per tile unit.
    pub scale: f64,
    /// Edge length of the tile in map units.
    pub tile_size: f64,
}

impl TileFrame {
    /// Frame of tile `(x, y)` in a grid of `tile_size` tiles anchored at
    /// `origin`, whose layers use `extent` units per tile edge.
    ///
    /// # Errors
    /// [`DecodeError::InvalidFrame`] if `extent` is zero or `tile_size` is not
    /// finite and positive.
    pub fn for_tile(
        origin: Point,
        tile_size: f64,
        x: u32,
        y: u32,
        extent: u32,
    ) -> Result<Self, DecodeError> {
        if extent == 0 {
            return Err(DecodeError::InvalidFrame {
                reason: "layer extent must be positive",
            });
        }
        if !(tile_size.is_finite() && tile_size > 0.0) {
            return Err(DecodeError::InvalidFrame {
                reason: "tile size must be finite and positive",
            });
        }
        Ok(Self {
            origin: Point::new(
                origin.x + f64::from(x) * tile_size,
                origin.y + f64::from(y) * tile_size,
            ),
            scale: tile_size / f64::from(extent),
            tile_size,
        })
    }

    /// Map-space box covered by the tile.
    pub fn tile_box(&self) -> Aabb {
        let half = self.tile_size / 2.0;
        Aabb::from_center_half_extents(
            Point::new(self.origin.x + half, self.origin.y + half),
            half,
            half,
        )
    }

    fn to_map(&self, cursor: (f64, f64)) -> Point {
        Point::new(
            self.origin.x + cursor.0 * self.scale,
            self.origin.y + cursor.1 * self.scale,
        )
    }
}

/// Zig-zag decoding of one command parameter.
#[allow(clippy::cast_possible_wrap)]
pub const fn zigzag(value: u32) -> i32 {
    // value >> 1 < 2^31 and value & 1 <= 1, so neither cast wraps.
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Decodes a geometry command stream into shapes in map coordinates.
///
/// Every `MoveTo` parameter pair starts a new shape; `LineTo` appends to the
/// current shape and `ClosePath` repeats its first point.
///
/// # Errors
/// See [`DecodeError`].
pub fn decode_geometry(commands: &[u32], frame: &TileFrame) -> Result<Vec<Line>, DecodeError> {
    let mut shapes: Vec<Line> = Vec::new();
    let mut current: Option<Line> = None;
    let mut cursor = (0.0_f64, 0.0_f64);
    let mut offset = 0;

    while let Some(&word) = commands.get(offset) {
        let id = word & 0x7;
        let count = (word >> 3) as usize;
        let command = Command::from_id(id).ok_or(DecodeError::UnknownCommand { id, offset })?;
        let params_start = offset + 1;

        if command == Command::ClosePath {
            let shape = current.as_mut().ok_or(DecodeError::MissingMoveTo { offset })?;
            if let Some(&first) = shape.first() {
                shape.push(first);
            }
            offset = params_start;
            continue;
        }

        let needed = count * 2;
        let params = commands
            .get(params_start..params_start + needed)
            .ok_or(DecodeError::TruncatedParameters {
                id,
                offset,
                needed,
                available: commands.len() - params_start,
            })?;
        if command == Command::LineTo && current.is_none() && count > 0 {
            return Err(DecodeError::MissingMoveTo { offset });
        }

        for pair in params.chunks_exact(2) {
            cursor.0 += f64::from(zigzag(pair[0]));
            cursor.1 += f64::from(zigzag(pair[1]));
            let point = frame.to_map(cursor);
            match (command, current.as_mut()) {
                (Command::LineTo, Some(shape)) => shape.push(point),
                _ => {
                    shapes.extend(current.take());
                    current = Some(vec![point]);
                }
            }
        }
        offset = params_start + needed;
    }
    shapes.extend(current);
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_alternates_sign() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(1), -1);
        assert_eq!(zigzag(2), 1);
        assert_eq!(zigzag(3), -2);
        assert_eq!(zigzag(u32::MAX - 1), i32::MAX);
        assert_eq!(zigzag(u32::MAX), i32::MIN);
    }

    #[test]
    fn unit_frame_is_identity() {
        let frame = TileFrame::for_tile(Point::new(0.0, 0.0), 4096.0, 0, 0, 4096);
        assert_eq!(
            frame.map(|f| f.to_map((3.0, -2.0))),
            Ok(Point::new(3.0, -2.0))
        );
    }
}
