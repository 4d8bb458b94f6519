// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

use thiserror::Error;

/// Errors reported by the geometry core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeomError {
    /// The caller supplied input the operation cannot work with.
    ///
    /// Raised for empty or single-location hull inputs, non-finite
    /// coordinates, and non-positive tolerances.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable description of the rejected input.
        reason: &'static str,
    },

    /// A sweep finished with entries still present in its active structure.
    ///
    /// Never expected from valid input; indicates a bug in the sweep.
    #[error("sweep structure not empty at sweep end ({remaining} entries left)")]
    StructuralInvariantViolation {
        /// Number of entries left in the structure.
        remaining: usize,
    },
}

/// Validates a tolerance/margin value: finite and strictly positive.
pub(crate) fn check_tolerance(value: f64) -> Result<(), GeomError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeomError::InvalidInput {
            reason: "tolerance must be finite and positive",
        })
    }
}
