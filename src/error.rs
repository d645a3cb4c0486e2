//! Error types for grid construction and path queries.

use grid_util::point::Point;
use std::fmt;

/// Errors raised before any search work begins.
#[derive(Debug, Clone, PartialEq)]
pub enum PathError {
    /// A start or finish coordinate lies outside the grid.
    OutOfBounds {
        /// The offending coordinate.
        point: Point,
        /// Width of the grid that was queried.
        width: usize,
        /// Height of the grid that was queried.
        height: usize,
    },
    /// The elevation weight was negative, infinite or NaN.
    InvalidWeight(f32),
    /// A grid was requested with a zero dimension or one too large to index with `i32`.
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// The worker thread for a pass could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                point,
                width,
                height,
            } => write!(
                f,
                "coordinate ({}, {}) is outside the {width}x{height} grid",
                point.x, point.y
            ),
            Self::InvalidWeight(weight) => {
                write!(f, "elevation weight must be finite and non-negative, got {weight}")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid grid dimensions {width}x{height}")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl std::error::Error for PathError {}
