//! Error types for the rill simulator.
//!
//! A flow pass has no recoverable failure of its own. The only errors are
//! precondition violations on the caller's buffers ([`GridError`]) and
//! invalid solver configuration ([`ConfigError`]), both detected before any
//! cell is touched.

use std::error::Error;
use std::fmt;

/// Malformed grid dimensions or mismatched buffer lengths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid side is below 3, so there is no interior cell.
    SizeTooSmall {
        /// The rejected side length.
        size: usize,
    },
    /// `size * size` overflows, or `size` does not fit a signed offset.
    SizeOverflow {
        /// The rejected side length.
        size: usize,
    },
    /// A buffer does not hold exactly `size * size` cells.
    LengthMismatch {
        /// Which buffer was wrong (`"height"` or `"water"`).
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeTooSmall { size } => {
                write!(f, "grid size {size} is below the minimum of 3")
            }
            Self::SizeOverflow { size } => {
                write!(f, "grid size {size} overflows the addressable cell range")
            }
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{field} buffer has {actual} cells, expected {expected}"
            ),
        }
    }
}

impl Error for GridError {}

/// Errors detected by [`FlowConfig::validate`](crate::FlowConfig::validate).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Epsilon is NaN, infinite, or negative.
    InvalidEpsilon {
        /// The rejected value.
        value: f32,
    },
    /// An explicit worker count of zero was requested.
    InvalidWorkerCount {
        /// The rejected value.
        value: usize,
    },
    /// The dedicated thread pool could not be built.
    ThreadPool {
        /// Description reported by the pool builder.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEpsilon { value } => {
                write!(f, "epsilon must be finite and >= 0, got {value}")
            }
            Self::InvalidWorkerCount { value } => {
                write!(f, "worker_count must be at least 1, got {value}")
            }
            Self::ThreadPool { reason } => write!(f, "thread pool: {reason}"),
        }
    }
}

impl Error for ConfigError {}
