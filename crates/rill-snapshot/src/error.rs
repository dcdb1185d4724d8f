//! Error types for the snapshot codec.

use std::fmt;
use std::io;

use rill_terrain::TerrainError;

/// Errors from writing or reading a snapshot.
#[derive(Debug)]
pub enum SnapshotError {
    /// An I/O error occurred, including truncated input.
    Io(io::Error),
    /// The side length is negative, too small, or does not fit the format.
    InvalidSize {
        /// The offending side length.
        size: i64,
    },
    /// A field's length prefix disagrees with `size * size`.
    LengthMismatch {
        /// `"height"` or `"water"`.
        field: &'static str,
        /// `size * size`.
        expected: usize,
        /// Length prefix found in the input.
        actual: i32,
    },
    /// The decoded buffers were rejected when building the terrain.
    Terrain(TerrainError),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidSize { size } => write!(f, "invalid grid size {size}"),
            Self::LengthMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "{field} length prefix is {actual}, expected {expected}"
            ),
            Self::Terrain(e) => write!(f, "invalid terrain: {e}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Terrain(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SnapshotError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<TerrainError> for SnapshotError {
    fn from(e: TerrainError) -> Self {
        Self::Terrain(e)
    }
}
