//! Error types for terrain construction and cell access.

use std::error::Error;
use std::fmt;

use rill_core::GridError;

/// Errors from building or addressing a [`Terrain`](crate::Terrain).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerrainError {
    /// The size or buffers failed grid validation.
    Grid(GridError),
    /// A coordinate lies outside the grid.
    OutOfBounds {
        /// Requested column.
        x: usize,
        /// Requested row.
        y: usize,
        /// Side length of the grid.
        size: usize,
    },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
            Self::OutOfBounds { x, y, size } => {
                write!(f, "cell ({x}, {y}) is outside the {size}x{size} grid")
            }
        }
    }
}

impl Error for TerrainError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::OutOfBounds { .. } => None,
        }
    }
}

impl From<GridError> for TerrainError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_error_is_the_source() {
        let err = TerrainError::from(GridError::SizeTooSmall { size: 1 });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("invalid grid"));
    }

    #[test]
    fn out_of_bounds_display() {
        let err = TerrainError::OutOfBounds { x: 7, y: 0, size: 4 };
        assert_eq!(err.to_string(), "cell (7, 0) is outside the 4x4 grid");
        assert!(err.source().is_none());
    }
}
