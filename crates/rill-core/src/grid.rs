//! Square grid geometry with an 8-connected (Moore) neighbourhood.
//!
//! Cells are stored row-major, `index = y * size + x`. The outermost ring
//! is never a flow source; only interior cells are scanned, which is what
//! makes the fixed linear offset table safe to apply without bounds checks
//! on the neighbour side.

use crate::error::GridError;

/// Number of neighbours in the Moore neighbourhood.
pub const NEIGHBOUR_COUNT: usize = 8;

/// Relative linear-index offsets of the eight neighbours of a cell.
///
/// Order is fixed: NW, N, NE, W, E, SW, S, SE, i.e.
/// `{-size-1, -size, -size+1, -1, 1, size-1, size, size+1}`. Every backend
/// walks the table in this order, and downstream bitmasks use the slot
/// position as the bit index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighbourOffsets([isize; NEIGHBOUR_COUNT]);

impl NeighbourOffsets {
    fn for_side(size: isize) -> Self {
        Self([
            -size - 1,
            -size,
            -size + 1,
            -1,
            1,
            size - 1,
            size,
            size + 1,
        ])
    }

    /// The raw offsets in slot order.
    pub fn as_array(&self) -> &[isize; NEIGHBOUR_COUNT] {
        &self.0
    }

    /// Offset stored in `slot` (`0..8`).
    #[inline]
    pub fn get(&self, slot: usize) -> isize {
        self.0[slot]
    }

    /// Linear index of the neighbour of `ptr` in `slot`.
    ///
    /// Only meaningful for interior cells; border cells would wrap across
    /// rows or leave the grid.
    #[inline]
    pub fn neighbour(&self, ptr: usize, slot: usize) -> usize {
        ptr.wrapping_add_signed(self.0[slot])
    }

    /// Linear index of the cell whose neighbour in `slot` is `ptr`, if that
    /// cell lies inside the grid.
    #[inline]
    pub fn source_of(&self, ptr: usize, slot: usize, cell_count: usize) -> Option<usize> {
        let src = ptr as isize - self.0[slot];
        (src >= 0 && (src as usize) < cell_count).then_some(src as usize)
    }
}

/// Validated side length of a square grid.
///
/// Construction guarantees `size >= 3` (at least one interior cell), that
/// `size * size` fits in `usize`, and that `size` fits in `isize` so the
/// neighbour offsets are representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    size: usize,
    offsets: NeighbourOffsets,
}

impl GridSize {
    /// Smallest grid with an interior cell.
    pub const MIN: usize = 3;

    /// Validate `size` and precompute its neighbour offsets.
    pub fn new(size: usize) -> Result<Self, GridError> {
        if size < Self::MIN {
            return Err(GridError::SizeTooSmall { size });
        }
        let side = isize::try_from(size).map_err(|_| GridError::SizeOverflow { size })?;
        let cells = size
            .checked_mul(size)
            .ok_or(GridError::SizeOverflow { size })?;
        if isize::try_from(cells).is_err() {
            return Err(GridError::SizeOverflow { size });
        }
        Ok(Self {
            size,
            offsets: NeighbourOffsets::for_side(side),
        })
    }

    /// Side length.
    pub fn side(&self) -> usize {
        self.size
    }

    /// Total number of cells, `size * size`.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Number of interior cells, `(size - 2)^2`.
    pub fn interior_count(&self) -> usize {
        let inner = self.size - 2;
        inner * inner
    }

    /// The neighbour offset table for this side length.
    pub fn offsets(&self) -> &NeighbourOffsets {
        &self.offsets
    }

    /// Linear index of `(x, y)`. Does not bounds-check.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.size + x
    }

    /// `(x, y)` of a linear index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.size, index / self.size)
    }

    /// Whether `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size
    }

    /// Whether `index` lies strictly inside the boundary ring.
    #[inline]
    pub fn is_interior(&self, index: usize) -> bool {
        let (x, y) = self.coords(index);
        x >= 1 && y >= 1 && x < self.size - 1 && y < self.size - 1
    }

    /// Linear index of the `k`-th interior cell in row-major scan order.
    #[inline]
    pub fn interior_index(&self, k: usize) -> usize {
        let inner = self.size - 2;
        (k / inner + 1) * self.size + (k % inner + 1)
    }

    /// Interior cell indices in row-major scan order.
    pub fn interior(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.size - 1)
            .flat_map(move |y| (1..self.size - 1).map(move |x| y * self.size + x))
    }

    /// Check that `height` and `water` both hold exactly `size * size`
    /// cells.
    pub fn check_fields(&self, height: &[f32], water: &[f32]) -> Result<(), GridError> {
        self.check_len("height", height.len())?;
        self.check_len("water", water.len())
    }

    /// Check a single buffer length against the cell count.
    pub fn check_len(&self, field: &'static str, actual: usize) -> Result<(), GridError> {
        let expected = self.cell_count();
        if actual != expected {
            return Err(GridError::LengthMismatch {
                field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}
