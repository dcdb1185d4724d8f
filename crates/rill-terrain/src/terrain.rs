//! [`Terrain`]: a validated grid that owns its height and water buffers.

use log::debug;
use rill_core::GridSize;
use rill_flow::{FlowSolver, RunSummary};

use crate::error::TerrainError;
use crate::generate::diamond_square;

/// Square height and water grids of one side length.
///
/// Both buffers are row-major with `index = y * size + x`. Coordinates
/// passed to the accessors must lie inside the grid; nothing wraps.
#[derive(Clone, Debug, PartialEq)]
pub struct Terrain {
    grid: GridSize,
    height: Vec<f32>,
    water: Vec<f32>,
}

impl Terrain {
    /// Flat, dry terrain.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Grid`] if `size` is not a valid grid side.
    pub fn new(size: usize) -> Result<Self, TerrainError> {
        let grid = GridSize::new(size)?;
        Ok(Self {
            grid,
            height: vec![0.0; grid.cell_count()],
            water: vec![0.0; grid.cell_count()],
        })
    }

    /// Adopt existing buffers.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Grid`] if `size` is invalid or either buffer
    /// does not hold `size * size` cells.
    pub fn from_parts(size: usize, height: Vec<f32>, water: Vec<f32>) -> Result<Self, TerrainError> {
        let grid = GridSize::new(size)?;
        grid.check_fields(&height, &water)?;
        Ok(Self {
            grid,
            height,
            water,
        })
    }

    /// Flat terrain overwritten by [`generate_heights`](Self::generate_heights).
    pub fn generated(size: usize, seed: u64, range: f32) -> Result<Self, TerrainError> {
        let mut terrain = Self::new(size)?;
        terrain.generate_heights(seed, range);
        Ok(terrain)
    }

    /// Give back the `(height, water)` buffers.
    pub fn into_parts(self) -> (Vec<f32>, Vec<f32>) {
        (self.height, self.water)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.grid.side()
    }

    /// Grid geometry.
    pub fn grid(&self) -> &GridSize {
        &self.grid
    }

    /// Ground elevations.
    pub fn height(&self) -> &[f32] {
        &self.height
    }

    /// Water depths.
    pub fn water(&self) -> &[f32] {
        &self.water
    }

    /// Mutable water depths, for callers that seed water themselves.
    pub fn water_mut(&mut self) -> &mut [f32] {
        &mut self.water
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, TerrainError> {
        if self.grid.contains(x, y) {
            Ok(self.grid.index(x, y))
        } else {
            Err(TerrainError::OutOfBounds {
                x,
                y,
                size: self.size(),
            })
        }
    }

    /// Ground elevation at `(x, y)`.
    pub fn height_at(&self, x: usize, y: usize) -> Result<f32, TerrainError> {
        self.index(x, y).map(|i| self.height[i])
    }

    /// Water depth at `(x, y)`.
    pub fn water_at(&self, x: usize, y: usize) -> Result<f32, TerrainError> {
        self.index(x, y).map(|i| self.water[i])
    }

    /// Set the water depth at `(x, y)`.
    pub fn set_water(&mut self, x: usize, y: usize, value: f32) -> Result<(), TerrainError> {
        let i = self.index(x, y)?;
        self.water[i] = value;
        Ok(())
    }

    /// Add `amount` to the water depth at `(x, y)`.
    pub fn inc_water(&mut self, x: usize, y: usize, amount: f32) -> Result<(), TerrainError> {
        let i = self.index(x, y)?;
        self.water[i] += amount;
        Ok(())
    }

    /// Set the ground elevation at `(x, y)`.
    pub fn set_height(&mut self, x: usize, y: usize, value: f32) -> Result<(), TerrainError> {
        let i = self.index(x, y)?;
        self.height[i] = value;
        Ok(())
    }

    /// Raise (or with a negative `amount`, lower) the ground at `(x, y)`.
    pub fn inc_height(&mut self, x: usize, y: usize, amount: f32) -> Result<(), TerrainError> {
        let i = self.index(x, y)?;
        self.height[i] += amount;
        Ok(())
    }

    /// Flatten the ground and drain all water.
    pub fn clear(&mut self) {
        self.height.fill(0.0);
        self.water.fill(0.0);
    }

    /// Drain all water, keeping the ground.
    pub fn clear_water(&mut self) {
        self.water.fill(0.0);
    }

    /// Sum of all water depths, accumulated in `f64`.
    pub fn total_water(&self) -> f64 {
        self.water.iter().map(|&w| w as f64).sum()
    }

    /// Rain `amount` onto every cell whose ground lies strictly above
    /// `min_height`; every other cell is drained.
    pub fn init_water(&mut self, min_height: f32, amount: f32) {
        for (w, &h) in self.water.iter_mut().zip(&self.height) {
            *w = if h > min_height { *w + amount } else { 0.0 };
        }
    }

    /// Replace every interior elevation with the mean of its eight
    /// neighbours. All means are taken from the pre-smoothing field; the
    /// border ring is left as is.
    pub fn smooth(&mut self) {
        let offsets = *self.grid.offsets();
        let source = &self.height;
        let smoothed: Vec<f32> = (0..self.grid.cell_count())
            .map(|i| {
                if !self.grid.is_interior(i) {
                    return source[i];
                }
                let sum: f32 = offsets
                    .as_array()
                    .iter()
                    .map(|&d| source[i.wrapping_add_signed(d)])
                    .sum();
                sum / 8.0
            })
            .collect();
        self.height = smoothed;
    }

    /// Replace the ground with seeded diamond-square terrain spanning
    /// `[0, 255]`. `range` is the displacement amplitude of the first
    /// octave; later octaves halve it. Water is left untouched.
    pub fn generate_heights(&mut self, seed: u64, range: f32) {
        diamond_square(self.size(), &mut self.height, seed, range);
    }

    /// Run `iterations` flow passes over this terrain's buffers.
    pub fn flow(
        &mut self,
        solver: &mut FlowSolver,
        iterations: usize,
    ) -> Result<RunSummary, TerrainError> {
        let summary = solver.run(self.size(), &self.height, &mut self.water, iterations)?;
        debug!(
            "terrain flow: size={} passes={} water={:.4}",
            self.size(),
            summary.passes,
            self.total_water()
        );
        Ok(summary)
    }
}
