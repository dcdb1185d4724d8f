//! Fixture grids and invariant checks for rill development.
//!
//! Every fixture is a square `(height, water)` pair laid out row-major,
//! ready to hand to any flow backend.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rill_core::GridSize;

/// Ground level every channel fixture walls its corridor with.
pub const WALL_HEIGHT: f32 = 100.0;

/// A square grid with owned height and water buffers.
#[derive(Clone, Debug, PartialEq)]
pub struct Fixture {
    pub size: usize,
    pub height: Vec<f32>,
    pub water: Vec<f32>,
}

impl Fixture {
    /// Flat, dry ground.
    pub fn flat(size: usize) -> Self {
        Self {
            size,
            height: vec![0.0; size * size],
            water: vec![0.0; size * size],
        }
    }

    /// Flat ground with `amount` of water on the centre cell.
    pub fn flat_blob(size: usize, amount: f32) -> Self {
        let mut f = Self::flat(size);
        let centre = (size / 2) * size + size / 2;
        f.water[centre] = amount;
        f
    }

    /// A one-cell-wide corridor along row `y = 2`, walled off by
    /// [`WALL_HEIGHT`] everywhere else.
    ///
    /// With `descending_east` the corridor drops one unit per cell from
    /// `x = 1` towards the east border, which sits at 0 while the west
    /// border is a wall. Otherwise the slope and the open end are mirrored.
    pub fn channel(size: usize, descending_east: bool) -> Self {
        assert!(size >= 5, "channel fixture needs size >= 5");
        let mut f = Self::flat(size);
        f.height.fill(WALL_HEIGHT);
        let inner = size - 2;
        for x in 0..size {
            let h = if x == 0 || x == size - 1 {
                let open = (x == size - 1) == descending_east;
                if open {
                    0.0
                } else {
                    WALL_HEIGHT
                }
            } else if descending_east {
                (inner - (x - 1)) as f32
            } else {
                x as f32
            };
            f.height[2 * size + x] = h;
        }
        f
    }

    /// Seeded random terrain: heights in `[0, 10)`, water in `[0, 2)`.
    pub fn random(size: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = size * size;
        let height = (0..n).map(|_| rng.gen_range(0.0f32..10.0)).collect();
        let water = (0..n).map(|_| rng.gen_range(0.0f32..2.0)).collect();
        Self {
            size,
            height,
            water,
        }
    }

    /// Validated geometry for this fixture.
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.size).expect("fixture size is valid")
    }

    /// Total height (ground + water) of cell `i`.
    pub fn total_height(&self, i: usize) -> f32 {
        self.height[i] + self.water[i]
    }
}

/// Sum of all water, accumulated in `f64`.
pub fn total_water(water: &[f32]) -> f64 {
    water.iter().map(|&w| w as f64).sum()
}

/// Panic with the offending cell if any depth is negative.
pub fn assert_non_negative(water: &[f32]) {
    if let Some((i, w)) = water.iter().enumerate().find(|&(_, &w)| w < 0.0) {
        panic!("cell {i} has negative water {w}");
    }
}
