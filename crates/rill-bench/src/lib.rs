//! Benchmark profiles for the rill water-flow simulator.
//!
//! - [`reference_profile`]: 256x256 generated terrain, rained on
//! - [`stress_profile`]: 1024x1024, same recipe
//! - [`BACKENDS`]: every backend with a stable label for bench ids

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rill_core::{AccumulationMode, Backend};
use rill_terrain::{Terrain, TerrainError};

/// Displacement amplitude of the first generation octave.
pub const TERRAIN_RANGE: f32 = 80.0;

/// Cells at or below this elevation start dry.
pub const RAIN_MIN_HEIGHT: f32 = 1.0;

/// Water added to every cell above [`RAIN_MIN_HEIGHT`].
pub const RAIN_AMOUNT: f32 = 10.0;

/// Every backend, labelled.
pub const BACKENDS: [(&str, Backend); 3] = [
    ("sequential", Backend::Sequential),
    (
        "double_buffered",
        Backend::Parallel(AccumulationMode::DoubleBuffered),
    ),
    (
        "direct_accumulate",
        Backend::Parallel(AccumulationMode::DirectAccumulate),
    ),
];

/// Generated terrain of side `size` with rain on everything above
/// [`RAIN_MIN_HEIGHT`].
pub fn rained_terrain(size: usize, seed: u64) -> Result<Terrain, TerrainError> {
    let mut terrain = Terrain::generated(size, seed, TERRAIN_RANGE)?;
    terrain.init_water(RAIN_MIN_HEIGHT, RAIN_AMOUNT);
    Ok(terrain)
}

/// 256x256 (64K cells).
pub fn reference_profile(seed: u64) -> Result<Terrain, TerrainError> {
    rained_terrain(256, seed)
}

/// 1024x1024 (~1M cells).
pub fn stress_profile(seed: u64) -> Result<Terrain, TerrainError> {
    rained_terrain(1024, seed)
}
