//! Owned terrain state for the rill simulator.
//!
//! [`Terrain`] bundles a validated grid with its height and water buffers
//! and layers the conveniences a driver needs on top of the flow core:
//! per-cell access, water seeding, height smoothing, seeded
//! diamond-square generation, and running a [`rill_flow::FlowSolver`]
//! over its own buffers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
mod generate;
pub mod terrain;

pub use error::TerrainError;
pub use generate::{MAX_HEIGHT, OCTAVES};
pub use terrain::Terrain;
