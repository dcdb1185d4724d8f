//! Rill: water flowing over a heightmap.
//!
//! This is the facade crate re-exporting the public API of the rill
//! sub-crates. For most users, depending on `rill` alone is enough.
//!
//! # Quick start
//!
//! ```rust
//! use rill::prelude::*;
//!
//! // Seeded terrain, rained on everywhere above elevation 1.
//! let mut terrain = Terrain::generated(64, 7, 60.0).unwrap();
//! terrain.init_water(1.0, 10.0);
//! let before = terrain.total_water();
//!
//! let mut solver = FlowSolver::new(FlowConfig::with_backend(Backend::Parallel(
//!     AccumulationMode::DoubleBuffered,
//! )))
//! .unwrap();
//! let summary = terrain.flow(&mut solver, 20).unwrap();
//!
//! assert_eq!(summary.passes, 20);
//! assert!(terrain.water().iter().all(|&w| w >= 0.0));
//! assert!(terrain.total_water() <= before * (1.0 + 1e-4));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `rill-core` | Grid geometry, configuration, errors |
//! | [`flow`] | `rill-flow` | The flow rule, both backends, the solver |
//! | [`terrain`] | `rill-terrain` | Owned terrain, generation, water seeding |
//! | [`snapshot`] | `rill-snapshot` | Save files and state hashing |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Grid geometry, configuration, and error types (`rill-core`).
pub use rill_core as types;

/// The flow rule and its backends (`rill-flow`).
///
/// [`flow::flow_step`] and [`flow::parallel_flow_step`] work on
/// caller-owned slices; [`flow::FlowSolver`] drives repeated passes.
pub use rill_flow as flow;

/// Owned terrain state (`rill-terrain`).
pub use rill_terrain as terrain;

/// Save files and state hashing (`rill-snapshot`).
pub use rill_snapshot as snapshot;

/// Common imports for typical rill usage.
///
/// ```rust
/// use rill::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use rill_core::{
        AccumulationMode, Backend, ConfigError, FlowConfig, GridError, GridSize, DEFAULT_EPSILON,
    };

    // Flow
    pub use rill_flow::{
        flow_repeat, flow_step, parallel_flow_step, run, FlowSolver, PassStats, RunSummary,
    };

    // Terrain
    pub use rill_terrain::{Terrain, TerrainError};

    // Snapshots
    pub use rill_snapshot::{load, save, terrain_hash, SnapshotError};
}
