//! Water redistribution passes for the rill simulator.
//!
//! One local rule moves water from a cell to its strictly lower
//! 8-connected neighbours. It runs on two backends:
//!
//! - [`flow_step`]: sequential, in place, row-major (Gauss-Seidel style).
//!   Cells later in the scan see water moved earlier in the same pass.
//! - [`parallel_flow_step`]: one unit of work per interior cell on a rayon
//!   pool, with an explicit [`AccumulationMode`] deciding how concurrent
//!   writes are reconciled.
//!
//! [`FlowSolver`] owns a validated [`FlowConfig`] plus the scratch buffers
//! the parallel backend needs, and drives repeated passes.
//!
//! # Example
//!
//! ```
//! use rill_flow::flow_step;
//!
//! let size = 3;
//! let height = vec![0.0f32; 9];
//! let mut water = vec![0.0f32; 9];
//! water[4] = 1.0;
//!
//! flow_step(size, &height, &mut water).unwrap();
//! assert_eq!(water[4], 0.0);
//! assert!(water.iter().enumerate().all(|(i, &w)| i == 4 || w == 0.125));
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod parallel;
pub mod rule;
pub mod sequential;
pub mod solver;

pub use parallel::parallel_flow_step;
pub use rule::{evaluate, Outflow, PassStats};
pub use sequential::{flow_repeat, flow_step};
pub use solver::{run, FlowSolver, RunSummary};

pub use rill_core::{AccumulationMode, Backend, FlowConfig, GridError};
