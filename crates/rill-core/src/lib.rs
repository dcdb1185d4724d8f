//! Core types for the rill water-flow simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! grid geometry shared by every backend, the flow configuration, and the
//! error types returned when a caller hands over malformed buffers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;

pub use config::{AccumulationMode, Backend, FlowConfig, DEFAULT_EPSILON};
pub use error::{ConfigError, GridError};
pub use grid::{GridSize, NeighbourOffsets, NEIGHBOUR_COUNT};
