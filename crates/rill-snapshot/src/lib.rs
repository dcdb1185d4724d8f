//! Save files and state hashing for rill terrains.
//!
//! # Format
//!
//! All integers are big-endian `i32`; floats are their IEEE-754 bits in
//! the same byte order. There is no magic number or version byte.
//!
//! ```text
//! [size] [height_len] [height × height_len] [water_len] [water × water_len]
//! ```
//!
//! Both lengths must equal `size * size`.
//!
//! [`terrain_hash`] folds both fields into an FNV-1a digest for cheap
//! determinism checks between runs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod hash;

pub use codec::{decode, encode, load, save};
pub use error::SnapshotError;
pub use hash::{field_hash, terrain_hash};
