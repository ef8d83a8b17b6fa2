//! Decomposed staggered grid for the strato solver.
//!
//! A [`Grid`] describes one rank's share of a `itot × jtot × ktot` domain
//! split over `npx × npy` ranks in the horizontal. It owns the index
//! bounds, the ghost-cell widths, the uniform horizontal spacing, the
//! (possibly stretched) vertical levels, and the rank's [`Communicator`]
//! used for global reductions.
//!
//! [`Communicator`]: strato_core::Communicator

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod vertical;

pub use config::{GhostCells, GridConfig};
pub use error::GridError;
pub use grid::Grid;
pub use vertical::VerticalLevels;
