//! Test fixtures for strato development.
//!
//! Grids and field collections of a convenient size, fillers that write
//! a function of the *global* index into a local field (so every
//! decomposition sees the same global state), and a helper that runs a
//! closure on N in-process ranks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fields_on, fill_from_global, fill_noise, noise, run_ranks, serial_grid, unit_grid,
    zero_w_at_walls,
};
