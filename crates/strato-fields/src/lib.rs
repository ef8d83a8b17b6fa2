//! Field storage for the strato solver.
//!
//! A [`Field3d`] is one ghost-padded array on a [`Grid`](strato_grid::Grid).
//! A [`FieldCollection`] owns every field of a run: the momentum state and
//! its tendencies, the name-keyed scalars, the reference density profiles
//! and two scratch buffers. [`FieldCollection::create`] puts the initial
//! perturbations described by an [`InitialState`] into a fresh state.
//!
//! Stencils read one or more halo layers around the active region without
//! bounds checks in the inner loop. The collection therefore refuses to
//! build on a grid whose halo is narrower than the caller's stencils need.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collection;
pub mod error;
pub mod field;
pub mod init;

pub use collection::{AdvectionView, FieldCollection, ScalarField};
pub use error::FieldError;
pub use field::Field3d;
pub use init::{cell_noise, InitialState, VortexAxis};
