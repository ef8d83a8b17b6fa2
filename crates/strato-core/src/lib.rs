//! Core types and stencil helpers for the strato solver.
//!
//! This is the leaf crate of the workspace. It defines the pieces every
//! other crate builds on: the collective-reduction contract that couples
//! ranks together ([`Communicator`]), the linear index arithmetic used to
//! address ghost-padded arrays ([`Shape`], [`Strides`], [`ActiveRegion`]),
//! and the second-order finite-difference helpers ([`fd`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod comm;
pub mod error;
pub mod fd;
pub mod index;

pub use comm::{Communicator, SerialComm, ThreadComm};
pub use error::CommError;
pub use fd::interp2;
pub use index::{ActiveRegion, Shape, Strides};
