//! Advection engine for the strato solver.
//!
//! An [`Advec`] scheme turns the current momentum and scalar state into
//! advective tendencies and bounds the time step by the CFL criterion.
//! Schemes are selected once at start-up from the `[advec][swadvec]`
//! configuration string:
//!
//! | `swadvec` | Scheme |
//! |-----------|--------|
//! | `"0"` | [`AdvecDisabled`]: no advection, no time-step limit |
//! | `"2"` | [`Advec2`]: second-order flux-form central differences |
//!
//! # Collectives
//!
//! [`Advec::get_cfl`] and [`Advec::get_time_limit`] reduce over every
//! rank of the grid's communicator. All ranks must call them together.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advec;
pub mod advec2;
pub mod config;
pub mod disabled;
pub mod error;

pub use advec::{create, Advec};
pub use advec2::Advec2;
pub use config::{AdvecConfig, AdvecScheme};
pub use disabled::AdvecDisabled;
pub use error::AdvecError;
