//! Advection setup errors.

use std::error::Error;
use std::fmt;

use strato_config::InputError;
use strato_grid::GhostCells;

/// Errors from configuring an advection scheme.
///
/// Only construction can fail. A built scheme never returns an error.
#[derive(Clone, Debug, PartialEq)]
pub enum AdvecError {
    /// `swadvec` names no known scheme.
    UnknownScheme {
        /// The configured value.
        name: String,
    },
    /// The CFL bounds do not satisfy `0 < cflmin < cflmax`.
    InvalidCfl {
        /// Configured floor.
        cflmin: f64,
        /// Configured ceiling.
        cflmax: f64,
    },
    /// The grid halo is narrower than the scheme's stencils.
    InsufficientGhostCells {
        /// Scheme name.
        scheme: &'static str,
        /// Halo the stencils read.
        required: GhostCells,
        /// Halo the grid provides.
        available: GhostCells,
    },
    /// Reading the `[advec]` block failed.
    Input(InputError),
}

impl fmt::Display for AdvecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScheme { name } => write!(f, "\"{name}\" is an illegal value for swadvec"),
            Self::InvalidCfl { cflmin, cflmax } => {
                write!(f, "need 0 < cflmin < cflmax, got cflmin = {cflmin}, cflmax = {cflmax}")
            }
            Self::InsufficientGhostCells {
                scheme,
                required,
                available,
            } => write!(
                f,
                "advection scheme {scheme} needs ghost cells ({}, {}, {}), grid has ({}, {}, {})",
                required.igc, required.jgc, required.kgc, available.igc, available.jgc, available.kgc
            ),
            Self::Input(e) => write!(f, "input: {e}"),
        }
    }
}

impl Error for AdvecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for AdvecError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}
