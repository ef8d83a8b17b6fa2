//! Field and field-collection error types.

use std::error::Error;
use std::fmt;

use strato_config::InputError;
use strato_core::Shape;
use strato_grid::GhostCells;

/// Errors from building or addressing fields.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldError {
    /// The grid halo is narrower than the stencils require.
    InsufficientGhostCells {
        /// Widths the caller needs.
        required: GhostCells,
        /// Widths the grid provides.
        available: GhostCells,
    },
    /// A field with this name is already registered.
    DuplicateField {
        /// The clashing name.
        name: String,
    },
    /// No field with this name is registered.
    UnknownField {
        /// The name that was looked up.
        name: String,
    },
    /// A vertical profile does not have one value per vertical index.
    ProfileLength {
        /// Which profile.
        name: &'static str,
        /// Required length (`kcells`).
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
    /// A reference density is zero, negative or not finite.
    NonPositiveDensity {
        /// Which profile.
        name: &'static str,
        /// Vertical index of the bad value.
        k: usize,
        /// The rejected value.
        value: f64,
    },
    /// Two fields that must share a layout do not.
    ShapeMismatch {
        /// Shape of the destination.
        expected: Shape,
        /// Shape of the source.
        actual: Shape,
    },
    /// An initial perturbation parameter is unusable.
    InvalidInitialState {
        /// The `[fields]` item.
        item: &'static str,
        /// What went wrong.
        reason: String,
    },
    /// Reading the `[fields]` block failed.
    Input(InputError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientGhostCells {
                required,
                available,
            } => write!(
                f,
                "ghost cells ({}, {}, {}) cannot support stencils needing ({}, {}, {})",
                available.igc, available.jgc, available.kgc, required.igc, required.jgc, required.kgc
            ),
            Self::DuplicateField { name } => write!(f, "field \"{name}\" already exists"),
            Self::UnknownField { name } => write!(f, "field \"{name}\" does not exist"),
            Self::ProfileLength {
                name,
                expected,
                actual,
            } => write!(f, "{name} has {actual} levels, expected {expected}"),
            Self::NonPositiveDensity { name, k, value } => {
                write!(f, "{name}[{k}] = {value} is not a positive density")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected:?}, got {actual:?}")
            }
            Self::InvalidInitialState { item, reason } => write!(f, "[fields][{item}]: {reason}"),
            Self::Input(e) => write!(f, "input: {e}"),
        }
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for FieldError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}
