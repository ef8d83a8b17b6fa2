//! Error types for grid construction.

use std::error::Error;
use std::fmt;

use strato_config::InputError;

/// Errors detected while building a [`Grid`](crate::Grid).
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// A cell count is zero.
    EmptyDimension {
        /// Which dimension (`"itot"`, `"jtot"`, `"ktot"`).
        name: &'static str,
    },
    /// A domain size is zero, negative or not finite.
    InvalidExtent {
        /// Which size (`"xsize"`, `"ysize"`, `"zsize"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The domain cannot be split over the requested ranks.
    Decomposition {
        /// What went wrong.
        reason: String,
    },
    /// The ghost-cell widths cannot support the grid.
    InvalidGhostCells {
        /// What went wrong.
        reason: String,
    },
    /// The vertical level heights are unusable.
    InvalidLevels {
        /// What went wrong.
        reason: String,
    },
    /// Reading the grid configuration failed.
    Input(InputError),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { name } => write!(f, "{name} must be at least 1"),
            Self::InvalidExtent { name, value } => {
                write!(f, "{name} must be finite and positive, got {value}")
            }
            Self::Decomposition { reason } => write!(f, "invalid decomposition: {reason}"),
            Self::InvalidGhostCells { reason } => write!(f, "invalid ghost cells: {reason}"),
            Self::InvalidLevels { reason } => write!(f, "invalid vertical levels: {reason}"),
            Self::Input(e) => write!(f, "input: {e}"),
        }
    }
}

impl Error for GridError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for GridError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}
