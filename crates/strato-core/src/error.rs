//! Error types for communicator construction.

use std::error::Error;
use std::fmt;

/// Errors arising while setting up a communicator.
///
/// Collectives themselves are infallible from the caller's point of
/// view: a rank that disappears mid-collective is fatal for the whole
/// job, the same way an MPI abort is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// Requested a communicator with zero ranks.
    InvalidRankCount {
        /// The rejected rank count.
        nprocs: usize,
    },
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRankCount { nprocs } => {
                write!(f, "communicator needs at least one rank, got {nprocs}")
            }
        }
    }
}

impl Error for CommError {}
