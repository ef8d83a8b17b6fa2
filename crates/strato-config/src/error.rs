//! Configuration lookup errors.

use std::error::Error;
use std::fmt;

/// Errors from [`Input`](crate::Input) insertion and lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputError {
    /// A required entry is absent.
    MissingItem {
        /// Block name.
        block: String,
        /// Item name.
        item: String,
        /// Element name, empty for plain items.
        element: String,
    },
    /// An entry exists but does not parse as the requested type.
    WrongType {
        /// Block name.
        block: String,
        /// Item name.
        item: String,
        /// Element name, empty for plain items.
        element: String,
        /// The raw value that failed to parse.
        value: String,
        /// Name of the requested type.
        expected: &'static str,
    },
    /// The same entry was inserted twice.
    DuplicateItem {
        /// Block name.
        block: String,
        /// Item name.
        item: String,
        /// Element name, empty for plain items.
        element: String,
    },
}

fn key(block: &str, item: &str, element: &str) -> String {
    if element.is_empty() {
        format!("[{block}][{item}]")
    } else {
        format!("[{block}][{item}][{element}]")
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingItem {
                block,
                item,
                element,
            } => write!(f, "{} does not exist", key(block, item, element)),
            Self::WrongType {
                block,
                item,
                element,
                value,
                expected,
            } => write!(
                f,
                "{} = \"{value}\" is not of type {expected}",
                key(block, item, element)
            ),
            Self::DuplicateItem {
                block,
                item,
                element,
            } => write!(f, "{} defined for the second time", key(block, item, element)),
        }
    }
}

impl Error for InputError {}
