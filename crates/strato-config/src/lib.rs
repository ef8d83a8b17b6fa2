//! Typed run-configuration lookup for the strato solver.
//!
//! [`Input`] holds configuration values as strings keyed by
//! `(block, item, element)` and converts them on lookup. Required lookups
//! fail when a key is absent; optional lookups fall back to a default.
//! Every entry that is read is marked used, so leftovers (usually typos)
//! can be reported once the model is constructed.
//!
//! Reading configuration files is not this crate's job: callers fill an
//! [`Input`] with [`Input::insert`] from whatever source they have.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod input;
pub mod item;

pub use error::InputError;
pub use input::{Input, ItemKey};
pub use item::FromItem;
