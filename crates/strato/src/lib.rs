//! Strato: the staggered-grid advection core of an atmospheric LES/DNS solver.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! strato sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use strato::prelude::*;
//!
//! let mut input = Input::new();
//! for (item, value) in [
//!     ("itot", "16"), ("jtot", "16"), ("ktot", "8"),
//!     ("xsize", "16"), ("ysize", "16"), ("zsize", "8"),
//! ] {
//!     input.insert("grid", item, "", value).unwrap();
//! }
//! input.insert("advec", "cflmax", "", "1.5").unwrap();
//!
//! let grid = Grid::new(GridConfig::from_input(&input).unwrap(), Box::new(SerialComm)).unwrap();
//! let advec = create(&AdvecConfig::from_input(&input, &grid).unwrap(), &grid).unwrap();
//! let mut fields = FieldCollection::new(&grid, advec.ghost_cells()).unwrap();
//! fields.init_prognostic_field("th", "potential temperature", "K").unwrap();
//! assert_eq!(input.warn_unused(), 0);
//!
//! // CFL 0.5 at dt = 1, so the step may grow to 1.5 / 0.5 times idt.
//! fields.u_mut().fill(0.5);
//! let idt = advec.get_time_limit(&fields, &grid, 1_000, 1.0);
//! assert_eq!(idt, 3_000);
//!
//! fields.reset_tendencies();
//! advec.exec(&mut fields, &grid);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`core`] | `strato-core` | Communicators, index arithmetic, `interp2` |
//! | [`config`] | `strato-config` | Typed configuration store |
//! | [`grid`] | `strato-grid` | Decomposed staggered grid |
//! | [`fields`] | `strato-fields` | Fields, the field collection, initial perturbations |
//! | [`advec`] | `strato-advec` | Advection schemes |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Communicators, index arithmetic and stencil helpers (`strato-core`).
pub use strato_core as core;

/// Typed block/item/element configuration store (`strato-config`).
pub use strato_config as config;

/// Decomposed staggered grid with stretched vertical levels (`strato-grid`).
pub use strato_grid as grid;

/// Ghost-padded fields and the [`fields::FieldCollection`] (`strato-fields`).
pub use strato_fields as fields;

/// Advection schemes behind the [`advec::Advec`] trait (`strato-advec`).
pub use strato_advec as advec;

/// Common imports for typical strato usage.
///
/// ```rust
/// use strato::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use strato_core::{interp2, ActiveRegion, Communicator, SerialComm, Strides, ThreadComm};

    // Configuration
    pub use strato_config::Input;

    // Grid
    pub use strato_grid::{GhostCells, Grid, GridConfig};

    // Fields
    pub use strato_fields::{Field3d, FieldCollection, InitialState, VortexAxis};

    // Advection
    pub use strato_advec::{create, Advec, AdvecConfig, AdvecScheme};

    // Errors
    pub use strato_advec::AdvecError;
    pub use strato_config::InputError;
    pub use strato_core::CommError;
    pub use strato_fields::FieldError;
    pub use strato_grid::GridError;
}
