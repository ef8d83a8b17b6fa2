//! The [`Advec`] trait and scheme construction.

use strato_fields::FieldCollection;
use strato_grid::{GhostCells, Grid};

use crate::advec2::Advec2;
use crate::config::{AdvecConfig, AdvecScheme};
use crate::disabled::AdvecDisabled;
use crate::error::AdvecError;

/// An advection scheme.
///
/// # Contract
///
/// - `exec` adds into the tendencies and never overwrites them. The
///   driver zeroes tendencies at the start of a step.
/// - `exec` reads one or more halo layers of the velocities and scalars.
///   Halos must be up to date before it is called.
/// - `get_cfl` and `get_time_limit` are collectives over the grid's
///   communicator and block until every rank has called them.
/// - Results depend only on the field state, never on the decomposition.
///
/// # Panics
///
/// Every operation panics if `fields` was not laid out on `grid`, or if
/// the grid halo is narrower than [`ghost_cells`](Advec::ghost_cells).
/// The stencils index the field slices with the grid's strides, so a
/// collection from another grid would be read with the wrong layout.
///
/// # Object safety
///
/// The driver holds the selected scheme as `Box<dyn Advec>`.
pub trait Advec: Send {
    /// The `swadvec` value selecting this scheme.
    fn name(&self) -> &'static str;

    /// Halo width the stencils read.
    fn ghost_cells(&self) -> GhostCells;

    /// Global maximum advective CFL number for time step `dt`.
    fn get_cfl(&self, fields: &FieldCollection, grid: &Grid, dt: f64) -> f64;

    /// Largest step, in integer time units, that keeps the CFL number at
    /// or below `cflmax`, given that `idt` units correspond to `dt`.
    ///
    /// Advisory: the caller decides what step to take.
    fn get_time_limit(&self, fields: &FieldCollection, grid: &Grid, idt: u64, dt: f64) -> u64;

    /// Add the advective tendencies of momentum and every prognostic scalar.
    fn exec(&self, fields: &mut FieldCollection, grid: &Grid);
}

/// Build the scheme named in `config`.
///
/// # Errors
///
/// [`AdvecError::InvalidCfl`] for unusable CFL bounds and
/// [`AdvecError::InsufficientGhostCells`] if the grid halo is narrower
/// than the scheme's stencils.
///
/// # Examples
///
/// ```
/// use strato_advec::{create, AdvecConfig, AdvecScheme};
/// use strato_core::SerialComm;
/// use strato_fields::FieldCollection;
/// use strato_grid::{Grid, GridConfig};
///
/// let grid = Grid::new(GridConfig::new(8, 8, 8, 8.0, 8.0, 8.0), Box::new(SerialComm)).unwrap();
/// let advec = create(&AdvecConfig::new(AdvecScheme::Second), &grid).unwrap();
/// let mut fields = FieldCollection::new(&grid, advec.ghost_cells()).unwrap();
///
/// fields.u_mut().fill(2.0);
/// assert_eq!(advec.get_cfl(&fields, &grid, 0.25), 0.5);
///
/// advec.exec(&mut fields, &grid);
/// assert!(fields.ut().data().iter().all(|&v| v == 0.0));
/// ```
pub fn create(config: &AdvecConfig, grid: &Grid) -> Result<Box<dyn Advec>, AdvecError> {
    config.validate()?;
    ensure_halo(config.scheme, grid.ghost())?;

    tracing::info!(
        scheme = config.scheme.as_str(),
        cflmax = config.cflmax,
        cflmin = config.cflmin,
        "advection scheme selected"
    );

    Ok(match config.scheme {
        AdvecScheme::Disabled => Box::new(AdvecDisabled::new(config.cflmin)),
        AdvecScheme::Second => Box::new(Advec2::new(config.cflmax, config.cflmin)),
    })
}

/// Panic unless `fields` has the layout of `grid` and the grid halo
/// covers `required`.
pub(crate) fn assert_layout(fields: &FieldCollection, grid: &Grid, required: GhostCells) {
    assert_eq!(
        fields.shape(),
        grid.shape(),
        "field collection was built on a different grid"
    );
    assert!(
        grid.ghost().covers(required),
        "grid halo {:?} is narrower than the stencil's {:?}",
        grid.ghost(),
        required
    );
}

fn ensure_halo(scheme: AdvecScheme, available: GhostCells) -> Result<(), AdvecError> {
    let required = scheme.ghost_cells();
    if available.covers(required) {
        Ok(())
    } else {
        Err(AdvecError::InsufficientGhostCells {
            scheme: scheme.as_str(),
            required,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_test_utils::{fields_on, unit_grid};

    #[test]
    fn creates_selected_scheme() {
        let grid = unit_grid(4, 4, 4);
        let second = create(&AdvecConfig::new(AdvecScheme::Second), &grid).unwrap();
        assert_eq!(second.name(), "2");
        assert_eq!(second.ghost_cells(), GhostCells::uniform(1));

        let off = create(&AdvecConfig::new(AdvecScheme::Disabled), &grid).unwrap();
        assert_eq!(off.name(), "0");
    }

    #[test]
    fn invalid_cfl_rejected_at_creation() {
        let grid = unit_grid(4, 4, 4);
        let cfg = AdvecConfig::new(AdvecScheme::Second).with_cfl(1.0, 2.0);
        assert!(matches!(
            create(&cfg, &grid),
            Err(AdvecError::InvalidCfl { .. })
        ));
    }

    #[test]
    fn narrow_halo_rejected() {
        let thin = GhostCells {
            igc: 1,
            jgc: 1,
            kgc: 0,
        };
        match ensure_halo(AdvecScheme::Second, thin) {
            Err(AdvecError::InsufficientGhostCells {
                scheme, required, ..
            }) => {
                assert_eq!(scheme, "2");
                assert_eq!(required, GhostCells::uniform(1));
            }
            other => panic!("expected InsufficientGhostCells, got {other:?}"),
        }
        assert!(ensure_halo(AdvecScheme::Disabled, thin).is_ok());
    }

    #[test]
    fn matching_layout_passes() {
        let grid = unit_grid(4, 3, 2);
        let fields = fields_on(&grid);
        assert_layout(&fields, &grid, GhostCells::uniform(1));
    }

    #[test]
    #[should_panic(expected = "built on a different grid")]
    fn fields_from_another_grid_panic() {
        let fields = fields_on(&unit_grid(4, 4, 4));
        assert_layout(&fields, &unit_grid(8, 8, 8), GhostCells::uniform(1));
    }

    #[test]
    #[should_panic(expected = "narrower than the stencil")]
    fn halo_narrower_than_stencil_panics() {
        let grid = unit_grid(4, 4, 4);
        let fields = fields_on(&grid);
        assert_layout(&fields, &grid, GhostCells::uniform(2));
    }
}
