//! Advection switched off (`swadvec = "0"`).

use strato_fields::FieldCollection;
use strato_grid::{GhostCells, Grid};

use crate::advec::{assert_layout, Advec};
use crate::config::AdvecScheme;

/// A scheme that adds nothing and never limits the time step.
///
/// None of its methods touch the communicator, so ranks need not call
/// them in step.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvecDisabled {
    cflmin: f64,
}

impl AdvecDisabled {
    /// A disabled scheme reporting `cflmin` as its CFL number.
    pub fn new(cflmin: f64) -> Self {
        Self { cflmin }
    }
}

impl Advec for AdvecDisabled {
    fn name(&self) -> &'static str {
        AdvecScheme::Disabled.as_str()
    }

    fn ghost_cells(&self) -> GhostCells {
        AdvecScheme::Disabled.ghost_cells()
    }

    fn get_cfl(&self, fields: &FieldCollection, grid: &Grid, _dt: f64) -> f64 {
        assert_layout(fields, grid, self.ghost_cells());
        self.cflmin
    }

    fn get_time_limit(&self, fields: &FieldCollection, grid: &Grid, _idt: u64, _dt: f64) -> u64 {
        assert_layout(fields, grid, self.ghost_cells());
        u64::MAX
    }

    fn exec(&self, fields: &mut FieldCollection, grid: &Grid) {
        assert_layout(fields, grid, self.ghost_cells());
    }
}
