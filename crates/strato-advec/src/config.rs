//! Scheme selection and CFL bounds.

use std::fmt;
use std::str::FromStr;

use strato_config::Input;
use strato_grid::{GhostCells, Grid};

use crate::error::AdvecError;

/// Default CFL ceiling.
pub const DEFAULT_CFLMAX: f64 = 1.0;

/// Default floor on the advective CFL used in the time-step limit.
pub const DEFAULT_CFLMIN: f64 = 1e-5;

/// The available advection schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvecScheme {
    /// `"0"`: advection switched off.
    Disabled,
    /// `"2"`: second-order central differences.
    Second,
}

impl AdvecScheme {
    /// The configuration string selecting this scheme.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "0",
            Self::Second => "2",
        }
    }

    /// Halo width the scheme's stencils read around the active region.
    pub fn ghost_cells(self) -> GhostCells {
        match self {
            Self::Disabled => GhostCells::uniform(0),
            Self::Second => GhostCells::uniform(1),
        }
    }
}

impl FromStr for AdvecScheme {
    type Err = AdvecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self::Disabled),
            "2" => Ok(Self::Second),
            other => Err(AdvecError::UnknownScheme {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AdvecScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings of the `[advec]` block.
#[derive(Clone, Debug, PartialEq)]
pub struct AdvecConfig {
    /// Selected scheme.
    pub scheme: AdvecScheme,
    /// CFL number the time-step limit aims for.
    pub cflmax: f64,
    /// Lower bound on the CFL number used in the time-step limit.
    pub cflmin: f64,
}

impl AdvecConfig {
    /// Default CFL bounds for `scheme`.
    pub fn new(scheme: AdvecScheme) -> Self {
        Self {
            scheme,
            cflmax: DEFAULT_CFLMAX,
            cflmin: DEFAULT_CFLMIN,
        }
    }

    /// Read `swadvec`, `cflmax` and `cflmin` from the `[advec]` block.
    ///
    /// `swadvec` defaults to the grid's spatial order.
    pub fn from_input(input: &Input, grid: &Grid) -> Result<Self, AdvecError> {
        let swadvec: String =
            input.get_item_or("advec", "swadvec", "", grid.spatial_order().to_string())?;
        Ok(Self {
            scheme: swadvec.parse()?,
            cflmax: input.get_item_or("advec", "cflmax", "", DEFAULT_CFLMAX)?,
            cflmin: input.get_item_or("advec", "cflmin", "", DEFAULT_CFLMIN)?,
        })
    }

    /// Set the CFL bounds.
    pub fn with_cfl(mut self, cflmax: f64, cflmin: f64) -> Self {
        self.cflmax = cflmax;
        self.cflmin = cflmin;
        self
    }

    /// Check `0 < cflmin < cflmax` with both finite.
    pub fn validate(&self) -> Result<(), AdvecError> {
        let ok = self.cflmin.is_finite()
            && self.cflmax.is_finite()
            && self.cflmin > 0.0
            && self.cflmin < self.cflmax;
        if ok {
            Ok(())
        } else {
            Err(AdvecError::InvalidCfl {
                cflmin: self.cflmin,
                cflmax: self.cflmax,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strato_grid::GridConfig;
    use strato_test_utils::serial_grid;

    #[test]
    fn scheme_strings() {
        assert_eq!("2".parse::<AdvecScheme>(), Ok(AdvecScheme::Second));
        assert_eq!("0".parse::<AdvecScheme>(), Ok(AdvecScheme::Disabled));
        assert_eq!(
            "4".parse::<AdvecScheme>(),
            Err(AdvecError::UnknownScheme { name: "4".into() })
        );
        assert_eq!(AdvecScheme::Second.to_string(), "2");
    }

    #[test]
    fn cfl_bounds_validated() {
        let base = AdvecConfig::new(AdvecScheme::Second);
        assert!(base.validate().is_ok());
        for (cflmax, cflmin) in [(1.0, 0.0), (1.0, -1.0), (1.0, 1.0), (0.5, 1.0), (f64::INFINITY, 0.1)] {
            assert!(
                matches!(
                    base.clone().with_cfl(cflmax, cflmin).validate(),
                    Err(AdvecError::InvalidCfl { .. })
                ),
                "cflmax = {cflmax}, cflmin = {cflmin}"
            );
        }
    }

    #[test]
    fn from_input_uses_grid_order_and_defaults() {
        let mut order_grid = GridConfig::new(4, 4, 4, 4.0, 4.0, 4.0);
        order_grid.spatial_order = "0".to_string();
        let grid = serial_grid(order_grid);

        let input = Input::new();
        let cfg = AdvecConfig::from_input(&input, &grid).unwrap();
        assert_eq!(cfg.scheme, AdvecScheme::Disabled);
        assert_eq!(cfg.cflmax, DEFAULT_CFLMAX);
        assert_eq!(cfg.cflmin, DEFAULT_CFLMIN);
    }

    #[test]
    fn from_input_reads_block() {
        let grid = serial_grid(GridConfig::new(4, 4, 4, 4.0, 4.0, 4.0));
        let mut input = Input::new();
        input.insert("advec", "swadvec", "", "2").unwrap();
        input.insert("advec", "cflmax", "", "1.4").unwrap();
        let cfg = AdvecConfig::from_input(&input, &grid).unwrap();
        assert_eq!(cfg.scheme, AdvecScheme::Second);
        assert_eq!(cfg.cflmax, 1.4);
        assert!(input.unused_items().is_empty());
    }

    #[test]
    fn from_input_rejects_unknown_scheme() {
        let grid = serial_grid(GridConfig::new(4, 4, 4, 4.0, 4.0, 4.0));
        let mut input = Input::new();
        input.insert("advec", "swadvec", "", "44").unwrap();
        assert!(matches!(
            AdvecConfig::from_input(&input, &grid),
            Err(AdvecError::UnknownScheme { .. })
        ));
    }
}
