//! Grid configuration and validation.

use strato_config::Input;

use crate::error::GridError;

/// Ghost-cell (halo) widths on each side of the active region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GhostCells {
    /// Halo width in x.
    pub igc: usize,
    /// Halo width in y.
    pub jgc: usize,
    /// Halo width in z.
    pub kgc: usize,
}

impl GhostCells {
    /// The same width on every axis.
    pub fn uniform(width: usize) -> Self {
        Self {
            igc: width,
            jgc: width,
            kgc: width,
        }
    }

    /// Whether every axis is at least as wide as `required` on that axis.
    pub fn covers(&self, required: GhostCells) -> bool {
        self.igc >= required.igc && self.jgc >= required.jgc && self.kgc >= required.kgc
    }
}

impl Default for GhostCells {
    fn default() -> Self {
        Self::uniform(1)
    }
}

/// Everything needed to build a [`Grid`](crate::Grid) on one rank.
#[derive(Clone, Debug, PartialEq)]
pub struct GridConfig {
    /// Global cell count in x.
    pub itot: usize,
    /// Global cell count in y.
    pub jtot: usize,
    /// Cell count in z (never decomposed).
    pub ktot: usize,
    /// Domain length in x.
    pub xsize: f64,
    /// Domain length in y.
    pub ysize: f64,
    /// Domain height.
    pub zsize: f64,
    /// Full-level heights, bottom to top. `None` gives uniform levels.
    pub z: Option<Vec<f64>>,
    /// Ranks along x.
    pub npx: usize,
    /// Ranks along y.
    pub npy: usize,
    /// Halo widths.
    pub ghost_cells: GhostCells,
    /// Default spatial order of the numerical schemes, e.g. `"2"`.
    pub spatial_order: String,
}

impl GridConfig {
    /// A single-rank configuration with uniform vertical levels.
    pub fn new(itot: usize, jtot: usize, ktot: usize, xsize: f64, ysize: f64, zsize: f64) -> Self {
        Self {
            itot,
            jtot,
            ktot,
            xsize,
            ysize,
            zsize,
            z: None,
            npx: 1,
            npy: 1,
            ghost_cells: GhostCells::default(),
            spatial_order: "2".to_string(),
        }
    }

    /// Read the `[grid]` and `[mpi]` blocks.
    ///
    /// `itot`, `jtot`, `ktot`, `xsize`, `ysize` and `zsize` are required.
    /// `z` (list), `swspatialorder`, `npx` and `npy` are optional.
    pub fn from_input(input: &Input) -> Result<Self, GridError> {
        let z: Vec<f64> = input.get_item_or("grid", "z", "", Vec::new())?;
        Ok(Self {
            itot: input.get_item("grid", "itot", "")?,
            jtot: input.get_item("grid", "jtot", "")?,
            ktot: input.get_item("grid", "ktot", "")?,
            xsize: input.get_item("grid", "xsize", "")?,
            ysize: input.get_item("grid", "ysize", "")?,
            zsize: input.get_item("grid", "zsize", "")?,
            z: if z.is_empty() { None } else { Some(z) },
            npx: input.get_item_or("mpi", "npx", "", 1)?,
            npy: input.get_item_or("mpi", "npy", "", 1)?,
            ghost_cells: GhostCells::default(),
            spatial_order: input.get_item_or("grid", "swspatialorder", "", "2".to_string())?,
        })
    }

    /// Set the processor layout.
    pub fn with_decomposition(mut self, npx: usize, npy: usize) -> Self {
        self.npx = npx;
        self.npy = npy;
        self
    }

    /// Set explicit full-level heights.
    pub fn with_levels(mut self, z: Vec<f64>) -> Self {
        self.z = Some(z);
        self
    }

    /// Set the halo widths.
    pub fn with_ghost_cells(mut self, ghost_cells: GhostCells) -> Self {
        self.ghost_cells = ghost_cells;
        self
    }

    /// Check structural invariants for a run on `nprocs` ranks.
    pub fn validate(&self, nprocs: usize) -> Result<(), GridError> {
        // 1. Non-empty dimensions.
        for (name, n) in [("itot", self.itot), ("jtot", self.jtot), ("ktot", self.ktot)] {
            if n == 0 {
                return Err(GridError::EmptyDimension { name });
            }
        }
        // 2. Domain sizes finite and positive.
        for (name, value) in [
            ("xsize", self.xsize),
            ("ysize", self.ysize),
            ("zsize", self.zsize),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::InvalidExtent { name, value });
            }
        }
        // 3. Decomposition matches the communicator and divides the domain.
        if self.npx == 0 || self.npy == 0 {
            return Err(GridError::Decomposition {
                reason: format!("npx ({}) and npy ({}) must be at least 1", self.npx, self.npy),
            });
        }
        if self.npx * self.npy != nprocs {
            return Err(GridError::Decomposition {
                reason: format!(
                    "npx*npy = {} does not match the number of ranks {nprocs}",
                    self.npx * self.npy
                ),
            });
        }
        if self.itot % self.npx != 0 {
            return Err(GridError::Decomposition {
                reason: format!("itot ({}) is not a multiple of npx ({})", self.itot, self.npx),
            });
        }
        if self.jtot % self.npy != 0 {
            return Err(GridError::Decomposition {
                reason: format!("jtot ({}) is not a multiple of npy ({})", self.jtot, self.npy),
            });
        }
        // 4. Halo must exist and be mirrorable into the active region.
        let gc = self.ghost_cells;
        if gc.igc == 0 || gc.jgc == 0 || gc.kgc == 0 {
            return Err(GridError::InvalidGhostCells {
                reason: format!("widths must be at least 1, got {gc:?}"),
            });
        }
        if self.ktot < gc.kgc {
            return Err(GridError::InvalidGhostCells {
                reason: format!("kgc ({}) exceeds ktot ({})", gc.kgc, self.ktot),
            });
        }
        // 5. Explicit levels must fit the column.
        if let Some(z) = &self.z {
            crate::vertical::validate_levels(z, self.ktot, self.zsize)?;
        }
        Ok(())
    }
}
