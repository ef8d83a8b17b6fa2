//! Benchmark profiles for the strato solver.
//!
//! - [`reference_profile`]: 64³ cells, two scalars, uniform levels
//! - [`stress_profile`]: 128 × 128 × 64 cells, four scalars, stretched levels
//!
//! [`build`] turns a profile into a ready-to-run grid, field collection and
//! second-order scheme with deterministic noisy initial state.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strato_advec::{create, Advec, AdvecConfig, AdvecScheme};
use strato_core::SerialComm;
use strato_fields::FieldCollection;
use strato_grid::{Grid, GridConfig};
use strato_test_utils::{fill_noise, zero_w_at_walls};

/// Problem size for one benchmark.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Cells in x.
    pub itot: usize,
    /// Cells in y.
    pub jtot: usize,
    /// Cells in z.
    pub ktot: usize,
    /// Number of prognostic scalars.
    pub nscalars: usize,
    /// Use geometrically stretched vertical levels.
    pub stretched: bool,
}

/// 64³ cells with two scalars.
pub fn reference_profile() -> Profile {
    Profile {
        itot: 64,
        jtot: 64,
        ktot: 64,
        nscalars: 2,
        stretched: false,
    }
}

/// 128 × 128 × 64 cells with four scalars on a stretched column.
pub fn stress_profile() -> Profile {
    Profile {
        itot: 128,
        jtot: 128,
        ktot: 64,
        nscalars: 4,
        stretched: true,
    }
}

/// Full-level heights growing by 2% per level, scaled to fit `zsize`.
fn stretched_levels(ktot: usize, zsize: f64) -> Vec<f64> {
    let mut dz = Vec::with_capacity(ktot);
    let mut d = 1.0;
    for _ in 0..ktot {
        dz.push(d);
        d *= 1.02;
    }
    let scale = zsize / dz.iter().sum::<f64>();
    let mut z = Vec::with_capacity(ktot);
    let mut bottom = 0.0;
    for d in dz {
        z.push(bottom + 0.5 * d * scale);
        bottom += d * scale;
    }
    z
}

/// Build a single-rank setup for `profile` with noise seeded by `seed`.
pub fn build(profile: &Profile, seed: u64) -> (Grid, FieldCollection, Box<dyn Advec>) {
    let zsize = 1000.0;
    let mut config = GridConfig::new(
        profile.itot,
        profile.jtot,
        profile.ktot,
        25.0 * profile.itot as f64,
        25.0 * profile.jtot as f64,
        zsize,
    );
    if profile.stretched {
        config = config.with_levels(stretched_levels(profile.ktot, zsize));
    }
    let grid = Grid::new(config, Box::new(SerialComm)).expect("bench grid is valid");
    let advec =
        create(&AdvecConfig::new(AdvecScheme::Second), &grid).expect("bench scheme is valid");
    let mut fields =
        FieldCollection::new(&grid, advec.ghost_cells()).expect("bench halo is wide enough");

    fill_noise(fields.u_mut(), &grid, seed, 5.0);
    fill_noise(fields.v_mut(), &grid, seed + 1, 5.0);
    fill_noise(fields.w_mut(), &grid, seed + 2, 1.0);
    zero_w_at_walls(fields.w_mut(), &grid);
    for n in 0..profile.nscalars {
        let name = format!("s{n}");
        fields
            .init_prognostic_field(&name, "", "")
            .expect("scalar names are unique");
        let s = fields.sp_mut(&name).expect("scalar was just registered");
        fill_noise(s, &grid, seed + 10 + n as u64, 1.0);
    }

    (grid, fields, advec)
}
