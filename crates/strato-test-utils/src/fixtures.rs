//! Grid, field and multi-rank fixtures.

use std::sync::Arc;
use std::thread;

use strato_core::{SerialComm, ThreadComm};
use strato_fields::{cell_noise, Field3d, FieldCollection};
use strato_grid::{GhostCells, Grid, GridConfig};

/// Single-rank grid with unit spacing in every direction.
pub fn unit_grid(itot: usize, jtot: usize, ktot: usize) -> Grid {
    serial_grid(GridConfig::new(
        itot,
        jtot,
        ktot,
        itot as f64,
        jtot as f64,
        ktot as f64,
    ))
}

/// Single-rank grid from an explicit configuration.
pub fn serial_grid(config: GridConfig) -> Grid {
    Grid::new(config, Box::new(SerialComm)).expect("fixture grid config is valid")
}

/// Field collection for stencils with a one-cell halo.
pub fn fields_on(grid: &Grid) -> FieldCollection {
    FieldCollection::new(grid, GhostCells::uniform(1)).expect("fixture grid has a halo")
}

/// Write `f(gi, gj, k)` into every cell, halo included.
///
/// `gi` and `gj` are global indices wrapped periodically into
/// `0..itot` and `0..jtot`, so horizontal halos hold what a periodic halo
/// exchange would put there. `k` is the local (padded) vertical index.
pub fn fill_from_global(field: &mut Field3d, grid: &Grid, f: impl Fn(usize, usize, usize) -> f64) {
    let s = grid.strides();
    let itot = grid.itot() as isize;
    let jtot = grid.jtot() as isize;
    let data = field.data_mut();
    for k in 0..grid.kcells() {
        for j in 0..grid.jcells() {
            let gj = grid.global_j(j).rem_euclid(jtot) as usize;
            for i in 0..grid.icells() {
                let gi = grid.global_i(i).rem_euclid(itot) as usize;
                data[s.index(i, j, k)] = f(gi, gj, k);
            }
        }
    }
}

/// Deterministic noise in `[-1, 1)` for one global cell.
///
/// Depends only on the seed and the cell, never on the decomposition.
pub fn noise(seed: u64, gi: usize, gj: usize, k: usize) -> f64 {
    cell_noise(seed, 0, gi, gj, k)
}

/// Fill with `amplitude * noise` keyed on the global index.
pub fn fill_noise(field: &mut Field3d, grid: &Grid, seed: u64, amplitude: f64) {
    fill_from_global(field, grid, |gi, gj, k| amplitude * noise(seed, gi, gj, k));
}

/// Zero `w` at the surface and the domain top and mirror it beyond them.
pub fn zero_w_at_walls(w: &mut Field3d, grid: &Grid) {
    let a = grid.active();
    let s = grid.strides();
    let data = w.data_mut();
    for j in 0..grid.jcells() {
        for i in 0..grid.icells() {
            data[s.index(i, j, a.kstart)] = 0.0;
            data[s.index(i, j, a.kend)] = 0.0;
            for g in 1..=grid.ghost().kgc {
                data[s.index(i, j, a.kstart - g)] = -data[s.index(i, j, a.kstart + g)];
                if a.kend + g < grid.kcells() {
                    data[s.index(i, j, a.kend + g)] = -data[s.index(i, j, a.kend - g)];
                }
            }
        }
    }
}

/// Run `f` on `nprocs` threads, one [`ThreadComm`] each. Results come
/// back in rank order.
pub fn run_ranks<T, F>(nprocs: usize, f: F) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(ThreadComm) -> T + Send + Sync + 'static,
{
    let f = Arc::new(f);
    let handles: Vec<_> = ThreadComm::create(nprocs)
        .expect("at least one rank")
        .into_iter()
        .map(|comm| {
            let f = Arc::clone(&f);
            thread::spawn(move || f(comm))
        })
        .collect();
    handles
        .into_iter()
        .map(|h| h.join().expect("rank thread panicked"))
        .collect()
}
