//! Second-order flux-form advection on the staggered grid.
//!
//! Every term is the difference of two face fluxes divided by the cell
//! width. Momentum fluxes multiply two velocities interpolated to the
//! face; scalar fluxes multiply the face-normal velocity, which already
//! lives on the face, with the scalar interpolated there. Vertical fluxes
//! are mass fluxes weighted by the reference density and converted back
//! with the density of the receiving level.
//!
//! The kernels slice every neighbour row once per `(j, k)`. The inner `i`
//! loops then index slices of equal length and carry no bounds checks, so
//! the compiler is free to vectorize them.

use strato_core::{interp2, ActiveRegion, Strides};
use strato_fields::FieldCollection;
use strato_grid::{GhostCells, Grid};

use crate::advec::{assert_layout, Advec};
use crate::config::AdvecScheme;

/// Second-order central advection (`swadvec = "2"`).
#[derive(Clone, Debug, PartialEq)]
pub struct Advec2 {
    cflmax: f64,
    cflmin: f64,
}

impl Advec2 {
    /// A scheme with the given CFL ceiling and floor.
    ///
    /// The bounds are assumed valid; [`create`](crate::create) checks them.
    pub fn new(cflmax: f64, cflmin: f64) -> Self {
        Self { cflmax, cflmin }
    }

    /// CFL ceiling.
    pub fn cflmax(&self) -> f64 {
        self.cflmax
    }

    /// CFL floor.
    pub fn cflmin(&self) -> f64 {
        self.cflmin
    }
}

impl Advec for Advec2 {
    fn name(&self) -> &'static str {
        AdvecScheme::Second.as_str()
    }

    fn ghost_cells(&self) -> GhostCells {
        AdvecScheme::Second.ghost_cells()
    }

    fn get_cfl(&self, fields: &FieldCollection, grid: &Grid, dt: f64) -> f64 {
        assert_layout(fields, grid, self.ghost_cells());
        calc_cfl(fields, grid, dt)
    }

    fn get_time_limit(&self, fields: &FieldCollection, grid: &Grid, idt: u64, dt: f64) -> u64 {
        assert_layout(fields, grid, self.ghost_cells());
        let cfl = calc_cfl(fields, grid, dt);
        if cfl < self.cflmin {
            tracing::debug!(cfl, cflmin = self.cflmin, "cfl below floor, using cflmin");
        }
        let cfl = cfl.max(self.cflmin);
        (idt as f64 * self.cflmax / cfl) as u64
    }

    fn exec(&self, fields: &mut FieldCollection, grid: &Grid) {
        assert_layout(fields, grid, self.ghost_cells());
        let st = Stencil::new(grid);
        let dzi = grid.dzi();
        let dzhi = grid.dzhi();
        let view = fields.advection_view();
        let (u, v, w) = (view.u.data(), view.v.data(), view.w.data());

        advec_u(view.ut.data_mut(), u, v, w, dzi, view.rhoref, view.rhorefh, &st);
        advec_v(view.vt.data_mut(), u, v, w, dzi, view.rhoref, view.rhorefh, &st);
        advec_w(view.wt.data_mut(), u, v, w, dzhi, view.rhoref, view.rhorefh, &st);

        for (_, scalar) in view.scalars {
            let (s, tend) = scalar.split();
            advec_s(tend.data_mut(), s.data(), u, v, w, dzi, view.rhoref, view.rhorefh, &st);
        }
    }
}

/// Loop bounds and constant coefficients shared by every kernel.
struct Stencil {
    ii: usize,
    jj: usize,
    kk: usize,
    active: ActiveRegion,
    dxi: f64,
    dyi: f64,
}

impl Stencil {
    fn new(grid: &Grid) -> Self {
        let Strides { ii, jj, kk } = grid.strides();
        Self {
            ii,
            jj,
            kk,
            active: grid.active(),
            dxi: grid.dxi(),
            dyi: grid.dyi(),
        }
    }

    /// Offset of the first active cell of row `(j, k)`.
    #[inline(always)]
    fn row_start(&self, j: usize, k: usize) -> usize {
        self.active.istart * self.ii + j * self.jj + k * self.kk
    }

    /// Active cells per row.
    #[inline(always)]
    fn row_len(&self) -> usize {
        self.active.iend - self.active.istart
    }
}

/// `n` values of `a` starting at `start`.
#[inline(always)]
fn row(a: &[f64], start: usize, n: usize) -> &[f64] {
    &a[start..start + n]
}

/// Global maximum of the advective CFL number, scaled by `dt`. Collective.
fn calc_cfl(fields: &FieldCollection, grid: &Grid, dt: f64) -> f64 {
    let st = Stencil::new(grid);
    let (ii, jj, kk) = (st.ii, st.jj, st.kk);
    let a = st.active;
    let n = st.row_len();
    let (u, v, w) = (fields.u().data(), fields.v().data(), fields.w().data());
    let dzi = grid.dzi();

    let mut cfl: f64 = 0.0;
    for k in a.kstart..a.kend {
        let dzik = dzi[k];
        for j in a.jstart..a.jend {
            let b = st.row_start(j, k);
            let (u_c, u_e) = (row(u, b, n), row(u, b + ii, n));
            let (v_c, v_n) = (row(v, b, n), row(v, b + jj, n));
            let (w_c, w_t) = (row(w, b, n), row(w, b + kk, n));
            for i in 0..n {
                cfl = cfl.max(
                    interp2(u_c[i], u_e[i]).abs() * st.dxi
                        + interp2(v_c[i], v_n[i]).abs() * st.dyi
                        + interp2(w_c[i], w_t[i]).abs() * dzik,
                );
            }
        }
    }

    grid.get_max(&mut cfl);

    cfl * dt
}

#[allow(clippy::too_many_arguments)]
fn advec_u(
    ut: &mut [f64],
    u: &[f64],
    v: &[f64],
    w: &[f64],
    dzi: &[f64],
    rhoref: &[f64],
    rhorefh: &[f64],
    st: &Stencil,
) {
    let (ii, jj, kk) = (st.ii, st.jj, st.kk);
    let a = st.active;
    let n = st.row_len();
    for k in a.kstart..a.kend {
        let (rho, rhoh_b, rhoh_t, dzik) = (rhoref[k], rhorefh[k], rhorefh[k + 1], dzi[k]);
        for j in a.jstart..a.jend {
            let b = st.row_start(j, k);
            let tend = &mut ut[b..b + n];
            let (u_c, u_w, u_e) = (row(u, b, n), row(u, b - ii, n), row(u, b + ii, n));
            let (u_s, u_n) = (row(u, b - jj, n), row(u, b + jj, n));
            let (u_b, u_t) = (row(u, b - kk, n), row(u, b + kk, n));
            let (v_c, v_w) = (row(v, b, n), row(v, b - ii, n));
            let (v_n, v_nw) = (row(v, b + jj, n), row(v, b + jj - ii, n));
            let (w_c, w_w) = (row(w, b, n), row(w, b - ii, n));
            let (w_t, w_tw) = (row(w, b + kk, n), row(w, b + kk - ii, n));
            for i in 0..n {
                tend[i] += -(interp2(u_c[i], u_e[i]) * interp2(u_c[i], u_e[i])
                    - interp2(u_w[i], u_c[i]) * interp2(u_w[i], u_c[i]))
                    * st.dxi
                    - (interp2(v_nw[i], v_n[i]) * interp2(u_c[i], u_n[i])
                        - interp2(v_w[i], v_c[i]) * interp2(u_s[i], u_c[i]))
                        * st.dyi
                    - (rhoh_t * interp2(w_tw[i], w_t[i]) * interp2(u_c[i], u_t[i])
                        - rhoh_b * interp2(w_w[i], w_c[i]) * interp2(u_b[i], u_c[i]))
                        / rho
                        * dzik;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn advec_v(
    vt: &mut [f64],
    u: &[f64],
    v: &[f64],
    w: &[f64],
    dzi: &[f64],
    rhoref: &[f64],
    rhorefh: &[f64],
    st: &Stencil,
) {
    let (ii, jj, kk) = (st.ii, st.jj, st.kk);
    let a = st.active;
    let n = st.row_len();
    for k in a.kstart..a.kend {
        let (rho, rhoh_b, rhoh_t, dzik) = (rhoref[k], rhorefh[k], rhorefh[k + 1], dzi[k]);
        for j in a.jstart..a.jend {
            let b = st.row_start(j, k);
            let tend = &mut vt[b..b + n];
            let (u_c, u_s) = (row(u, b, n), row(u, b - jj, n));
            let (u_e, u_se) = (row(u, b + ii, n), row(u, b + ii - jj, n));
            let (v_c, v_w, v_e) = (row(v, b, n), row(v, b - ii, n), row(v, b + ii, n));
            let (v_s, v_n) = (row(v, b - jj, n), row(v, b + jj, n));
            let (v_b, v_t) = (row(v, b - kk, n), row(v, b + kk, n));
            let (w_c, w_s) = (row(w, b, n), row(w, b - jj, n));
            let (w_t, w_ts) = (row(w, b + kk, n), row(w, b + kk - jj, n));
            for i in 0..n {
                tend[i] += -(interp2(u_se[i], u_e[i]) * interp2(v_c[i], v_e[i])
                    - interp2(u_s[i], u_c[i]) * interp2(v_w[i], v_c[i]))
                    * st.dxi
                    - (interp2(v_c[i], v_n[i]) * interp2(v_c[i], v_n[i])
                        - interp2(v_s[i], v_c[i]) * interp2(v_s[i], v_c[i]))
                        * st.dyi
                    - (rhoh_t * interp2(w_ts[i], w_t[i]) * interp2(v_c[i], v_t[i])
                        - rhoh_b * interp2(w_s[i], w_c[i]) * interp2(v_b[i], v_c[i]))
                        / rho
                        * dzik;
            }
        }
    }
}

/// `w` sits on half levels; the surface level `kstart` is left alone.
#[allow(clippy::too_many_arguments)]
fn advec_w(
    wt: &mut [f64],
    u: &[f64],
    v: &[f64],
    w: &[f64],
    dzhi: &[f64],
    rhoref: &[f64],
    rhorefh: &[f64],
    st: &Stencil,
) {
    let (ii, jj, kk) = (st.ii, st.jj, st.kk);
    let a = st.active;
    let n = st.row_len();
    for k in a.kstart + 1..a.kend {
        let (rho_b, rho_t, rhoh, dzhik) = (rhoref[k - 1], rhoref[k], rhorefh[k], dzhi[k]);
        for j in a.jstart..a.jend {
            let b = st.row_start(j, k);
            let tend = &mut wt[b..b + n];
            let (u_c, u_b) = (row(u, b, n), row(u, b - kk, n));
            let (u_e, u_be) = (row(u, b + ii, n), row(u, b + ii - kk, n));
            let (v_c, v_b) = (row(v, b, n), row(v, b - kk, n));
            let (v_n, v_bn) = (row(v, b + jj, n), row(v, b + jj - kk, n));
            let (w_c, w_w, w_e) = (row(w, b, n), row(w, b - ii, n), row(w, b + ii, n));
            let (w_s, w_n) = (row(w, b - jj, n), row(w, b + jj, n));
            let (w_b, w_t) = (row(w, b - kk, n), row(w, b + kk, n));
            for i in 0..n {
                tend[i] += -(interp2(u_be[i], u_e[i]) * interp2(w_c[i], w_e[i])
                    - interp2(u_b[i], u_c[i]) * interp2(w_w[i], w_c[i]))
                    * st.dxi
                    - (interp2(v_bn[i], v_n[i]) * interp2(w_c[i], w_n[i])
                        - interp2(v_b[i], v_c[i]) * interp2(w_s[i], w_c[i]))
                        * st.dyi
                    - (rho_t * interp2(w_c[i], w_t[i]) * interp2(w_c[i], w_t[i])
                        - rho_b * interp2(w_b[i], w_c[i]) * interp2(w_b[i], w_c[i]))
                        / rhoh
                        * dzhik;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn advec_s(
    tend: &mut [f64],
    s: &[f64],
    u: &[f64],
    v: &[f64],
    w: &[f64],
    dzi: &[f64],
    rhoref: &[f64],
    rhorefh: &[f64],
    st: &Stencil,
) {
    let (ii, jj, kk) = (st.ii, st.jj, st.kk);
    let a = st.active;
    let n = st.row_len();
    for k in a.kstart..a.kend {
        let (rho, rhoh_b, rhoh_t, dzik) = (rhoref[k], rhorefh[k], rhorefh[k + 1], dzi[k]);
        for j in a.jstart..a.jend {
            let b = st.row_start(j, k);
            let tend = &mut tend[b..b + n];
            let (s_c, s_w, s_e) = (row(s, b, n), row(s, b - ii, n), row(s, b + ii, n));
            let (s_s, s_n) = (row(s, b - jj, n), row(s, b + jj, n));
            let (s_b, s_t) = (row(s, b - kk, n), row(s, b + kk, n));
            let (u_c, u_e) = (row(u, b, n), row(u, b + ii, n));
            let (v_c, v_n) = (row(v, b, n), row(v, b + jj, n));
            let (w_c, w_t) = (row(w, b, n), row(w, b + kk, n));
            for i in 0..n {
                tend[i] += -(u_e[i] * interp2(s_c[i], s_e[i]) - u_c[i] * interp2(s_w[i], s_c[i]))
                    * st.dxi
                    - (v_n[i] * interp2(s_c[i], s_n[i]) - v_c[i] * interp2(s_s[i], s_c[i]))
                        * st.dyi
                    - (rhoh_t * w_t[i] * interp2(s_c[i], s_t[i])
                        - rhoh_b * w_c[i] * interp2(s_b[i], s_c[i]))
                        / rho
                        * dzik;
            }
        }
    }
}
