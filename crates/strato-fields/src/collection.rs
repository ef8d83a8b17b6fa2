//! The [`FieldCollection`]: every field of a run, owned in one place.

use indexmap::IndexMap;
use strato_core::{interp2, Shape};
use strato_grid::{GhostCells, Grid};

use crate::error::FieldError;
use crate::field::Field3d;
use crate::init::{cell_noise, InitialState, VortexAxis};

const MOMENTUM_NAMES: [&str; 4] = ["u", "v", "w", "p"];

/// A prognostic scalar and its tendency, registered together.
#[derive(Clone, Debug)]
pub struct ScalarField {
    prog: Field3d,
    tend: Field3d,
}

impl ScalarField {
    /// Current state.
    pub fn prog(&self) -> &Field3d {
        &self.prog
    }

    /// Current state, mutable.
    pub fn prog_mut(&mut self) -> &mut Field3d {
        &mut self.prog
    }

    /// Accumulated tendency.
    pub fn tend(&self) -> &Field3d {
        &self.tend
    }

    /// Accumulated tendency, mutable.
    pub fn tend_mut(&mut self) -> &mut Field3d {
        &mut self.tend
    }

    /// Read the state while writing the tendency.
    pub fn split(&mut self) -> (&Field3d, &mut Field3d) {
        (&self.prog, &mut self.tend)
    }
}

/// Borrowed state for one advection pass.
///
/// Velocities and density profiles are shared; tendencies are exclusive.
/// Holding the view keeps any other component from touching the
/// tendencies until the pass is over.
pub struct AdvectionView<'a> {
    /// x velocity.
    pub u: &'a Field3d,
    /// y velocity.
    pub v: &'a Field3d,
    /// z velocity.
    pub w: &'a Field3d,
    /// x velocity tendency.
    pub ut: &'a mut Field3d,
    /// y velocity tendency.
    pub vt: &'a mut Field3d,
    /// z velocity tendency.
    pub wt: &'a mut Field3d,
    /// Prognostic scalars with their tendencies, in registration order.
    pub scalars: indexmap::map::IterMut<'a, String, ScalarField>,
    /// Reference density at full levels.
    pub rhoref: &'a [f64],
    /// Reference density at half levels.
    pub rhorefh: &'a [f64],
}

/// Momentum, scalars, reference density and scratch space for one rank.
///
/// Every field has the layout of the grid the collection was built on.
/// Scalars are keyed by name and iterate in registration order.
///
/// # Examples
///
/// ```
/// use strato_core::SerialComm;
/// use strato_fields::FieldCollection;
/// use strato_grid::{GhostCells, Grid, GridConfig};
///
/// let grid = Grid::new(GridConfig::new(8, 8, 4, 8.0, 8.0, 4.0), Box::new(SerialComm)).unwrap();
/// let mut fields = FieldCollection::new(&grid, GhostCells::uniform(1)).unwrap();
/// fields.init_prognostic_field("th", "potential temperature", "K").unwrap();
///
/// fields.sp_mut("th").unwrap().fill(300.0);
/// assert_eq!(fields.st("th").unwrap().at(1, 1, 1), 0.0);
/// ```
#[derive(Debug)]
pub struct FieldCollection {
    shape: Shape,
    u: Field3d,
    v: Field3d,
    w: Field3d,
    p: Field3d,
    ut: Field3d,
    vt: Field3d,
    wt: Field3d,
    scalars: IndexMap<String, ScalarField>,
    diagnostics: IndexMap<String, Field3d>,
    rhoref: Vec<f64>,
    rhorefh: Vec<f64>,
    tmp1: Field3d,
    tmp2: Field3d,
}

impl FieldCollection {
    /// Allocate the momentum fields, tendencies and scratch buffers.
    ///
    /// Fails with [`FieldError::InsufficientGhostCells`] unless the grid
    /// halo covers `min_ghost` on every axis. Reference densities start
    /// uniformly at 1.
    pub fn new(grid: &Grid, min_ghost: GhostCells) -> Result<Self, FieldError> {
        let available = grid.ghost();
        if !available.covers(min_ghost) {
            return Err(FieldError::InsufficientGhostCells {
                required: min_ghost,
                available,
            });
        }
        let shape = grid.shape();
        Ok(Self {
            shape,
            u: Field3d::new(shape, "u", "U velocity", "m s-1"),
            v: Field3d::new(shape, "v", "V velocity", "m s-1"),
            w: Field3d::new(shape, "w", "Vertical velocity", "m s-1"),
            p: Field3d::new(shape, "p", "Pressure", "Pa"),
            ut: Field3d::new(shape, "ut", "U velocity tendency", "m s-2"),
            vt: Field3d::new(shape, "vt", "V velocity tendency", "m s-2"),
            wt: Field3d::new(shape, "wt", "Vertical velocity tendency", "m s-2"),
            scalars: IndexMap::new(),
            diagnostics: IndexMap::new(),
            rhoref: vec![1.0; shape.kcells],
            rhorefh: vec![1.0; shape.kcells],
            tmp1: Field3d::new(shape, "tmp1", "", ""),
            tmp2: Field3d::new(shape, "tmp2", "", ""),
        })
    }

    /// Padded dimensions shared by every field.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Register a prognostic scalar together with its tendency field.
    pub fn init_prognostic_field(
        &mut self,
        name: &str,
        longname: &str,
        unit: &str,
    ) -> Result<(), FieldError> {
        self.check_free(name)?;
        let prog = Field3d::new(self.shape, name, longname, unit);
        let tend = Field3d::new(
            self.shape,
            &format!("{name}t"),
            &format!("{longname} tendency"),
            &format!("{unit} s-1"),
        );
        self.scalars
            .insert(name.to_string(), ScalarField { prog, tend });
        tracing::debug!(name, "registered prognostic scalar");
        Ok(())
    }

    /// Register a diagnostic field. Diagnostics are never advected.
    pub fn init_diagnostic_field(
        &mut self,
        name: &str,
        longname: &str,
        unit: &str,
    ) -> Result<(), FieldError> {
        self.check_free(name)?;
        self.diagnostics
            .insert(name.to_string(), Field3d::new(self.shape, name, longname, unit));
        tracing::debug!(name, "registered diagnostic field");
        Ok(())
    }

    fn check_free(&self, name: &str) -> Result<(), FieldError> {
        if MOMENTUM_NAMES.contains(&name)
            || self.scalars.contains_key(name)
            || self.diagnostics.contains_key(name)
        {
            return Err(FieldError::DuplicateField {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// x velocity.
    pub fn u(&self) -> &Field3d {
        &self.u
    }

    /// y velocity.
    pub fn v(&self) -> &Field3d {
        &self.v
    }

    /// z velocity.
    pub fn w(&self) -> &Field3d {
        &self.w
    }

    /// Pressure.
    pub fn p(&self) -> &Field3d {
        &self.p
    }

    /// x velocity, mutable.
    pub fn u_mut(&mut self) -> &mut Field3d {
        &mut self.u
    }

    /// y velocity, mutable.
    pub fn v_mut(&mut self) -> &mut Field3d {
        &mut self.v
    }

    /// z velocity, mutable.
    pub fn w_mut(&mut self) -> &mut Field3d {
        &mut self.w
    }

    /// Pressure, mutable.
    pub fn p_mut(&mut self) -> &mut Field3d {
        &mut self.p
    }

    /// x velocity tendency.
    pub fn ut(&self) -> &Field3d {
        &self.ut
    }

    /// y velocity tendency.
    pub fn vt(&self) -> &Field3d {
        &self.vt
    }

    /// z velocity tendency.
    pub fn wt(&self) -> &Field3d {
        &self.wt
    }

    /// Names of the prognostic scalars, in registration order.
    pub fn scalar_names(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().map(String::as_str)
    }

    /// Names of the diagnostic fields, in registration order.
    pub fn diagnostic_names(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.keys().map(String::as_str)
    }

    /// A prognostic scalar with its tendency.
    pub fn scalar(&self, name: &str) -> Result<&ScalarField, FieldError> {
        self.scalars.get(name).ok_or_else(|| unknown(name))
    }

    /// A prognostic scalar with its tendency, mutable.
    pub fn scalar_mut(&mut self, name: &str) -> Result<&mut ScalarField, FieldError> {
        self.scalars.get_mut(name).ok_or_else(|| unknown(name))
    }

    /// State of a prognostic scalar.
    pub fn sp(&self, name: &str) -> Result<&Field3d, FieldError> {
        self.scalar(name).map(ScalarField::prog)
    }

    /// State of a prognostic scalar, mutable.
    pub fn sp_mut(&mut self, name: &str) -> Result<&mut Field3d, FieldError> {
        self.scalar_mut(name).map(ScalarField::prog_mut)
    }

    /// Tendency of a prognostic scalar.
    pub fn st(&self, name: &str) -> Result<&Field3d, FieldError> {
        self.scalar(name).map(ScalarField::tend)
    }

    /// Tendency of a prognostic scalar, mutable.
    pub fn st_mut(&mut self, name: &str) -> Result<&mut Field3d, FieldError> {
        self.scalar_mut(name).map(ScalarField::tend_mut)
    }

    /// A diagnostic field.
    pub fn sd(&self, name: &str) -> Result<&Field3d, FieldError> {
        self.diagnostics.get(name).ok_or_else(|| unknown(name))
    }

    /// A diagnostic field, mutable.
    pub fn sd_mut(&mut self, name: &str) -> Result<&mut Field3d, FieldError> {
        self.diagnostics.get_mut(name).ok_or_else(|| unknown(name))
    }

    /// Reference density at full levels, one value per vertical index.
    pub fn rhoref(&self) -> &[f64] {
        &self.rhoref
    }

    /// Reference density at half levels, one value per vertical index.
    pub fn rhorefh(&self) -> &[f64] {
        &self.rhorefh
    }

    /// Install anelastic reference density profiles.
    ///
    /// Both need `kcells` finite positive values.
    pub fn set_reference_density(
        &mut self,
        rhoref: Vec<f64>,
        rhorefh: Vec<f64>,
    ) -> Result<(), FieldError> {
        check_profile("rhoref", &rhoref, self.shape.kcells)?;
        check_profile("rhorefh", &rhorefh, self.shape.kcells)?;
        self.rhoref = rhoref;
        self.rhorefh = rhorefh;
        Ok(())
    }

    /// Zero the momentum tendencies and every scalar tendency.
    pub fn reset_tendencies(&mut self) {
        self.ut.fill(0.0);
        self.vt.fill(0.0);
        self.wt.fill(0.0);
        for scalar in self.scalars.values_mut() {
            scalar.tend.fill(0.0);
        }
    }

    /// Claim both scratch buffers.
    ///
    /// Contents are whatever the previous user left behind. The borrow
    /// ends when the caller is done, so two components can never hold the
    /// buffers at the same time.
    pub fn scratch(&mut self) -> (&mut Field3d, &mut Field3d) {
        (&mut self.tmp1, &mut self.tmp2)
    }

    /// Split the collection into the borrows an advection pass needs.
    pub fn advection_view(&mut self) -> AdvectionView<'_> {
        AdvectionView {
            u: &self.u,
            v: &self.v,
            w: &self.w,
            ut: &mut self.ut,
            vt: &mut self.vt,
            wt: &mut self.wt,
            scalars: self.scalars.iter_mut(),
            rhoref: &self.rhoref,
            rhorefh: &self.rhorefh,
        }
    }

    /// Add the initial perturbations of `init` to the state.
    ///
    /// Writes active cells only; halos are filled by the boundary
    /// exchange afterwards. `w` keeps its surface value. Random noise is
    /// keyed on the global cell, so the result does not depend on the
    /// decomposition. No collective is involved.
    ///
    /// Fails with [`FieldError::ShapeMismatch`] if the collection was not
    /// built on `grid`.
    pub fn create(&mut self, grid: &Grid, init: &InitialState) -> Result<(), FieldError> {
        if self.shape != grid.shape() {
            return Err(FieldError::ShapeMismatch {
                expected: self.shape,
                actual: grid.shape(),
            });
        }
        init.validate()?;

        let a = grid.active();
        let st = grid.strides();
        let z = grid.z();
        let seed = init.rndseed;
        for k in a.kstart..a.kend {
            let fac = init.falloff(z[k]);
            if fac == 0.0 {
                continue;
            }
            let kg = k - a.kstart;
            let (amp, amps) = (fac * init.rndamp, fac * init.rndamps);
            for j in a.jstart..a.jend {
                let gj = grid.global_j(j) as usize;
                for i in a.istart..a.iend {
                    let gi = grid.global_i(i) as usize;
                    let ijk = st.index(i, j, k);
                    self.u.data_mut()[ijk] += amp * cell_noise(seed, 0, gi, gj, kg);
                    self.v.data_mut()[ijk] += amp * cell_noise(seed, 1, gi, gj, kg);
                    if k > a.kstart {
                        self.w.data_mut()[ijk] += amp * cell_noise(seed, 2, gi, gj, kg);
                    }
                    for (n, scalar) in self.scalars.values_mut().enumerate() {
                        scalar.prog.data_mut()[ijk] +=
                            amps * cell_noise(seed, 3 + n as u64, gi, gj, kg);
                    }
                }
            }
        }

        if init.nvortexpair > 0 {
            self.add_vortices(grid, init);
        }

        tracing::info!(
            rndseed = init.rndseed,
            rndamp = init.rndamp,
            rndamps = init.rndamps,
            rndz = init.rndz,
            nvortexpair = init.nvortexpair,
            "initial perturbations added"
        );
        Ok(())
    }

    fn add_vortices(&mut self, grid: &Grid, init: &InitialState) {
        use std::f64::consts::PI;

        let a = grid.active();
        let st = grid.strides();
        let (z, zh, zsize) = (grid.z(), grid.zh(), grid.zsize());
        let amp = init.vortexamp;
        let pairs = init.nvortexpair as f64;
        for k in a.kstart..a.kend {
            let (cz, sz) = ((PI * z[k] / zsize).cos(), (PI * zh[k] / zsize).sin());
            for j in a.jstart..a.jend {
                for i in a.istart..a.iend {
                    let ijk = st.index(i, j, k);
                    match init.vortexaxis {
                        VortexAxis::X => {
                            let (l, xh, x) = (grid.xsize(), grid.xh(i), grid.x(i));
                            self.u.data_mut()[ijk] += amp * (pairs * 2.0 * PI * xh / l).sin() * cz;
                            self.w.data_mut()[ijk] -= amp * (pairs * 2.0 * PI * x / l).cos() * sz;
                        }
                        VortexAxis::Y => {
                            let (l, yh, y) = (grid.ysize(), grid.yh(j), grid.y(j));
                            self.v.data_mut()[ijk] += amp * (pairs * 2.0 * PI * yh / l).sin() * cz;
                            self.w.data_mut()[ijk] -= amp * (pairs * 2.0 * PI * y / l).cos() * sz;
                        }
                    }
                }
            }
        }
    }

    /// Domain mean of the cell-centred momentum `u + v + w`. Collective.
    pub fn check_momentum(&self, grid: &Grid) -> f64 {
        let (u, v, w) = (self.u.data(), self.v.data(), self.w.data());
        let s = grid.strides();
        let momentum = sum_active(grid, |ijk| {
            interp2(u[ijk], u[ijk + s.ii])
                + interp2(v[ijk], v[ijk + s.jj])
                + interp2(w[ijk], w[ijk + s.kk])
        });
        domain_mean(grid, momentum)
    }

    /// Domain mean of the resolved kinetic energy. Collective.
    pub fn check_tke(&self, grid: &Grid) -> f64 {
        let (u, v, w) = (self.u.data(), self.v.data(), self.w.data());
        let s = grid.strides();
        let tke = sum_active(grid, |ijk| {
            interp2(u[ijk] * u[ijk], u[ijk + s.ii] * u[ijk + s.ii])
                + interp2(v[ijk] * v[ijk], v[ijk + s.jj] * v[ijk + s.jj])
                + interp2(w[ijk] * w[ijk], w[ijk + s.kk] * w[ijk + s.kk])
        });
        domain_mean(grid, 0.5 * tke)
    }

    /// Domain mean of the first prognostic scalar, or 0 without scalars.
    ///
    /// Collective whenever a scalar is registered. All ranks register the
    /// same scalars, so they agree on whether to reduce.
    pub fn check_mass(&self, grid: &Grid) -> f64 {
        let Some(scalar) = self.scalars.values().next() else {
            return 0.0;
        };
        let s = scalar.prog.data();
        domain_mean(grid, sum_active(grid, |ijk| s[ijk]))
    }
}

fn unknown(name: &str) -> FieldError {
    FieldError::UnknownField {
        name: name.to_string(),
    }
}

fn check_profile(name: &'static str, profile: &[f64], kcells: usize) -> Result<(), FieldError> {
    if profile.len() != kcells {
        return Err(FieldError::ProfileLength {
            name,
            expected: kcells,
            actual: profile.len(),
        });
    }
    if let Some((k, &value)) = profile
        .iter()
        .enumerate()
        .find(|(_, v)| !(v.is_finite() && **v > 0.0))
    {
        return Err(FieldError::NonPositiveDensity { name, k, value });
    }
    Ok(())
}

/// Local sum of `f(ijk) * dz[k]` over the active region.
fn sum_active(grid: &Grid, f: impl Fn(usize) -> f64) -> f64 {
    let a = grid.active();
    let s = grid.strides();
    let dz = grid.dz();
    let mut sum = 0.0;
    for k in a.kstart..a.kend {
        for j in a.jstart..a.jend {
            for i in a.istart..a.iend {
                sum += f(s.index(i, j, k)) * dz[k];
            }
        }
    }
    sum
}

fn domain_mean(grid: &Grid, mut local: f64) -> f64 {
    grid.get_sum(&mut local);
    local / (grid.itot() as f64 * grid.jtot() as f64 * grid.zsize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strato_core::SerialComm;
    use strato_grid::GridConfig;

    fn grid() -> Grid {
        Grid::new(GridConfig::new(4, 4, 4, 4.0, 4.0, 8.0), Box::new(SerialComm)).unwrap()
    }

    fn collection(grid: &Grid) -> FieldCollection {
        FieldCollection::new(grid, GhostCells::uniform(1)).unwrap()
    }

    #[test]
    fn fields_match_grid_layout() {
        let grid = grid();
        let fields = collection(&grid);
        assert_eq!(fields.u().data().len(), grid.ncells());
        assert_eq!(fields.wt().shape(), grid.shape());
        assert_eq!(fields.rhoref(), vec![1.0; grid.kcells()].as_slice());
        assert_eq!(fields.rhorefh().len(), grid.kcells());
    }

    #[test]
    fn narrow_halo_rejected() {
        let grid = grid();
        match FieldCollection::new(&grid, GhostCells::uniform(2)) {
            Err(FieldError::InsufficientGhostCells { required, available }) => {
                assert_eq!(required, GhostCells::uniform(2));
                assert_eq!(available, GhostCells::uniform(1));
            }
            other => panic!("expected InsufficientGhostCells, got {other:?}"),
        }
    }

    #[test]
    fn scalars_register_with_tendencies_in_order() {
        let grid = grid();
        let mut fields = collection(&grid);
        fields.init_prognostic_field("th", "potential temperature", "K").unwrap();
        fields.init_prognostic_field("qt", "total water", "kg kg-1").unwrap();
        fields.init_diagnostic_field("ql", "liquid water", "kg kg-1").unwrap();

        assert_eq!(fields.scalar_names().collect::<Vec<_>>(), vec!["th", "qt"]);
        assert_eq!(fields.diagnostic_names().collect::<Vec<_>>(), vec!["ql"]);
        assert_eq!(fields.st("qt").unwrap().name(), "qtt");
        assert_eq!(fields.st("th").unwrap().unit(), "K s-1");
        assert!(fields.sd("ql").is_ok());
        assert!(matches!(
            fields.sp("ql"),
            Err(FieldError::UnknownField { .. })
        ));
    }

    #[test]
    fn duplicate_names_rejected() {
        let grid = grid();
        let mut fields = collection(&grid);
        fields.init_prognostic_field("th", "", "K").unwrap();
        for name in ["th", "u", "p"] {
            assert!(matches!(
                fields.init_diagnostic_field(name, "", ""),
                Err(FieldError::DuplicateField { .. })
            ));
        }
        fields.init_diagnostic_field("ql", "", "").unwrap();
        assert!(matches!(
            fields.init_prognostic_field("ql", "", ""),
            Err(FieldError::DuplicateField { .. })
        ));
    }

    #[test]
    fn reference_density_validated() {
        let grid = grid();
        let mut fields = collection(&grid);
        let n = grid.kcells();
        assert!(matches!(
            fields.set_reference_density(vec![1.0; n - 1], vec![1.0; n]),
            Err(FieldError::ProfileLength { name: "rhoref", .. })
        ));
        let mut bad = vec![1.0; n];
        bad[3] = 0.0;
        assert!(matches!(
            fields.set_reference_density(vec![1.0; n], bad),
            Err(FieldError::NonPositiveDensity { name: "rhorefh", k: 3, .. })
        ));
        fields
            .set_reference_density(vec![1.2; n], vec![1.1; n])
            .unwrap();
        assert_eq!(fields.rhoref()[0], 1.2);
        assert_eq!(fields.rhorefh()[0], 1.1);
    }

    #[test]
    fn reset_zeroes_all_tendencies() {
        let grid = grid();
        let mut fields = collection(&grid);
        fields.init_prognostic_field("th", "", "K").unwrap();
        {
            let view = fields.advection_view();
            view.ut.fill(1.0);
            view.wt.fill(1.0);
        }
        fields.st_mut("th").unwrap().fill(2.0);
        fields.sp_mut("th").unwrap().fill(3.0);

        fields.reset_tendencies();
        assert!(fields.ut().data().iter().all(|&v| v == 0.0));
        assert!(fields.wt().data().iter().all(|&v| v == 0.0));
        assert!(fields.st("th").unwrap().data().iter().all(|&v| v == 0.0));
        assert!(fields.sp("th").unwrap().data().iter().all(|&v| v == 3.0));
    }

    #[test]
    fn scratch_buffers_are_distinct() {
        let grid = grid();
        let mut fields = collection(&grid);
        let (a, b) = fields.scratch();
        a.fill(1.0);
        b.fill(2.0);
        assert_eq!(a.name(), "tmp1");
        assert_eq!(b.name(), "tmp2");
        assert_eq!(a.at(1, 1, 1), 1.0);
    }

    #[test]
    fn uniform_flow_diagnostics() {
        let grid = grid();
        let mut fields = collection(&grid);
        fields.u_mut().fill(2.0);
        fields.v_mut().fill(-1.0);
        fields.init_prognostic_field("th", "", "K").unwrap();
        fields.sp_mut("th").unwrap().fill(300.0);

        assert!((fields.check_momentum(&grid) - 1.0).abs() < 1e-12);
        assert!((fields.check_tke(&grid) - 2.5).abs() < 1e-12);
        assert!((fields.check_mass(&grid) - 300.0).abs() < 1e-9);
    }

    fn perturbed(grid: &Grid, init: &InitialState) -> FieldCollection {
        let mut fields = collection(grid);
        fields.init_prognostic_field("th", "", "K").unwrap();
        fields.init_prognostic_field("qt", "", "kg kg-1").unwrap();
        fields.create(grid, init).unwrap();
        fields
    }

    fn noise_state() -> InitialState {
        InitialState {
            rndseed: 5,
            rndamp: 0.2,
            rndamps: 0.05,
            rndz: 4.0,
            rndbeta: 1.0,
            ..InitialState::default()
        }
    }

    #[test]
    fn noise_is_bounded_and_confined_below_rndz() {
        let grid = Grid::new(GridConfig::new(4, 4, 8, 4.0, 4.0, 8.0), Box::new(SerialComm)).unwrap();
        let init = noise_state();
        let fields = perturbed(&grid, &init);

        let a = grid.active();
        let z = grid.z();
        for k in 0..grid.kcells() {
            for j in 0..grid.jcells() {
                for i in 0..grid.icells() {
                    let values = [
                        (fields.u().at(i, j, k), init.rndamp),
                        (fields.v().at(i, j, k), init.rndamp),
                        (fields.w().at(i, j, k), init.rndamp),
                        (fields.sp("th").unwrap().at(i, j, k), init.rndamps),
                        (fields.sp("qt").unwrap().at(i, j, k), init.rndamps),
                    ];
                    let active = a.contains(i, j, k);
                    for (value, amp) in values {
                        if !active || z[k] >= init.rndz {
                            assert_eq!(value, 0.0, "({i}, {j}, {k})");
                        } else {
                            assert!(value.abs() <= amp * init.falloff(z[k]), "({i}, {j}, {k})");
                        }
                    }
                }
            }
        }
        for j in a.jstart..a.jend {
            for i in a.istart..a.iend {
                assert_eq!(fields.w().at(i, j, a.kstart), 0.0);
            }
        }
        assert!(fields.u().data().iter().any(|&v| v != 0.0));
        assert_ne!(fields.sp("th").unwrap(), fields.sp("qt").unwrap());
    }

    #[test]
    fn create_adds_to_the_existing_state() {
        let grid = grid();
        let init = noise_state();
        let base = perturbed(&grid, &init);

        let mut fields = collection(&grid);
        fields.init_prognostic_field("th", "", "K").unwrap();
        fields.init_prognostic_field("qt", "", "kg kg-1").unwrap();
        fields.sp_mut("th").unwrap().fill(300.0);
        fields.create(&grid, &init).unwrap();

        let (i, j, k) = (1, 1, 1);
        let th = fields.sp("th").unwrap().at(i, j, k);
        assert_eq!(th, 300.0 + base.sp("th").unwrap().at(i, j, k));
    }

    #[test]
    fn vortex_pair_follows_the_chosen_axis() {
        use std::f64::consts::PI;

        let grid = Grid::new(GridConfig::new(8, 8, 4, 8.0, 8.0, 4.0), Box::new(SerialComm)).unwrap();
        let init = InitialState {
            vortexamp: 0.5,
            nvortexpair: 1,
            vortexaxis: VortexAxis::X,
            ..InitialState::default()
        };
        let mut fields = collection(&grid);
        fields.create(&grid, &init).unwrap();

        assert!(fields.v().data().iter().all(|&v| v == 0.0));
        let (i, j, k) = (3, 2, 2);
        let u = 0.5 * (2.0 * PI * grid.xh(i) / 8.0).sin() * (PI * grid.z()[k] / 4.0).cos();
        let w = -0.5 * (2.0 * PI * grid.x(i) / 8.0).cos() * (PI * grid.zh()[k] / 4.0).sin();
        assert!((fields.u().at(i, j, k) - u).abs() < 1e-15);
        assert!((fields.w().at(i, j, k) - w).abs() < 1e-15);
        assert!(fields.u().at(i, j, k) != 0.0);

        let a = grid.active();
        for i in a.istart..a.iend {
            assert_eq!(fields.w().at(i, 2, a.kstart), 0.0);
        }

        let mut fields = collection(&grid);
        let init = InitialState {
            vortexaxis: VortexAxis::Y,
            ..init
        };
        fields.create(&grid, &init).unwrap();
        assert!(fields.u().data().iter().all(|&v| v == 0.0));
        assert!(fields.v().data().iter().any(|&v| v != 0.0));
    }

    #[test]
    fn create_rejects_another_grid() {
        let mut fields = collection(&grid());
        let other = Grid::new(GridConfig::new(6, 4, 4, 6.0, 4.0, 8.0), Box::new(SerialComm)).unwrap();
        assert!(matches!(
            fields.create(&other, &InitialState::default()),
            Err(FieldError::ShapeMismatch { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn velocity_noise_never_exceeds_rndamp(seed in any::<u64>(), amp in 0.0f64..5.0) {
            let grid = grid();
            let init = InitialState {
                rndseed: seed,
                rndamp: amp,
                rndz: 8.0,
                rndbeta: 0.5,
                ..InitialState::default()
            };
            let mut fields = collection(&grid);
            fields.create(&grid, &init).unwrap();
            for f in [fields.u(), fields.v(), fields.w()] {
                prop_assert!(f.data().iter().all(|v| v.abs() <= amp));
            }
        }
    }

    #[test]
    fn mass_without_scalars_is_zero() {
        let grid = grid();
        let fields = collection(&grid);
        assert_eq!(fields.check_mass(&grid), 0.0);
    }
}
