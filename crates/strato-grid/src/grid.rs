//! One rank's view of the decomposed domain.

use std::fmt;

use strato_core::{ActiveRegion, Communicator, Shape, Strides};

use crate::config::{GhostCells, GridConfig};
use crate::error::GridError;
use crate::vertical::{uniform_levels, VerticalLevels};

/// Index bounds, spacings and collectives for one rank's subdomain.
///
/// The horizontal domain of `itot × jtot` cells is split into `npx × npy`
/// equal tiles; rank `r` owns tile `(r % npx, r / npx)`. The vertical is
/// never split. Every array built on this grid has [`ncells`](Self::ncells)
/// entries laid out as described in [`strato_core::index`].
///
/// # Collectives
///
/// [`get_max`](Self::get_max) and [`get_sum`](Self::get_sum) block until
/// every rank has made the same call. Never call them under a condition
/// that can differ between ranks.
pub struct Grid {
    itot: usize,
    jtot: usize,
    ktot: usize,
    imax: usize,
    jmax: usize,
    xsize: f64,
    ysize: f64,
    zsize: f64,
    dx: f64,
    dy: f64,
    ghost: GhostCells,
    shape: Shape,
    active: ActiveRegion,
    levels: VerticalLevels,
    npx: usize,
    npy: usize,
    mpicoordx: usize,
    mpicoordy: usize,
    spatial_order: String,
    comm: Box<dyn Communicator>,
}

impl Grid {
    /// Build this rank's grid.
    ///
    /// The decomposition in `config` must use exactly `comm.nprocs()` ranks.
    ///
    /// # Examples
    ///
    /// ```
    /// use strato_core::SerialComm;
    /// use strato_grid::{Grid, GridConfig};
    ///
    /// let grid = Grid::new(GridConfig::new(8, 8, 4, 80.0, 80.0, 40.0), Box::new(SerialComm)).unwrap();
    /// assert_eq!(grid.icells(), 10);
    /// assert_eq!(grid.dx(), 10.0);
    /// assert_eq!(grid.active().kstart, 1);
    /// ```
    pub fn new(config: GridConfig, comm: Box<dyn Communicator>) -> Result<Self, GridError> {
        let nprocs = comm.nprocs();
        config.validate(nprocs)?;

        let GridConfig {
            itot,
            jtot,
            ktot,
            xsize,
            ysize,
            zsize,
            z,
            npx,
            npy,
            ghost_cells: ghost,
            spatial_order,
        } = config;

        let imax = itot / npx;
        let jmax = jtot / npy;
        let shape = Shape::new(
            imax + 2 * ghost.igc,
            jmax + 2 * ghost.jgc,
            ktot + 2 * ghost.kgc,
        );
        let active = ActiveRegion {
            istart: ghost.igc,
            iend: imax + ghost.igc,
            jstart: ghost.jgc,
            jend: jmax + ghost.jgc,
            kstart: ghost.kgc,
            kend: ktot + ghost.kgc,
        };
        let z = z.unwrap_or_else(|| uniform_levels(ktot, zsize));
        let levels = VerticalLevels::new(&z, ghost.kgc, zsize);

        let rank = comm.rank();
        let mpicoordx = rank % npx;
        let mpicoordy = rank / npx;

        tracing::info!(
            rank,
            nprocs,
            itot,
            jtot,
            ktot,
            imax,
            jmax,
            mpicoordx,
            mpicoordy,
            "grid initialised"
        );

        Ok(Self {
            itot,
            jtot,
            ktot,
            imax,
            jmax,
            xsize,
            ysize,
            zsize,
            dx: xsize / itot as f64,
            dy: ysize / jtot as f64,
            ghost,
            shape,
            active,
            levels,
            npx,
            npy,
            mpicoordx,
            mpicoordy,
            spatial_order,
            comm,
        })
    }

    /// Padded array dimensions.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Strides for the padded layout.
    pub fn strides(&self) -> Strides {
        self.shape.strides()
    }

    /// Active index bounds.
    pub fn active(&self) -> ActiveRegion {
        self.active
    }

    /// Halo widths.
    pub fn ghost(&self) -> GhostCells {
        self.ghost
    }

    /// Global cell count in x.
    pub fn itot(&self) -> usize {
        self.itot
    }

    /// Global cell count in y.
    pub fn jtot(&self) -> usize {
        self.jtot
    }

    /// Cell count in z.
    pub fn ktot(&self) -> usize {
        self.ktot
    }

    /// Local active cell count in x.
    pub fn imax(&self) -> usize {
        self.imax
    }

    /// Local active cell count in y.
    pub fn jmax(&self) -> usize {
        self.jmax
    }

    /// Active cell count in z; equal to `ktot`.
    pub fn kmax(&self) -> usize {
        self.ktot
    }

    /// Padded cell count in x.
    pub fn icells(&self) -> usize {
        self.shape.icells
    }

    /// Padded cell count in y.
    pub fn jcells(&self) -> usize {
        self.shape.jcells
    }

    /// Padded cell count in z.
    pub fn kcells(&self) -> usize {
        self.shape.kcells
    }

    /// Cells per padded horizontal slab.
    pub fn ijcells(&self) -> usize {
        self.shape.icells * self.shape.jcells
    }

    /// Cells in a padded 3D array.
    pub fn ncells(&self) -> usize {
        self.shape.len()
    }

    /// Domain length in x.
    pub fn xsize(&self) -> f64 {
        self.xsize
    }

    /// Domain length in y.
    pub fn ysize(&self) -> f64 {
        self.ysize
    }

    /// Domain height.
    pub fn zsize(&self) -> f64 {
        self.zsize
    }

    /// Uniform spacing in x.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Uniform spacing in y.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Inverse spacing in x.
    pub fn dxi(&self) -> f64 {
        1.0 / self.dx
    }

    /// Inverse spacing in y.
    pub fn dyi(&self) -> f64 {
        1.0 / self.dy
    }

    /// Full-level heights, one per vertical index.
    pub fn z(&self) -> &[f64] {
        &self.levels.z
    }

    /// Half-level heights, one per vertical index.
    pub fn zh(&self) -> &[f64] {
        &self.levels.zh
    }

    /// Full-level spacing.
    pub fn dz(&self) -> &[f64] {
        &self.levels.dz
    }

    /// Half-level spacing.
    pub fn dzh(&self) -> &[f64] {
        &self.levels.dzh
    }

    /// Inverse full-level spacing.
    pub fn dzi(&self) -> &[f64] {
        &self.levels.dzi
    }

    /// Inverse half-level spacing.
    pub fn dzhi(&self) -> &[f64] {
        &self.levels.dzhi
    }

    /// All vertical level data.
    pub fn levels(&self) -> &VerticalLevels {
        &self.levels
    }

    /// Ranks along x and y.
    pub fn decomposition(&self) -> (usize, usize) {
        (self.npx, self.npy)
    }

    /// This rank's tile coordinates `(mpicoordx, mpicoordy)`.
    pub fn mpicoord(&self) -> (usize, usize) {
        (self.mpicoordx, self.mpicoordy)
    }

    /// This rank.
    pub fn rank(&self) -> usize {
        self.comm.rank()
    }

    /// Number of ranks.
    pub fn nprocs(&self) -> usize {
        self.comm.nprocs()
    }

    /// Default spatial order for scheme selection.
    pub fn spatial_order(&self) -> &str {
        &self.spatial_order
    }

    /// Replace `value` with its maximum over all ranks. Collective.
    pub fn get_max(&self, value: &mut f64) {
        *value = self.comm.max(*value);
    }

    /// Replace `value` with its sum over all ranks. Collective.
    ///
    /// Contributions are combined in rank order, so every rank receives
    /// the same bits.
    pub fn get_sum(&self, value: &mut f64) {
        *value = self.comm.sum(*value);
    }

    /// Global x index of local index `i`. Ghost cells map outside `0..itot`.
    pub fn global_i(&self, i: usize) -> isize {
        (self.mpicoordx * self.imax + i) as isize - self.ghost.igc as isize
    }

    /// Global y index of local index `j`. Ghost cells map outside `0..jtot`.
    pub fn global_j(&self, j: usize) -> isize {
        (self.mpicoordy * self.jmax + j) as isize - self.ghost.jgc as isize
    }

    /// x coordinate of the centre of local column `i`.
    pub fn x(&self, i: usize) -> f64 {
        (self.global_i(i) as f64 + 0.5) * self.dx
    }

    /// x coordinate of the west face of local column `i`, where `u` lives.
    pub fn xh(&self, i: usize) -> f64 {
        self.global_i(i) as f64 * self.dx
    }

    /// y coordinate of the centre of local row `j`.
    pub fn y(&self, j: usize) -> f64 {
        (self.global_j(j) as f64 + 0.5) * self.dy
    }

    /// y coordinate of the south face of local row `j`, where `v` lives.
    pub fn yh(&self, j: usize) -> f64 {
        self.global_j(j) as f64 * self.dy
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("itot", &self.itot)
            .field("jtot", &self.jtot)
            .field("ktot", &self.ktot)
            .field("imax", &self.imax)
            .field("jmax", &self.jmax)
            .field("ghost", &self.ghost)
            .field("mpicoord", &(self.mpicoordx, self.mpicoordy))
            .field("rank", &self.comm.rank())
            .field("nprocs", &self.comm.nprocs())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use strato_core::{SerialComm, ThreadComm};

    fn serial(config: GridConfig) -> Grid {
        Grid::new(config, Box::new(SerialComm)).unwrap()
    }

    #[test]
    fn serial_bounds_and_spacing() {
        let grid = serial(GridConfig::new(8, 6, 4, 16.0, 3.0, 2.0));
        assert_eq!((grid.imax(), grid.jmax(), grid.kmax()), (8, 6, 4));
        assert_eq!((grid.icells(), grid.jcells(), grid.kcells()), (10, 8, 6));
        assert_eq!(grid.ijcells(), 80);
        assert_eq!(grid.ncells(), 480);
        assert_eq!(grid.dx(), 2.0);
        assert_eq!(grid.dy(), 0.5);
        assert_eq!(grid.dyi(), 2.0);
        assert_eq!(grid.dzi().len(), grid.kcells());
        assert_eq!(grid.dzhi().len(), grid.kcells());

        let a = grid.active();
        assert_eq!((a.istart, a.iend), (1, 9));
        assert_eq!((a.jstart, a.jend), (1, 7));
        assert_eq!((a.kstart, a.kend), (1, 5));
        assert_eq!(grid.strides().kk, grid.ijcells());
    }

    #[test]
    fn wide_halo_shifts_active_region() {
        let grid = serial(
            GridConfig::new(4, 4, 4, 4.0, 4.0, 4.0).with_ghost_cells(GhostCells::uniform(2)),
        );
        assert_eq!(grid.icells(), 8);
        assert_eq!(grid.active().istart, 2);
        assert_eq!(grid.active().kend, 6);
        assert_eq!(grid.global_i(2), 0);
        assert_eq!(grid.global_i(0), -2);
    }

    #[test]
    fn serial_collectives_are_identity() {
        let grid = serial(GridConfig::new(4, 4, 4, 4.0, 4.0, 4.0));
        let mut v = 3.0;
        grid.get_max(&mut v);
        assert_eq!(v, 3.0);
        grid.get_sum(&mut v);
        assert_eq!(v, 3.0);
    }

    #[test]
    fn explicit_levels_are_used() {
        let grid = serial(
            GridConfig::new(4, 4, 4, 4.0, 4.0, 100.0).with_levels(vec![5.0, 20.0, 45.0, 80.0]),
        );
        assert_eq!(&grid.z()[1..5], &[5.0, 20.0, 45.0, 80.0]);
        assert_eq!(grid.zh()[1], 0.0);
    }

    #[test]
    fn decomposition_must_match_rank_count() {
        let err = Grid::new(
            GridConfig::new(8, 8, 4, 8.0, 8.0, 4.0).with_decomposition(2, 1),
            Box::new(SerialComm),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::Decomposition { .. }));
    }

    #[test]
    fn ranks_own_disjoint_tiles() {
        let comms = ThreadComm::create(4).unwrap();
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| {
                thread::spawn(move || {
                    let grid = Grid::new(
                        GridConfig::new(8, 4, 2, 8.0, 4.0, 2.0).with_decomposition(2, 2),
                        Box::new(comm),
                    )
                    .unwrap();
                    let a = grid.active();
                    let first = (grid.global_i(a.istart), grid.global_j(a.jstart));
                    let mut total = grid.imax() as f64 * grid.jmax() as f64;
                    grid.get_sum(&mut total);
                    let mut far = grid.global_i(a.iend - 1) as f64;
                    grid.get_max(&mut far);
                    (grid.rank(), grid.mpicoord(), first, total, far)
                })
            })
            .collect();

        for h in handles {
            let (rank, coord, first, total, far) = h.join().unwrap();
            assert_eq!(coord, (rank % 2, rank / 2));
            assert_eq!(first, (4 * coord.0 as isize, 2 * coord.1 as isize));
            assert_eq!(total, 32.0);
            assert_eq!(far, 7.0);
        }
    }

    #[test]
    fn coordinates_follow_global_index() {
        let grid = serial(GridConfig::new(4, 4, 4, 8.0, 4.0, 4.0));
        assert_eq!(grid.x(1), 1.0);
        assert_eq!(grid.xh(1), 0.0);
        assert_eq!(grid.y(2), 1.5);
        assert_eq!(grid.yh(0), -1.0);
    }
}
