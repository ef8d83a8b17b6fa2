//! Linear index arithmetic over ghost-padded 3D arrays.
//!
//! Every field is stored as one contiguous slice addressed by
//! `i + j*icells + k*icells*jcells`. Stencils work directly on that
//! linear offset and step to neighbours with the constant strides
//! `ii`, `jj` and `kk`, so the arithmetic is derived once per grid and
//! never recomputed in the inner loop.

/// Dimensions of a ghost-padded array, halo included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    /// Cells along x, ghost cells included.
    pub icells: usize,
    /// Cells along y, ghost cells included.
    pub jcells: usize,
    /// Cells along z, ghost cells included.
    pub kcells: usize,
}

impl Shape {
    /// Create a shape from padded cell counts.
    pub fn new(icells: usize, jcells: usize, kcells: usize) -> Self {
        Self {
            icells,
            jcells,
            kcells,
        }
    }

    /// Total number of cells, `icells * jcells * kcells`.
    pub fn len(&self) -> usize {
        self.icells * self.jcells * self.kcells
    }

    /// Whether the shape holds zero cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strides for stepping through an array of this shape.
    pub fn strides(&self) -> Strides {
        Strides::new(self.icells, self.jcells)
    }

    /// Linear offset of `(i, j, k)`, or `None` outside the array.
    pub fn checked_index(&self, i: usize, j: usize, k: usize) -> Option<usize> {
        if i < self.icells && j < self.jcells && k < self.kcells {
            Some(self.strides().index(i, j, k))
        } else {
            None
        }
    }
}

/// Strides between neighbouring cells along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Strides {
    /// Step to the next cell in x. Always 1.
    pub ii: usize,
    /// Step to the next cell in y (`icells`).
    pub jj: usize,
    /// Step to the next cell in z (`icells * jcells`).
    pub kk: usize,
}

impl Strides {
    /// Strides for an array with `icells` columns and `jcells` rows per level.
    pub fn new(icells: usize, jcells: usize) -> Self {
        Self {
            ii: 1,
            jj: icells,
            kk: icells * jcells,
        }
    }

    /// Linear offset of `(i, j, k)`. No range check.
    #[inline(always)]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        i * self.ii + j * self.jj + k * self.kk
    }
}

/// The physically active part of a subdomain, as half-open index ranges.
///
/// Everything outside `[istart, iend) × [jstart, jend) × [kstart, kend)`
/// is halo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActiveRegion {
    /// First active index in x.
    pub istart: usize,
    /// One past the last active index in x.
    pub iend: usize,
    /// First active index in y.
    pub jstart: usize,
    /// One past the last active index in y.
    pub jend: usize,
    /// First active index in z.
    pub kstart: usize,
    /// One past the last active index in z.
    pub kend: usize,
}

impl ActiveRegion {
    /// Number of active cells.
    pub fn len(&self) -> usize {
        (self.iend - self.istart) * (self.jend - self.jstart) * (self.kend - self.kstart)
    }

    /// Whether the region holds zero cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `(i, j, k)` lies inside the active region.
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        (self.istart..self.iend).contains(&i)
            && (self.jstart..self.jend).contains(&j)
            && (self.kstart..self.kend).contains(&k)
    }
}
