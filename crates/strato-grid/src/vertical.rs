//! Vertical level geometry on a stretched staggered column.
//!
//! Scalars, `u` and `v` live at full levels `z`; `w` lives at half levels
//! `zh`, taken exactly halfway between neighbouring full levels. The
//! bottom half level is the surface (`zh = 0`) and the top one is the
//! domain top (`zh = zsize`). Ghost levels mirror the active column
//! across both boundaries.

use crate::error::GridError;

/// Heights and spacings for every vertical index, ghost levels included.
///
/// All arrays have length `kcells = ktot + 2*kgc`.
#[derive(Clone, Debug, PartialEq)]
pub struct VerticalLevels {
    /// Full-level heights.
    pub z: Vec<f64>,
    /// Half-level heights; `zh[k]` is the bottom face of cell `k`.
    pub zh: Vec<f64>,
    /// Full-level spacing, `zh[k+1] - zh[k]`.
    pub dz: Vec<f64>,
    /// Half-level spacing, `z[k] - z[k-1]`.
    pub dzh: Vec<f64>,
    /// Inverse of `dz`.
    pub dzi: Vec<f64>,
    /// Inverse of `dzh`.
    pub dzhi: Vec<f64>,
}

/// Uniform full levels at cell centres: `(k + 0.5) * zsize / ktot`.
pub fn uniform_levels(ktot: usize, zsize: f64) -> Vec<f64> {
    let dz = zsize / ktot as f64;
    (0..ktot).map(|k| (k as f64 + 0.5) * dz).collect()
}

/// Check that `z` holds `ktot` strictly increasing heights inside `(0, zsize)`.
pub(crate) fn validate_levels(z: &[f64], ktot: usize, zsize: f64) -> Result<(), GridError> {
    if z.len() != ktot {
        return Err(GridError::InvalidLevels {
            reason: format!("{} heights given for ktot = {ktot}", z.len()),
        });
    }
    if z.iter().any(|v| !v.is_finite()) {
        return Err(GridError::InvalidLevels {
            reason: "heights must be finite".to_string(),
        });
    }
    if z[0] <= 0.0 || z[ktot - 1] >= zsize {
        return Err(GridError::InvalidLevels {
            reason: format!(
                "heights must lie inside (0, {zsize}), got {} .. {}",
                z[0],
                z[ktot - 1]
            ),
        });
    }
    if let Some(w) = z.windows(2).position(|w| w[1] <= w[0]) {
        return Err(GridError::InvalidLevels {
            reason: format!("heights not strictly increasing at level {}", w + 1),
        });
    }
    Ok(())
}

impl VerticalLevels {
    /// Build the full staggered column from active full-level heights.
    ///
    /// `z_active` must already satisfy the level invariants; see
    /// [`GridConfig::validate`](crate::GridConfig::validate).
    pub fn new(z_active: &[f64], kgc: usize, zsize: f64) -> Self {
        let ktot = z_active.len();
        let kcells = ktot + 2 * kgc;
        let kstart = kgc;
        let kend = ktot + kgc;

        let mut z = vec![0.0; kcells];
        z[kstart..kend].copy_from_slice(z_active);
        for k in 0..kgc {
            z[kstart - k - 1] = -z[kstart + k];
            z[kend + k] = 2.0 * zsize - z[kend - k - 1];
        }

        // Faces halfway between centres; this puts zh[kstart] at 0 and zh[kend] at zsize.
        let mut zh = vec![0.0; kcells];
        for k in 1..kcells {
            zh[k] = 0.5 * (z[k - 1] + z[k]);
        }
        for k in 1..=kgc {
            zh[kstart - k] = -zh[kstart + k];
        }

        let mut dzh = vec![0.0; kcells];
        for k in 1..kcells {
            dzh[k] = z[k] - z[k - 1];
        }
        for k in 1..=kgc {
            dzh[kstart - k] = dzh[kstart + k];
        }

        let mut dz = vec![0.0; kcells];
        for k in 0..kcells - 1 {
            dz[k] = zh[k + 1] - zh[k];
        }
        for k in 0..kgc {
            dz[kend + k] = dz[kend - k - 1];
        }

        let dzi = dz.iter().map(|d| 1.0 / d).collect();
        let dzhi = dzh.iter().map(|d| 1.0 / d).collect();

        Self {
            z,
            zh,
            dz,
            dzh,
            dzi,
            dzhi,
        }
    }
}
