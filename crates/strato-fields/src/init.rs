//! Initial perturbations for a cold start.
//!
//! [`FieldCollection::create`](crate::FieldCollection::create) adds two
//! kinds of perturbation to the state:
//!
//! - Seeded random noise below `rndz`, with amplitude `rndamp` for the
//!   velocities and `rndamps` for the scalars. The amplitude falls off
//!   with height as `((rndz - z) / rndz)^rndbeta`.
//! - `nvortexpair` pairs of counter-rotating vortices of strength
//!   `vortexamp`, rotating around the x axis (`vortexaxis = 0`) or the y
//!   axis (`vortexaxis = 1`).
//!
//! The noise for a cell depends on the seed, the variable and the global
//! cell index only, so every decomposition starts from the same state.

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strato_config::Input;

use crate::error::FieldError;

const BLOCK: &str = "fields";

/// Axis the initial vortices rotate around.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VortexAxis {
    /// Vortices in the x-z plane, perturbing `u` and `w`.
    X,
    /// Vortices in the y-z plane, perturbing `v` and `w`.
    Y,
}

/// Parameters of the initial perturbations, from the `[fields]` block.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialState {
    /// Seed of the random perturbations.
    pub rndseed: u64,
    /// Amplitude of the velocity noise.
    pub rndamp: f64,
    /// Amplitude of the scalar noise.
    pub rndamps: f64,
    /// Height below which noise is added.
    pub rndz: f64,
    /// Exponent of the height fall-off.
    pub rndbeta: f64,
    /// Vortex velocity amplitude.
    pub vortexamp: f64,
    /// Number of vortex pairs across the domain.
    pub nvortexpair: usize,
    /// Rotation axis of the vortices.
    pub vortexaxis: VortexAxis,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            rndseed: 0,
            rndamp: 0.0,
            rndamps: 0.0,
            rndz: 0.0,
            rndbeta: 2.0,
            vortexamp: 1e-3,
            nvortexpair: 0,
            vortexaxis: VortexAxis::Y,
        }
    }
}

impl InitialState {
    /// Read the perturbation parameters. Every item is optional.
    pub fn from_input(input: &Input) -> Result<Self, FieldError> {
        let d = Self::default();
        let vortexaxis = match input.get_item_or::<u64>(BLOCK, "vortexaxis", "", 1)? {
            0 => VortexAxis::X,
            1 => VortexAxis::Y,
            other => {
                return Err(FieldError::InvalidInitialState {
                    item: "vortexaxis",
                    reason: format!("{other} is not 0 (x) or 1 (y)"),
                })
            }
        };
        let state = Self {
            rndseed: input.get_item_or(BLOCK, "rndseed", "", d.rndseed)?,
            rndamp: input.get_item_or(BLOCK, "rndamp", "", d.rndamp)?,
            rndamps: input.get_item_or(BLOCK, "rndamps", "", d.rndamps)?,
            rndz: input.get_item_or(BLOCK, "rndz", "", d.rndz)?,
            rndbeta: input.get_item_or(BLOCK, "rndbeta", "", d.rndbeta)?,
            vortexamp: input.get_item_or(BLOCK, "vortexamp", "", d.vortexamp)?,
            nvortexpair: input.get_item_or(BLOCK, "nvortexpair", "", d.nvortexpair)?,
            vortexaxis,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check that amplitudes are finite and `rndz` is not negative.
    pub fn validate(&self) -> Result<(), FieldError> {
        for (item, value) in [
            ("rndamp", self.rndamp),
            ("rndamps", self.rndamps),
            ("rndbeta", self.rndbeta),
            ("vortexamp", self.vortexamp),
        ] {
            if !value.is_finite() {
                return Err(FieldError::InvalidInitialState {
                    item,
                    reason: format!("{value} is not finite"),
                });
            }
        }
        if !(self.rndz.is_finite() && self.rndz >= 0.0) {
            return Err(FieldError::InvalidInitialState {
                item: "rndz",
                reason: format!("{} is not a height", self.rndz),
            });
        }
        Ok(())
    }

    /// Height fall-off of the noise amplitude at `z`; zero at and above `rndz`.
    pub fn falloff(&self, z: f64) -> f64 {
        if z < self.rndz {
            ((self.rndz - z) / self.rndz).powf(self.rndbeta)
        } else {
            0.0
        }
    }
}

/// Deterministic noise in `[-1, 1)` for one variable in one global cell.
///
/// `variable` selects an independent ChaCha key, the cell selects the
/// stream, so no two (variable, cell) pairs share random numbers.
pub fn cell_noise(seed: u64, variable: u64, gi: usize, gj: usize, k: usize) -> f64 {
    let mut key = [0u8; 32];
    key[..8].copy_from_slice(&seed.to_le_bytes());
    key[8..16].copy_from_slice(&variable.to_le_bytes());
    let mut rng = ChaCha8Rng::from_seed(key);
    rng.set_stream(((k as u64) << 40) | ((gj as u64) << 20) | gi as u64);
    let bits = rng.next_u64() >> 11;
    2.0 * (bits as f64 / (1u64 << 53) as f64) - 1.0
}
