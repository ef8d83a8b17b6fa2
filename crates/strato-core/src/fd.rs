//! Second-order finite-difference helpers.
//!
//! On the staggered grid two neighbouring values are collocated at their
//! midpoint before they are multiplied together. This is the only
//! interpolation rule of the second-order schemes.

/// Linear interpolation to the midpoint of two staggered values.
#[inline(always)]
pub fn interp2(a: f64, b: f64) -> f64 {
    0.5 * (a + b)
}
