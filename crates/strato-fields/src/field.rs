//! A single ghost-padded 3D field.

use strato_core::Shape;

use crate::error::FieldError;

/// A contiguous `icells × jcells × kcells` array of `f64`, halo included.
///
/// The data slice is addressed with the linear offset of
/// [`strato_core::Strides`]. Kernels work on [`data`](Self::data) directly;
/// [`at`](Self::at) and [`set`](Self::set) are for setup and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct Field3d {
    name: String,
    longname: String,
    unit: String,
    shape: Shape,
    data: Vec<f64>,
}

impl Field3d {
    /// A zero-filled field.
    pub fn new(shape: Shape, name: &str, longname: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            longname: longname.to_string(),
            unit: unit.to_string(),
            shape,
            data: vec![0.0; shape.len()],
        }
    }

    /// Short name, e.g. `"th"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptive name.
    pub fn longname(&self) -> &str {
        &self.longname
    }

    /// Physical unit.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Padded dimensions.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Raw values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Raw values, mutable.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Value at `(i, j, k)`.
    ///
    /// # Panics
    ///
    /// If the index lies outside the padded array.
    pub fn at(&self, i: usize, j: usize, k: usize) -> f64 {
        debug_assert!(
            self.shape.checked_index(i, j, k).is_some(),
            "({i}, {j}, {k}) outside {:?}",
            self.shape
        );
        self.data[self.shape.strides().index(i, j, k)]
    }

    /// Store `value` at `(i, j, k)`.
    ///
    /// # Panics
    ///
    /// If the index lies outside the padded array.
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f64) {
        debug_assert!(
            self.shape.checked_index(i, j, k).is_some(),
            "({i}, {j}, {k}) outside {:?}",
            self.shape
        );
        let ijk = self.shape.strides().index(i, j, k);
        self.data[ijk] = value;
    }

    /// Set every cell, halo included.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrite the values with those of `other`.
    ///
    /// Names and units are left alone.
    pub fn copy_from(&mut self, other: &Field3d) -> Result<(), FieldError> {
        if other.shape != self.shape {
            return Err(FieldError::ShapeMismatch {
                expected: self.shape,
                actual: other.shape,
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }
}
