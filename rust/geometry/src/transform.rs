// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document space to glTF space
//!
//! CAD documents are right-handed with Z up and arbitrary length units.
//! glTF is right-handed with Y up and meters. The conversion is a uniform
//! scale followed by an axis remap:
//!
//! ```text
//! (x, y, z) -> (x, z, -y)
//! ```
//!
//! The remap is a rotation of -90 degrees about X, so unit normals stay unit
//! length and need no renormalization.

use cad_glb_core::UnitSystem;
use nalgebra::{Matrix3, Point3, Vector3};

/// Z-up to Y-up axis remap as a rotation matrix
#[inline]
fn z_up_to_y_up() -> Matrix3<f64> {
    Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, //
        0.0, -1.0, 0.0,
    )
}

/// Scale and axis remap applied to every exported position and normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    scale: f64,
    axes: Matrix3<f64>,
}

impl CoordinateTransform {
    /// Transform with an explicit document-units-to-meters factor
    pub fn new(scale: f64) -> Self {
        Self {
            scale,
            axes: z_up_to_y_up(),
        }
    }

    /// Transform for a document unit system
    pub fn from_units(unit_system: UnitSystem) -> Self {
        Self::new(unit_system.meters_per_unit())
    }

    /// Uniform scale factor
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Scale a document position to meters, then remap Z-up to Y-up.
    #[inline]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.axes * (point.coords * self.scale))
    }

    /// Remap a normal. Normals are direction vectors, so only the axis
    /// remap applies.
    #[inline]
    pub fn apply_normal(&self, normal: &Vector3<f64>) -> Vector3<f64> {
        self.axes * normal
    }

    /// Undo [`apply_point`](Self::apply_point): Y-up back to Z-up, then
    /// meters back to document units.
    #[inline]
    pub fn invert_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from((self.axes.transpose() * point.coords) / self.scale)
    }
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(1.0)
    }
}
