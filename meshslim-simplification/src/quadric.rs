//! Quadric error metric
//!
//! A quadric is the symmetric 4x4 matrix `sum(p * p^T)` over a set of planes
//! `p = (a, b, c, d)`. Evaluated at the homogeneous point `(x, y, z, 1)` it
//! gives the sum of squared distances from that point to every plane.

use crate::params::ContractionPlacement;
use meshslim_core::{midpoint, Point3d};
use nalgebra::{Matrix4, Vector3, Vector4};
use std::ops::{Add, AddAssign};

/// Determinant magnitude below which the 3x3 block is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Symmetric 4x4 error quadric, stored densely.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric(Matrix4<f64>);

impl Quadric {
    pub fn zeros() -> Self {
        Quadric(Matrix4::zeros())
    }

    /// The fundamental quadric `p * p^T` of a single plane.
    pub fn from_plane(plane: &Vector4<f64>) -> Self {
        Quadric(plane * plane.transpose())
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// `v^T Q v` for `v = (x, y, z, 1)`.
    ///
    /// Written as a weighted sum over the columns of `Q` so it does not depend
    /// on any particular product kernel.
    pub fn error_at(&self, p: &Point3d) -> f64 {
        let v = [p.x, p.y, p.z, 1.0];
        let q = &self.0;
        let mut error = 0.0;
        for (i, &weight) in v.iter().enumerate() {
            let column = p.x * q[(0, i)] + p.y * q[(1, i)] + p.z * q[(2, i)] + q[(3, i)];
            error += weight * column;
        }
        error
    }

    /// The point minimising [`Quadric::error_at`], or `None` when the upper-left
    /// 3x3 block is singular.
    pub fn optimal_position(&self) -> Option<Point3d> {
        let a = self.0.fixed_view::<3, 3>(0, 0).into_owned();
        if a.determinant().abs() < SINGULAR_EPSILON {
            return None;
        }
        let b: Vector3<f64> = self.0.fixed_view::<3, 1>(0, 3).into_owned();
        let inv = a.try_inverse()?;
        let p = -inv * b;
        if p.iter().all(|c| c.is_finite()) {
            Some(Point3d::from(p))
        } else {
            None
        }
    }

    /// Position of the vertex that replaces `p0` and `p1` under this
    /// (already combined) quadric.
    pub fn contracted_position(
        &self,
        p0: &Point3d,
        p1: &Point3d,
        placement: ContractionPlacement,
    ) -> Point3d {
        match placement {
            ContractionPlacement::Midpoint => midpoint(p0, p1),
            ContractionPlacement::Optimal => self
                .optimal_position()
                .unwrap_or_else(|| midpoint(p0, p1)),
        }
    }
}

impl Default for Quadric {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(self, rhs: Quadric) -> Quadric {
        Quadric(self.0 + rhs.0)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Quadric) {
        self.0 += rhs.0;
    }
}
