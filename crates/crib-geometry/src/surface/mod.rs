//! Parametric surfaces over the unit square.

mod bicubic;

use crib_core::{CribError, Result};
use crib_math::{Point3, Vector3};

use crate::uv::ParamPoint;

pub use bicubic::{Bicubic, Coefficients};

/// Trait for parametric surfaces with domain `[0, 1] × [0, 1]`.
pub trait Surface: Send + Sync {
    /// Evaluate the surface at parameters `(u, v)`.
    fn point_at(&self, u: f64, v: f64) -> Result<Point3>;

    /// Partial derivative with respect to `u`.
    fn partial_u(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Partial derivative with respect to `v`.
    fn partial_v(&self, u: f64, v: f64) -> Result<Vector3>;

    /// Unit normal from the cross product of the unit partials.
    fn normal_at(&self, u: f64, v: f64) -> Result<Vector3> {
        let degenerate = || CribError::DegenerateNormal { u, v };
        let du = self.partial_u(u, v)?.try_normalize().ok_or_else(degenerate)?;
        let dv = self.partial_v(u, v)?.try_normalize().ok_or_else(degenerate)?;
        du.cross(dv).try_normalize().ok_or_else(degenerate)
    }

    /// Point displaced `distance` along the unit normal.
    fn offset_point(&self, u: f64, v: f64, distance: f64) -> Result<Point3> {
        Ok(self.point_at(u, v)? + self.normal_at(u, v)? * distance)
    }

    fn point_at_param(&self, p: ParamPoint) -> Result<Point3> {
        self.point_at(p.u, p.v)
    }
}

/// Reject parameters outside the closed unit interval.
pub(crate) fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CribError::out_of_unit(name, value))
    }
}
