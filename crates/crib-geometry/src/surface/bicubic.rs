//! Single bicubic patch in power-basis form.

use crib_core::{CribError, Result};
use crib_math::{Aabb3, Line, Plane, Point3, Vector3};
use log::trace;
use serde::{Deserialize, Serialize};

use super::{check_unit, Surface};
use crate::intersect::{line_surface_intersect, SolverConfig};
use crate::linalg::{cubic_powers, cubic_slopes, design_matrix, solve_design, AxisColumns};
use crate::uv::ParamPoint;

/// Coefficients for one coordinate; entry `[i][j]` multiplies `u^(3-i) v^(3-j)`.
pub type Coefficients = [[f64; 4]; 4];

/// Samples per side of the grid used for the bounding box.
const EXTENT_SAMPLES: usize = 16;

/// Height of the probe apex above the surface in [`Bicubic::is_convex_at`].
const CONVEX_APEX_HEIGHT: f64 = 0.25;

/// Lateral spread of the four convexity probes.
const CONVEX_PROBE_SPREAD: f64 = 0.05;

const COPLANAR_TOLERANCE: f64 = 1e-9;

/// A bicubic patch `P(u, v) = Σ u^(3-i) Q[i][j] v^(3-j)` for each coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bicubic {
    pub qx: Coefficients,
    pub qy: Coefficients,
    pub qz: Coefficients,
}

impl Bicubic {
    pub fn from_coefficients(qx: Coefficients, qy: Coefficients, qz: Coefficients) -> Self {
        Self { qx, qy, qz }
    }

    /// Fit the patch through 16 points at 16 chosen parameter pairs.
    ///
    /// The pairs must determine the 16 monomials uniquely, otherwise the
    /// solve reports [`CribError::SingularSystem`].
    pub fn fit(points: &[Point3], params: &[ParamPoint]) -> Result<Self> {
        let points: &[Point3; 16] = points.try_into().map_err(|_| CribError::InvalidInputCount {
            what: "control points",
            expected: 16,
            found: points.len(),
        })?;
        let params: &[ParamPoint; 16] =
            params.try_into().map_err(|_| CribError::InvalidInputCount {
                what: "parameter pairs",
                expected: 16,
                found: params.len(),
            })?;

        let a = design_matrix(params);
        let rhs = AxisColumns::from_fn(|r, c| points[r][c]);
        let solved = solve_design(&a, &rhs)?;

        let unpack = |axis: usize| -> Coefficients {
            std::array::from_fn(|i| std::array::from_fn(|j| solved[(4 * i + j, axis)]))
        };
        Ok(Self::from_coefficients(unpack(0), unpack(1), unpack(2)))
    }

    /// Fit through points sampled row by row at `u, v ∈ {0, 1/3, 2/3, 1}`.
    pub fn interpolate_grid(points: &[Point3]) -> Result<Self> {
        Self::fit(points, &Self::grid_params())
    }

    /// Parameter pairs used by [`Bicubic::interpolate_grid`], u-major.
    pub fn grid_params() -> [ParamPoint; 16] {
        std::array::from_fn(|k| ParamPoint::new((k / 4) as f64 / 3.0, (k % 4) as f64 / 3.0))
    }

    fn combine(&self, s: [f64; 4], t: [f64; 4]) -> Vector3 {
        let eval = |q: &Coefficients| -> f64 {
            let mut sum = 0.0;
            for i in 0..4 {
                for j in 0..4 {
                    sum += s[i] * q[i][j] * t[j];
                }
            }
            sum
        };
        Vector3::new(eval(&self.qx), eval(&self.qy), eval(&self.qz))
    }

    /// Evaluate with parameters clamped into the unit square.
    pub fn point_at_clamped(&self, u: f64, v: f64) -> Point3 {
        self.combine(cubic_powers(u.clamp(0.0, 1.0)), cubic_powers(v.clamp(0.0, 1.0)))
    }

    /// Box around a 16 × 16 grid of surface samples.
    ///
    /// Sampling can miss bulges between grid lines, so the box is approximate.
    pub fn bounding_box(&self) -> Aabb3 {
        let step = 1.0 / (EXTENT_SAMPLES - 1) as f64;
        let mut extent = Aabb3::from_point(self.point_at_clamped(0.0, 0.0));
        for i in 0..EXTENT_SAMPLES {
            for j in 0..EXTENT_SAMPLES {
                extent = extent.include(self.point_at_clamped(i as f64 * step, j as f64 * step));
            }
        }
        extent
    }

    /// Whether the surface curves away from its normal around `(u, v)`.
    ///
    /// Four lines parallel to the normal are dropped onto the surface from a
    /// point above `(u, v)`. The surface normals at the hits must converge
    /// towards the central normal line below the hits for every probe.
    pub fn is_convex_at(&self, u: f64, v: f64) -> Result<bool> {
        let base = self.point_at(u, v)?;
        let du = self.partial_u(u, v)?.try_normalize().ok_or(CribError::DegenerateNormal { u, v })?;
        let dv = self.partial_v(u, v)?.try_normalize().ok_or(CribError::DegenerateNormal { u, v })?;
        let reference = self.normal_at(u, v)?;
        let grail = Line::new(base, reference)?;
        let apex = base + reference * CONVEX_APEX_HEIGHT;

        let config = SolverConfig {
            seed: ParamPoint::new(u, v),
            ..SolverConfig::default()
        };

        let probes = [du, dv, -du, -dv].map(|dir| apex + dir * CONVEX_PROBE_SPREAD);
        for probe in probes {
            let drop = Line::new(probe, reference)?;
            let hit = line_surface_intersect(self, &drop, &config)?;
            let local = self.normal_at(hit.param.u, hit.param.v)?;

            let mut distal = Line::new(hit.point, local)?;
            if !grail.is_coplanar(&distal, COPLANAR_TOLERANCE) {
                // Swing the local normal into the plane of base, hit, and apex.
                let clamp = Plane::from_points(base, hit.point, apex)?;
                let swung = local - clamp.normal * clamp.normal.dot(local);
                distal = Line::new(hit.point, swung)?;
            }

            let collision = match grail.intersect(&distal) {
                Ok(p) => p,
                Err(_) => return Ok(false),
            };
            let Some(wire) = (collision - hit.point).try_normalize() else {
                return Ok(false);
            };
            trace!("convexity probe at {:?}: compliance {}", hit.param, reference.dot(wire));
            if reference.dot(wire) >= 0.0 {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl Surface for Bicubic {
    fn point_at(&self, u: f64, v: f64) -> Result<Point3> {
        check_unit("u", u)?;
        check_unit("v", v)?;
        Ok(self.combine(cubic_powers(u), cubic_powers(v)))
    }

    fn partial_u(&self, u: f64, v: f64) -> Result<Vector3> {
        check_unit("u", u)?;
        check_unit("v", v)?;
        Ok(self.combine(cubic_slopes(u), cubic_powers(v)))
    }

    fn partial_v(&self, u: f64, v: f64) -> Result<Vector3> {
        check_unit("u", u)?;
        check_unit("v", v)?;
        Ok(self.combine(cubic_powers(u), cubic_slopes(v)))
    }
}
