//! Cubic curves in the parameter plane of a surface.

mod crown;

use std::fmt;

use crib_core::{CribError, Result};
use crib_math::{Aabb2, Point3};
use log::debug;
use nalgebra::{Matrix4, Matrix4x2};

use crate::linalg::{cubic_powers, cubic_slopes, solve_cubic};
use crate::surface::{check_unit, Surface};
use crate::uv::{ParamPoint, ParamVector};

pub use crown::{crown, CrownSubdivision};

/// Number of uniform steps sampled by [`SurfaceCurve::subdivide`].
pub const CROWN_SAMPLES: usize = 200;

/// Number of uniform steps sampled by [`SurfaceCurve::bounding_box_uv`].
const EXTENT_SAMPLES: usize = 120;

/// Overshoot past the unit square that is snapped back onto the boundary.
const PARAM_OVERSHOOT: f64 = 1e-5;

/// A path across a surface: `u(t)` and `v(t)` are cubics in `t`.
///
/// Coefficients are stored highest power first, so `u(t) = a t³ + b t² + c t + d`.
/// The active range `[t_low, t_high]` starts as `[0, 1]` and can only shrink.
#[derive(Clone)]
pub struct SurfaceCurve<'a> {
    surface: &'a dyn Surface,
    u_coeffs: [f64; 4],
    v_coeffs: [f64; 4],
    t_low: f64,
    t_high: f64,
}

impl fmt::Debug for SurfaceCurve<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceCurve")
            .field("u_coeffs", &self.u_coeffs)
            .field("v_coeffs", &self.v_coeffs)
            .field("t_low", &self.t_low)
            .field("t_high", &self.t_high)
            .finish_non_exhaustive()
    }
}

impl<'a> SurfaceCurve<'a> {
    pub fn from_coefficients(surface: &'a dyn Surface, u_coeffs: [f64; 4], v_coeffs: [f64; 4]) -> Self {
        Self {
            surface,
            u_coeffs,
            v_coeffs,
            t_low: 0.0,
            t_high: 1.0,
        }
    }

    /// Cubic Hermite curve from end points and end tangents.
    pub fn hermite(
        surface: &'a dyn Surface,
        start: ParamPoint,
        start_slope: ParamVector,
        end: ParamPoint,
        end_slope: ParamVector,
    ) -> Self {
        let blend = |p0: f64, s0: f64, p1: f64, s1: f64| -> [f64; 4] {
            [
                2.0 * p0 + s0 - 2.0 * p1 + s1,
                -3.0 * p0 - 2.0 * s0 + 3.0 * p1 - s1,
                s0,
                p0,
            ]
        };
        Self::from_coefficients(
            surface,
            blend(start.u, start_slope.i, end.u, end_slope.i),
            blend(start.v, start_slope.j, end.v, end_slope.j),
        )
    }

    /// Curve through four points, the interior two placed at `t = fractions.0`
    /// and `t = fractions.1`.
    pub fn fit(surface: &'a dyn Surface, points: &[ParamPoint], fractions: (f64, f64)) -> Result<Self> {
        let points: &[ParamPoint; 4] = points.try_into().map_err(|_| CribError::InvalidInputCount {
            what: "curve points",
            expected: 4,
            found: points.len(),
        })?;
        let (f1, f2) = fractions;
        if !(f1 > 0.0 && f1 < f2) {
            return Err(CribError::ParameterOutOfRange {
                name: "fraction",
                value: f1,
                low: 0.0,
                high: f2,
            });
        }
        if f2 >= 1.0 {
            return Err(CribError::ParameterOutOfRange {
                name: "fraction",
                value: f2,
                low: f1,
                high: 1.0,
            });
        }

        let ts = [0.0, f1, f2, 1.0];
        let a = Matrix4::from_fn(|r, c| cubic_powers(ts[r])[c]);
        let rhs = Matrix4x2::from_fn(|r, c| if c == 0 { points[r].u } else { points[r].v });
        let solved = solve_cubic(&a, &rhs)?;

        Ok(Self::from_coefficients(
            surface,
            std::array::from_fn(|k| solved[(k, 0)]),
            std::array::from_fn(|k| solved[(k, 1)]),
        ))
    }

    /// [`SurfaceCurve::fit`] with fractions taken from the 3-D lengths of the
    /// polyline through the four points.
    pub fn fit_by_arc_length(surface: &'a dyn Surface, points: &[ParamPoint]) -> Result<Self> {
        let fractions = arc_length_fractions(surface, points)?;
        if fractions.len() != 4 {
            return Err(CribError::InvalidInputCount {
                what: "curve points",
                expected: 4,
                found: points.len(),
            });
        }
        Self::fit(surface, points, (fractions[1], fractions[2]))
    }

    /// The line `u = const`, running from `v = 0` to `v = 1`.
    pub fn iso_u(surface: &'a dyn Surface, u: f64) -> Result<Self> {
        check_unit("u", u)?;
        let up = ParamVector::new(0.0, 1.0);
        Ok(Self::hermite(surface, ParamPoint::new(u, 0.0), up, ParamPoint::new(u, 1.0), up))
    }

    /// The line `v = const`, running from `u = 0` to `u = 1`.
    pub fn iso_v(surface: &'a dyn Surface, v: f64) -> Result<Self> {
        check_unit("v", v)?;
        let across = ParamVector::new(1.0, 0.0);
        Ok(Self::hermite(surface, ParamPoint::new(0.0, v), across, ParamPoint::new(1.0, v), across))
    }

    pub fn surface(&self) -> &'a dyn Surface {
        self.surface
    }

    pub fn u_coefficients(&self) -> [f64; 4] {
        self.u_coeffs
    }

    pub fn v_coefficients(&self) -> [f64; 4] {
        self.v_coeffs
    }

    /// Active parameter range `(t_low, t_high)`.
    pub fn range(&self) -> (f64, f64) {
        (self.t_low, self.t_high)
    }

    fn check_t(&self, t: f64) -> Result<()> {
        if t < self.t_low || t > self.t_high || t.is_nan() {
            return Err(CribError::ParameterOutOfRange {
                name: "t",
                value: t,
                low: self.t_low,
                high: self.t_high,
            });
        }
        Ok(())
    }

    pub fn point_at(&self, t: f64) -> Result<ParamPoint> {
        self.check_t(t)?;
        let s = cubic_powers(t);
        let u = dot4(s, self.u_coeffs);
        let v = dot4(s, self.v_coeffs);
        Ok(ParamPoint::new(settle("u", u)?, settle("v", v)?))
    }

    /// Derivative `(du/dt, dv/dt)`.
    pub fn tangent_at(&self, t: f64) -> Result<ParamVector> {
        self.check_t(t)?;
        let s = cubic_slopes(t);
        Ok(ParamVector::new(dot4(s, self.u_coeffs), dot4(s, self.v_coeffs)))
    }

    /// Surface point under the curve at `t`.
    pub fn position_at(&self, t: f64) -> Result<Point3> {
        self.surface.point_at_param(self.point_at(t)?)
    }

    /// Pull the upper bound down to `t`, which must lie strictly inside the range.
    pub fn narrow_upper(&mut self, t: f64) -> Result<()> {
        if !(t > self.t_low && t < self.t_high) {
            return Err(CribError::ParameterOutOfRange {
                name: "upper bound",
                value: t,
                low: self.t_low,
                high: self.t_high,
            });
        }
        self.t_high = t;
        Ok(())
    }

    /// Raise the lower bound to `t`, which must lie strictly inside the range.
    pub fn narrow_lower(&mut self, t: f64) -> Result<()> {
        if !(t > self.t_low && t < self.t_high) {
            return Err(CribError::ParameterOutOfRange {
                name: "lower bound",
                value: t,
                low: self.t_low,
                high: self.t_high,
            });
        }
        self.t_low = t;
        Ok(())
    }

    /// Uniform parameters across the active range, ending exactly on `t_high`.
    pub fn stations(&self, steps: usize) -> impl Iterator<Item = f64> + '_ {
        let span = self.t_high - self.t_low;
        (0..=steps).map(move |i| {
            if i == steps {
                self.t_high
            } else {
                self.t_low + span * i as f64 / steps as f64
            }
        })
    }

    /// Chord approximation of the 3-D curve, with every sample between two
    /// consecutive vertices within `max_crown` of their chord.
    pub fn subdivide(&self, max_crown: f64) -> Result<CrownSubdivision> {
        if !(max_crown > 0.0) {
            return Err(CribError::ParameterOutOfRange {
                name: "max_crown",
                value: max_crown,
                low: 0.0,
                high: f64::INFINITY,
            });
        }
        let samples = self
            .stations(CROWN_SAMPLES)
            .map(|t| self.position_at(t))
            .collect::<Result<Vec<_>>>()?;
        debug!("sampled {} points for crown {}", samples.len(), max_crown);
        Ok(CrownSubdivision::new(samples, max_crown))
    }

    /// Parameter-space box around 121 samples of the active range.
    pub fn bounding_box_uv(&self) -> Result<Aabb2> {
        let mut extent = Aabb2::from_point(self.point_at(self.t_low)?.to_point2());
        for t in self.stations(EXTENT_SAMPLES) {
            extent = extent.include(self.point_at(t)?.to_point2());
        }
        Ok(extent)
    }
}

/// Cumulative 3-D length along the polyline through `points`, scaled to end at 1.
pub fn arc_length_fractions(surface: &dyn Surface, points: &[ParamPoint]) -> Result<Vec<f64>> {
    let positions = points
        .iter()
        .map(|&p| surface.point_at_param(p))
        .collect::<Result<Vec<_>>>()?;
    let mut running = Vec::with_capacity(positions.len());
    let mut total = 0.0;
    for (k, p) in positions.iter().enumerate() {
        if k > 0 {
            total += (*p - positions[k - 1]).length();
        }
        running.push(total);
    }
    if total <= 0.0 {
        let near = positions.first().copied().unwrap_or(Point3::ZERO);
        return Err(CribError::CoincidentPoints(near));
    }
    Ok(running.into_iter().map(|d| d / total).collect())
}

fn dot4(a: [f64; 4], b: [f64; 4]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

fn settle(name: &'static str, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else if value < 0.0 && value >= -PARAM_OVERSHOOT {
        Ok(0.0)
    } else if value > 1.0 && value <= 1.0 + PARAM_OVERSHOOT {
        Ok(1.0)
    } else {
        Err(CribError::out_of_unit(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{bowl, flat};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hermite_end_conditions() {
        let s = bowl();
        let start = ParamPoint::new(0.1, 0.2);
        let end = ParamPoint::new(0.8, 0.7);
        let slope_a = ParamVector::new(0.5, 0.1);
        let slope_b = ParamVector::new(0.2, 0.9);
        let curve = SurfaceCurve::hermite(&s, start, slope_a, end, slope_b);

        let p0 = curve.point_at(0.0).unwrap();
        let p1 = curve.point_at(1.0).unwrap();
        assert_abs_diff_eq!(p0.u, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(p0.v, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(p1.u, 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(p1.v, 0.7, epsilon = 1e-12);

        let t0 = curve.tangent_at(0.0).unwrap();
        let t1 = curve.tangent_at(1.0).unwrap();
        assert_abs_diff_eq!(t0.i, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(t0.j, 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(t1.i, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(t1.j, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_iso_curves() {
        let s = bowl();
        let curve = SurfaceCurve::iso_u(&s, 0.3).unwrap();
        let p = curve.point_at(0.4).unwrap();
        assert_abs_diff_eq!(p.u, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(p.v, 0.4, epsilon = 1e-12);

        let curve = SurfaceCurve::iso_v(&s, 0.9).unwrap();
        let p = curve.point_at(0.25).unwrap();
        assert_abs_diff_eq!(p.u, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(p.v, 0.9, epsilon = 1e-12);

        assert!(SurfaceCurve::iso_u(&s, 1.5).is_err());
    }

    #[test]
    fn test_fit_passes_through_points() {
        let s = bowl();
        let pts = [
            ParamPoint::new(0.0, 0.1),
            ParamPoint::new(0.3, 0.35),
            ParamPoint::new(0.6, 0.5),
            ParamPoint::new(1.0, 0.6),
        ];
        let curve = SurfaceCurve::fit(&s, &pts, (0.3, 0.65)).unwrap();
        for (&t, want) in [0.0, 0.3, 0.65, 1.0].iter().zip(pts.iter()) {
            let got = curve.point_at(t).unwrap();
            assert_abs_diff_eq!(got.u, want.u, epsilon = 1e-10);
            assert_abs_diff_eq!(got.v, want.v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        let s = bowl();
        let pts = [ParamPoint::new(0.0, 0.0); 3];
        assert!(matches!(
            SurfaceCurve::fit(&s, &pts, (0.3, 0.6)),
            Err(CribError::InvalidInputCount { expected: 4, found: 3, .. })
        ));
        let pts = [ParamPoint::new(0.5, 0.5); 4];
        assert!(SurfaceCurve::fit(&s, &pts, (0.6, 0.3)).is_err());
        assert!(SurfaceCurve::fit(&s, &pts, (0.3, 1.0)).is_err());
        assert!(matches!(
            SurfaceCurve::fit_by_arc_length(&s, &pts),
            Err(CribError::CoincidentPoints(_))
        ));
    }

    #[test]
    fn test_fit_by_arc_length_on_straight_line() {
        let s = flat();
        let pts = [
            ParamPoint::new(0.0, 0.0),
            ParamPoint::new(0.2, 0.2),
            ParamPoint::new(0.5, 0.5),
            ParamPoint::new(1.0, 1.0),
        ];
        let curve = SurfaceCurve::fit_by_arc_length(&s, &pts).unwrap();
        let mid = curve.point_at(0.5).unwrap();
        assert_abs_diff_eq!(mid.u, 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(mid.v, 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_point_at_range_and_overshoot() {
        let s = flat();
        let slight = SurfaceCurve::from_coefficients(&s, [0.0, 0.0, 1.0 + 5e-6, 0.0], [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(slight.point_at(1.0).unwrap().u, 1.0);
        assert!(matches!(
            slight.point_at(1.2),
            Err(CribError::ParameterOutOfRange { name: "t", .. })
        ));

        let wide = SurfaceCurve::from_coefficients(&s, [0.0, 0.0, 1.1, 0.0], [0.0, 0.0, 0.0, 0.5]);
        assert!(wide.point_at(0.5).is_ok());
        assert!(matches!(
            wide.point_at(1.0),
            Err(CribError::ParameterOutOfRange { name: "u", .. })
        ));
    }

    #[test]
    fn test_narrowing_only_shrinks() {
        let s = bowl();
        let mut curve = SurfaceCurve::iso_u(&s, 0.5).unwrap();
        curve.narrow_upper(0.8).unwrap();
        assert!(curve.narrow_upper(0.9).is_err());
        assert!(curve.narrow_lower(0.8).is_err());
        assert!(curve.narrow_lower(0.0).is_err());
        curve.narrow_lower(0.2).unwrap();
        assert_eq!(curve.range(), (0.2, 0.8));
        assert!(curve.point_at(0.1).is_err());
        assert!(curve.point_at(0.85).is_err());

        let extent = curve.bounding_box_uv().unwrap();
        assert_abs_diff_eq!(extent.min.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(extent.max.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(extent.min.y, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(extent.max.y, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_subdivide_straight_curve() {
        let s = flat();
        let curve = SurfaceCurve::iso_v(&s, 0.5).unwrap();
        let pts: Vec<_> = curve.subdivide(0.001).unwrap().collect();
        assert_eq!(pts.len(), 2);
        assert!(pts[0].abs_diff_eq(Point3::new(0.0, 0.5, 0.0), 1e-12));
        assert!(pts[1].abs_diff_eq(Point3::new(1.0, 0.5, 0.0), 1e-12));
    }

    #[test]
    fn test_subdivide_rejects_non_positive_crown() {
        let s = flat();
        let curve = SurfaceCurve::iso_v(&s, 0.5).unwrap();
        assert!(curve.subdivide(0.0).is_err());
        assert!(curve.subdivide(f64::NAN).is_err());
    }
}
