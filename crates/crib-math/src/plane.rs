use crate::{Point3, Vector3};
use crib_core::{CribError, Result};
use serde::{Deserialize, Serialize};

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Positive,
    Negative,
    On,
}

/// A plane in 3D space defined by a point and unit normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    /// Build a plane, normalizing `normal`. A zero normal is rejected.
    pub fn new(origin: Point3, normal: Vector3) -> Result<Self> {
        let normal = normal
            .try_normalize()
            .ok_or_else(|| CribError::Geometry("plane normal has zero length".into()))?;
        Ok(Self { origin, normal })
    }

    /// Plane through three points with normal `(b - a) x (c - a)`.
    pub fn from_points(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        let normal = (b - a)
            .cross(c - a)
            .try_normalize()
            .ok_or(CribError::DegenerateTriangle(a))?;
        Ok(Self { origin: a, normal })
    }

    pub fn xy() -> Self {
        Self {
            origin: Point3::ZERO,
            normal: Vector3::Z,
        }
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f64 {
        (point - self.origin).dot(self.normal)
    }

    pub fn side(&self, point: Point3) -> Side {
        let d = self.signed_distance(point);
        if d > 0.0 {
            Side::Positive
        } else if d < 0.0 {
            Side::Negative
        } else {
            Side::On
        }
    }

    /// True when the plane strictly separates `a` and `b`.
    pub fn separates(&self, a: Point3, b: Point3) -> bool {
        self.signed_distance(a) * self.signed_distance(b) < 0.0
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;

    #[test]
    fn test_signed_distance() {
        let plane = Plane::xy();
        assert_abs_diff_eq!(plane.signed_distance(dvec3(0.0, 0.0, 5.0)), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(plane.signed_distance(dvec3(0.0, 0.0, -3.0)), -3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalizes_and_rejects_zero() {
        let plane = Plane::new(dvec3(1.0, 0.0, 0.0), dvec3(3.0, 0.0, 4.0)).unwrap();
        assert_abs_diff_eq!(plane.normal.length(), 1.0, epsilon = 1e-12);
        assert!(Plane::new(Point3::ZERO, Vector3::ZERO).is_err());
    }

    #[test]
    fn test_from_points() {
        let plane = Plane::from_points(
            dvec3(0.0, 0.0, 2.0),
            dvec3(1.0, 0.0, 2.0),
            dvec3(0.0, 1.0, 2.0),
        )
        .unwrap();
        assert!(plane.normal.abs_diff_eq(Vector3::Z, 1e-12));
        assert_eq!(plane.side(dvec3(4.0, 4.0, 3.0)), Side::Positive);

        let collinear = Plane::from_points(
            dvec3(0.0, 0.0, 0.0),
            dvec3(1.0, 1.0, 1.0),
            dvec3(2.0, 2.0, 2.0),
        );
        assert!(matches!(collinear, Err(CribError::DegenerateTriangle(_))));
    }

    #[test]
    fn test_separates() {
        let plane = Plane::xy();
        assert!(plane.separates(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 1.0, -1.0)));
        assert!(!plane.separates(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 1.0, 2.0)));
        assert!(!plane.separates(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 1.0, -2.0)));
    }

    #[test]
    fn test_project_point() {
        let plane = Plane::xy();
        let projected = plane.project_point(dvec3(1.0, 2.0, 5.0));
        assert!((projected - dvec3(1.0, 2.0, 0.0)).length() < 1e-10);
    }
}
