use crate::{Point3, Vector3};
use crib_core::{CribError, Result};
use serde::{Deserialize, Serialize};

const PARALLEL_EPSILON: f64 = 1e-12;

/// An unbounded line in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Line {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Line {
    pub fn new(origin: Point3, direction: Vector3) -> Result<Self> {
        let direction = direction
            .try_normalize()
            .ok_or_else(|| CribError::Geometry("line direction has zero length".into()))?;
        Ok(Self { origin, direction })
    }

    /// Line through two distinct points.
    pub fn through(a: Point3, b: Point3) -> Result<Self> {
        Self::new(a, b - a).map_err(|_| CribError::CoincidentPoints(a))
    }

    /// Get a point along the line at parameter t.
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Foot of the perpendicular from `point`; the line is unbounded in both directions.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        self.at((point - self.origin).dot(self.direction))
    }

    pub fn distance_to_point(&self, point: Point3) -> f64 {
        (point - self.closest_point(point)).length()
    }

    /// Whether both lines lie in one plane. Parallel lines always do.
    pub fn is_coplanar(&self, other: &Line, tolerance: f64) -> bool {
        let n = self.direction.cross(other.direction);
        let len = n.length();
        if len < PARALLEL_EPSILON {
            return true;
        }
        ((other.origin - self.origin).dot(n) / len).abs() < tolerance
    }

    /// Closest-approach point of two lines, taken midway between the two feet.
    ///
    /// For coplanar, non-parallel lines this is their intersection.
    pub fn intersect(&self, other: &Line) -> Result<Point3> {
        let b = self.direction.dot(other.direction);
        let denom = 1.0 - b * b;
        if denom < PARALLEL_EPSILON {
            return Err(CribError::Geometry("lines are parallel".into()));
        }
        let w = self.origin - other.origin;
        let d = self.direction.dot(w);
        let e = other.direction.dot(w);
        let s = (b * e - d) / denom;
        let t = (e - b * d) / denom;
        Ok((self.at(s) + other.at(t)) * 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use glam::dvec3;

    #[test]
    fn test_at() {
        let line = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(2.0, 0.0, 0.0)).unwrap();
        let p = line.at(5.0);
        assert!((p - dvec3(5.0, 0.0, 0.0)).length() < 1e-10);
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Line::new(Point3::ZERO, Vector3::ZERO).is_err());
        assert!(matches!(
            Line::through(Point3::ONE, Point3::ONE),
            Err(CribError::CoincidentPoints(_))
        ));
    }

    #[test]
    fn test_closest_point_behind_origin() {
        let line = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)).unwrap();
        let foot = line.closest_point(dvec3(-4.0, 3.0, 0.0));
        assert!(foot.abs_diff_eq(dvec3(-4.0, 0.0, 0.0), 1e-12));
        assert_abs_diff_eq!(line.distance_to_point(dvec3(-4.0, 3.0, 0.0)), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersect_crossing_lines() {
        let a = Line::new(dvec3(0.0, 0.0, 1.0), dvec3(1.0, 1.0, 0.0)).unwrap();
        let b = Line::new(dvec3(2.0, 0.0, 1.0), dvec3(-1.0, 1.0, 0.0)).unwrap();
        assert!(a.is_coplanar(&b, 1e-9));
        let hit = a.intersect(&b).unwrap();
        assert!(hit.abs_diff_eq(dvec3(1.0, 1.0, 1.0), 1e-12));
    }

    #[test]
    fn test_skew_and_parallel() {
        let a = Line::new(dvec3(0.0, 0.0, 0.0), dvec3(1.0, 0.0, 0.0)).unwrap();
        let skew = Line::new(dvec3(0.0, 0.0, 2.0), dvec3(0.0, 1.0, 0.0)).unwrap();
        assert!(!a.is_coplanar(&skew, 1e-9));
        let mid = a.intersect(&skew).unwrap();
        assert!(mid.abs_diff_eq(dvec3(0.0, 0.0, 1.0), 1e-12));

        let parallel = Line::new(dvec3(0.0, 1.0, 0.0), dvec3(-3.0, 0.0, 0.0)).unwrap();
        assert!(a.is_coplanar(&parallel, 1e-9));
        assert!(a.intersect(&parallel).is_err());
    }
}
