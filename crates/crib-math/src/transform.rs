use crate::{DAffine3, DQuat, Point3, Vector3};
use serde::{Deserialize, Serialize};

const SINGULAR_DETERMINANT: f64 = 1e-15;

/// Affine placement applied to facets and meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub affine: DAffine3,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            affine: DAffine3::IDENTITY,
        }
    }

    pub fn from_translation(t: Vector3) -> Self {
        Self {
            affine: DAffine3::from_translation(t),
        }
    }

    /// Rotation by `angle` radians about an axis through `center`.
    pub fn from_axis_angle(center: Point3, axis: Vector3, angle: f64) -> Self {
        let rotation = DAffine3::from_quat(DQuat::from_axis_angle(axis.normalize(), angle));
        Self {
            affine: DAffine3::from_translation(center)
                * rotation
                * DAffine3::from_translation(-center),
        }
    }

    pub fn from_scale(factor: f64) -> Self {
        Self {
            affine: DAffine3::from_scale(Vector3::splat(factor)),
        }
    }

    pub fn transform_point(&self, p: Point3) -> Point3 {
        self.affine.transform_point3(p)
    }

    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        self.affine.transform_vector3(v)
    }

    /// Apply `self` first, then `other`.
    pub fn then(&self, other: &Transform) -> Transform {
        Self {
            affine: other.affine * self.affine,
        }
    }

    /// True when the linear part flips handedness.
    pub fn is_mirror(&self) -> bool {
        self.affine.matrix3.determinant() < 0.0
    }

    pub fn inverse(&self) -> Option<Transform> {
        if self.affine.matrix3.determinant().abs() < SINGULAR_DETERMINANT {
            return None;
        }
        Some(Self {
            affine: self.affine.inverse(),
        })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec3;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_translation() {
        let t = Transform::from_translation(dvec3(10.0, 20.0, 30.0));
        let result = t.transform_point(dvec3(1.0, 2.0, 3.0));
        assert!(result.abs_diff_eq(dvec3(11.0, 22.0, 33.0), 1e-10));
        assert!(t.transform_vector(Vector3::X).abs_diff_eq(Vector3::X, 1e-12));
    }

    #[test]
    fn test_rotation_about_center() {
        let t = Transform::from_axis_angle(dvec3(1.0, 1.0, 0.0), Vector3::Z, FRAC_PI_2);
        let p = t.transform_point(dvec3(2.0, 1.0, 5.0));
        assert!(p.abs_diff_eq(dvec3(1.0, 2.0, 5.0), 1e-12));
        assert!(!t.is_mirror());
    }

    #[test]
    fn test_then_and_inverse() {
        let a = Transform::from_translation(dvec3(1.0, 0.0, 0.0));
        let b = Transform::from_scale(2.0);
        let p = a.then(&b).transform_point(dvec3(1.0, 1.0, 1.0));
        assert!(p.abs_diff_eq(dvec3(4.0, 2.0, 2.0), 1e-12));

        let inv = a.then(&b).inverse().unwrap();
        assert!(inv.transform_point(p).abs_diff_eq(dvec3(1.0, 1.0, 1.0), 1e-12));
        assert!(Transform::from_scale(0.0).inverse().is_none());
    }
}
