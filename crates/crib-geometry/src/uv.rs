//! Points and vectors in the (u, v) parameter plane.

use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use crib_core::Tolerance;
use crib_math::Point2;
use serde::{Deserialize, Serialize};

/// A location in the unit parameter square.
///
/// Equality is tolerant: two points compare equal when both coordinates agree
/// within [`Tolerance::DEFAULT_PARAMETRIC`]. This relation is not transitive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ParamPoint {
    pub u: f64,
    pub v: f64,
}

impl ParamPoint {
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn distance(self, other: ParamPoint) -> f64 {
        (other - self).length()
    }

    pub fn is_in_domain(self) -> bool {
        (0.0..=1.0).contains(&self.u) && (0.0..=1.0).contains(&self.v)
    }

    pub fn clamped(self) -> Self {
        Self::new(self.u.clamp(0.0, 1.0), self.v.clamp(0.0, 1.0))
    }

    /// Straight-line interpolation; `t = 0` gives `self`.
    pub fn lerp(self, other: ParamPoint, t: f64) -> Self {
        self + (other - self) * t
    }

    pub fn to_point2(self) -> Point2 {
        Point2::new(self.u, self.v)
    }
}

impl PartialEq for ParamPoint {
    fn eq(&self, other: &Self) -> bool {
        let tol = Tolerance::default();
        tol.param_eq(self.u, other.u) && tol.param_eq(self.v, other.v)
    }
}

impl From<Point2> for ParamPoint {
    fn from(p: Point2) -> Self {
        Self::new(p.x, p.y)
    }
}

impl Sub for ParamPoint {
    type Output = ParamVector;

    fn sub(self, rhs: ParamPoint) -> ParamVector {
        ParamVector::new(self.u - rhs.u, self.v - rhs.v)
    }
}

impl Add<ParamVector> for ParamPoint {
    type Output = ParamPoint;

    fn add(self, rhs: ParamVector) -> ParamPoint {
        ParamPoint::new(self.u + rhs.i, self.v + rhs.j)
    }
}

/// A direction or displacement in parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamVector {
    pub i: f64,
    pub j: f64,
}

impl ParamVector {
    pub const ZERO: ParamVector = ParamVector { i: 0.0, j: 0.0 };

    pub const fn new(i: f64, j: f64) -> Self {
        Self { i, j }
    }

    pub fn length(self) -> f64 {
        self.i.hypot(self.j)
    }

    pub fn dot(self, other: ParamVector) -> f64 {
        self.i * other.i + self.j * other.j
    }

    pub fn is_zero(self) -> bool {
        Tolerance::default().is_zero_length(self.length())
    }

    /// Unit vector in the same direction; a zero vector is returned unchanged.
    pub fn normalize(self) -> Self {
        if self.is_zero() {
            return self;
        }
        self * (1.0 / self.length())
    }
}

impl Add for ParamVector {
    type Output = ParamVector;

    fn add(self, rhs: ParamVector) -> ParamVector {
        ParamVector::new(self.i + rhs.i, self.j + rhs.j)
    }
}

impl Sub for ParamVector {
    type Output = ParamVector;

    fn sub(self, rhs: ParamVector) -> ParamVector {
        ParamVector::new(self.i - rhs.i, self.j - rhs.j)
    }
}

impl Neg for ParamVector {
    type Output = ParamVector;

    fn neg(self) -> ParamVector {
        ParamVector::new(-self.i, -self.j)
    }
}

impl Mul<f64> for ParamVector {
    type Output = ParamVector;

    fn mul(self, s: f64) -> ParamVector {
        ParamVector::new(self.i * s, self.j * s)
    }
}

impl Sum for ParamVector {
    fn sum<I: Iterator<Item = ParamVector>>(iter: I) -> Self {
        iter.fold(ParamVector::ZERO, Add::add)
    }
}
