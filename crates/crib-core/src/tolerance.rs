/// Tolerance bundle shared by the geometry and topology crates.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance below which two 3-D points coincide (model units)
    pub linear: f64,
    /// Distance below which two UV parameter pairs are equal
    pub parametric: f64,
    /// Length below which a vector counts as zero
    pub vector: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-6;
    pub const DEFAULT_PARAMETRIC: f64 = 1e-3;
    pub const DEFAULT_VECTOR: f64 = 1e-10;

    pub fn new(linear: f64, parametric: f64, vector: f64) -> Self {
        Self {
            linear,
            parametric,
            vector,
        }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            parametric: Self::DEFAULT_PARAMETRIC,
            vector: Self::DEFAULT_VECTOR,
        }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-4,
            parametric: 1e-2,
            vector: 1e-8,
        }
    }

    pub fn tight() -> Self {
        Self {
            linear: 1e-10,
            parametric: 1e-6,
            vector: 1e-14,
        }
    }

    /// Check if two values are equal within linear tolerance
    pub fn linear_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.linear
    }

    /// Check if a distance is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }

    /// Check if two parameter values are equal within parametric tolerance
    pub fn param_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.parametric
    }

    pub fn is_zero_length(self, length: f64) -> bool {
        length < self.vector
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
