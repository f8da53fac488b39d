use glam::DVec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CribError {
    #[error("expected {expected} {what}, found {found}")]
    InvalidInputCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("singular system: sample parameters do not determine a unique solution")]
    SingularSystem,

    #[error("parameter {name} = {value} is outside [{low}, {high}]")]
    ParameterOutOfRange {
        name: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("degenerate normal at (u = {u}, v = {v})")]
    DegenerateNormal { u: f64, v: f64 },

    #[error("no convergence after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("end points are not separated by the plane (distances {distance_a}, {distance_b})")]
    NotBracketed { distance_a: f64, distance_b: f64 },

    #[error("coincident points near {0}")]
    CoincidentPoints(DVec3),

    #[error("collinear points near {0}")]
    DegenerateTriangle(DVec3),

    #[error("edge {a} -> {b} is already shared by two facets")]
    EdgeOverflow { a: DVec3, b: DVec3 },

    #[error("index {index} out of bounds for {len} points")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CribError {
    /// Unit-interval range violation for a named parameter.
    pub fn out_of_unit(name: &'static str, value: f64) -> Self {
        Self::ParameterOutOfRange {
            name,
            value,
            low: 0.0,
            high: 1.0,
        }
    }
}

pub type Result<T> = std::result::Result<T, CribError>;
