//! Surface crib geometry: bicubic patches, curves across them, and the
//! solvers that intersect them with lines and planes.

pub mod curve;
pub mod intersect;
pub mod linalg;
pub mod samples;
pub mod surface;
pub mod tessellate;
pub mod uv;

pub use curve::{CrownSubdivision, SurfaceCurve};
pub use intersect::{LineHit, SolverConfig, SolverState};
pub use surface::{Bicubic, Surface};
pub use uv::{ParamPoint, ParamVector};
