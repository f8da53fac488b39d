//! Surface crib core: errors, tolerances, and shared traits.

pub mod error;
pub mod tolerance;
pub mod traits;

pub use error::{CribError, Result};
pub use tolerance::Tolerance;
