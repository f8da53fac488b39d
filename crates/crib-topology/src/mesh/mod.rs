mod bounding;
mod build;
#[allow(clippy::module_inception)]
mod mesh;
pub mod types;
mod validate;

pub use build::split_quad;
pub use mesh::Mesh;
pub use types::*;
