//! Surface crib topology: validated facets and meshes that enforce at most
//! two facets per edge.

pub mod mesh;

pub use mesh::{split_quad, EdgeId, EdgeKey, EdgeRecord, Facet, FacetId, Mesh};
