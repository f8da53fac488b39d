//! Surface crib tessellation: triangle lists over the UV domain, 3-D
//! triangle meshes, skins built from facet meshes, and ASCII STL output.

pub mod adaptive;
pub mod skin;
pub mod stl;
pub mod surface_mesh;
pub mod topology_to_mesh;
pub mod triangulate;

pub use adaptive::adaptive_surface_mesh;
pub use skin::{curve_strip, iso_chain, skin_mesh};
pub use surface_mesh::SurfaceMesh;
pub use topology_to_mesh::facet_mesh_to_triangles;
pub use triangulate::{triangle_normal, TriangleMesh};
