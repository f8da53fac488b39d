//! Convert a facet Mesh to a TriangleMesh.

use crib_topology::Mesh;

use crate::TriangleMesh;

/// Convert a `crib_topology::Mesh` to a `TriangleMesh`.
///
/// Vertices that fall in the same epsilon cell are shared between facets,
/// and the normals are smoothed across them.
pub fn facet_mesh_to_triangles(mesh: &Mesh) -> TriangleMesh {
    let (positions, indices) = mesh.to_indexed();
    let mut result = TriangleMesh {
        positions,
        normals: Vec::new(),
        indices: indices.into_iter().map(|i| i as u32).collect(),
        uvs: Vec::new(),
    };
    result.compute_normals();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_math::DVec3;

    #[test]
    fn test_single_facet_to_mesh() {
        let mut facets = Mesh::new();
        facets
            .add_points(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0))
            .unwrap();

        let mesh = facet_mesh_to_triangles(&facets);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.normals.iter().all(|n| n.abs_diff_eq(DVec3::Z, 1e-12)));
    }

    #[test]
    fn test_quad_shares_diagonal_vertices() {
        let facets = Mesh::quad(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();

        let mesh = facet_mesh_to_triangles(&facets);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for i in 0..2 {
            assert!(mesh.face_normal(i).unwrap().abs_diff_eq(DVec3::Z, 1e-12));
        }
    }

    #[test]
    fn test_folded_quad_smooths_normals() {
        let mut facets = Mesh::new();
        facets
            .add_points(DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 1.0, 0.0))
            .unwrap();
        facets
            .add_points(DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 1.0, 1.0), DVec3::new(0.0, 1.0, 0.0))
            .unwrap();

        let mesh = facet_mesh_to_triangles(&facets);
        assert_eq!(mesh.vertex_count(), 4);
        let shared = mesh
            .positions
            .iter()
            .position(|p| *p == DVec3::new(1.0, 0.0, 0.0))
            .unwrap();
        let n = mesh.normals[shared];
        assert!((n.length() - 1.0).abs() < 1e-12);
        // (0, 0, 1) + (-1, -1, 1)
        assert!(n.abs_diff_eq(DVec3::new(-1.0, -1.0, 2.0).normalize(), 1e-12));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = facet_mesh_to_triangles(&Mesh::new());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }
}
