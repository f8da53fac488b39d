use crib_math::{Aabb3, Point2, Point3, Vector3};

/// Indexed triangle mesh with per-vertex normals and parameter coordinates.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<Point3>,
    pub normals: Vec<Vector3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Point2>,
}

/// Unit normal of the triangle `a b c` from `(b - a) × (c - b)`, or zero
/// when the triangle has no area.
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Vector3 {
    (b - a).cross(c - b).normalize_or_zero()
}

impl TriangleMesh {
    /// Number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of triangle `i`.
    pub fn triangle(&self, i: usize) -> Option<[Point3; 3]> {
        let tri = self.indices.get(3 * i..3 * i + 3)?;
        Some([
            *self.positions.get(tri[0] as usize)?,
            *self.positions.get(tri[1] as usize)?,
            *self.positions.get(tri[2] as usize)?,
        ])
    }

    /// Unit normal of triangle `i` in its own winding.
    pub fn face_normal(&self, i: usize) -> Option<Vector3> {
        let [a, b, c] = self.triangle(i)?;
        Some(triangle_normal(a, b, c))
    }

    /// Merge another mesh into this one, offsetting indices appropriately.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Area-weighted vertex normals accumulated from the adjacent triangles.
    pub fn compute_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.positions.len(), Vector3::ZERO);

        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];
            let normal = (p1 - p0).cross(p2 - p1);
            self.normals[i0] += normal;
            self.normals[i1] += normal;
            self.normals[i2] += normal;
        }

        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }

    /// Compute the axis-aligned bounding box of all positions.
    pub fn bounding_box(&self) -> Aabb3 {
        Aabb3::from_points(&self.positions).unwrap_or(Aabb3::new(Point3::ZERO, Point3::ZERO))
    }
}
