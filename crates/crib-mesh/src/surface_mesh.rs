//! Triangle lists laid out in a surface's parameter square.

use std::fmt;

use crib_core::{CribError, Result};
use crib_geometry::{ParamPoint, Surface};
use crib_math::Aabb2;
use log::debug;

use crate::TriangleMesh;

/// Triangles over the UV domain of a surface, kept as flat parameter and
/// index arrays. No adjacency is tracked; the list answers overlap queries
/// and maps to a 3-D [`TriangleMesh`].
pub struct SurfaceMesh<'a> {
    surface: &'a dyn Surface,
    params: Vec<ParamPoint>,
    triangles: Vec<[usize; 3]>,
}

impl fmt::Debug for SurfaceMesh<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceMesh")
            .field("params", &self.params.len())
            .field("triangles", &self.triangles.len())
            .finish()
    }
}

impl<'a> SurfaceMesh<'a> {
    pub fn new(surface: &'a dyn Surface) -> Self {
        Self {
            surface,
            params: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// `u_divs × v_divs` grid of cells, each split into two triangles.
    ///
    /// Vertex `(i, j)` sits at `(i / u_divs, j / v_divs)` and is shared by
    /// the neighbouring cells.
    pub fn uniform(surface: &'a dyn Surface, u_divs: usize, v_divs: usize) -> Result<Self> {
        if u_divs == 0 || v_divs == 0 {
            return Err(CribError::InvalidInputCount {
                what: "grid divisions per side",
                expected: 1,
                found: 0,
            });
        }

        let mut mesh = Self::new(surface);
        for i in 0..=u_divs {
            for j in 0..=v_divs {
                mesh.add_vertex(ParamPoint::new(i as f64 / u_divs as f64, j as f64 / v_divs as f64));
            }
        }

        let row = v_divs + 1;
        for i in 0..u_divs {
            for j in 0..v_divs {
                let a = i * row + j;
                let b = (i + 1) * row + j;
                let c = (i + 1) * row + j + 1;
                let d = i * row + j + 1;
                mesh.add_indexed([a, b, c])?;
                mesh.add_indexed([a, c, d])?;
            }
        }
        debug!(
            "uniform {}x{} grid: {} triangles",
            u_divs,
            v_divs,
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    pub fn surface(&self) -> &'a dyn Surface {
        self.surface
    }

    pub fn params(&self) -> &[ParamPoint] {
        &self.params
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.params.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a parameter point and return its index.
    pub fn add_vertex(&mut self, p: ParamPoint) -> usize {
        self.params.push(p);
        self.params.len() - 1
    }

    /// Append a triangle over existing vertices and return its index.
    pub fn add_indexed(&mut self, tri: [usize; 3]) -> Result<usize> {
        let len = self.params.len();
        if let Some(&index) = tri.iter().find(|&&i| i >= len) {
            return Err(CribError::IndexOutOfBounds { index, len });
        }
        self.triangles.push(tri);
        Ok(self.triangles.len() - 1)
    }

    /// Append a triangle with three fresh vertices and return its index.
    pub fn add(&mut self, a: ParamPoint, b: ParamPoint, c: ParamPoint) -> usize {
        let base = self.params.len();
        self.params.extend([a, b, c]);
        self.triangles.push([base, base + 1, base + 2]);
        self.triangles.len() - 1
    }

    pub fn triangle(&self, i: usize) -> Option<[ParamPoint; 3]> {
        let [a, b, c] = *self.triangles.get(i)?;
        Some([self.params[a], self.params[b], self.params[c]])
    }

    /// Parameter-space rectangle around triangle `i`.
    pub fn extent(&self, i: usize) -> Option<Aabb2> {
        let corners = self.triangle(i)?.map(ParamPoint::to_point2);
        Aabb2::from_points(&corners)
    }

    /// Indices of the triangles whose extents touch `target`.
    pub fn overlap(&self, target: &Aabb2) -> Vec<usize> {
        (0..self.triangles.len())
            .filter(|&i| self.extent(i).is_some_and(|e| e.overlaps(target)))
            .collect()
    }

    /// Lift every vertex onto the surface with its unit normal; `uvs` keep
    /// the parameters.
    pub fn to_triangle_mesh(&self) -> Result<TriangleMesh> {
        let mut mesh = TriangleMesh {
            positions: Vec::with_capacity(self.params.len()),
            normals: Vec::with_capacity(self.params.len()),
            indices: Vec::with_capacity(self.triangles.len() * 3),
            uvs: Vec::with_capacity(self.params.len()),
        };
        for &p in &self.params {
            mesh.positions.push(self.surface.point_at(p.u, p.v)?);
            mesh.normals.push(self.surface.normal_at(p.u, p.v)?);
            mesh.uvs.push(p.to_point2());
        }
        mesh.indices
            .extend(self.triangles.iter().flatten().map(|&i| i as u32));
        Ok(mesh)
    }
}
