//! Adaptive tessellation of parametric surfaces.
//!
//! Recursively subdivides UV patches where the surface curvature exceeds a tolerance,
//! producing finer triangles in high-curvature regions and coarser triangles in flat areas.

use crib_core::{CribError, Result};
use crib_geometry::{ParamPoint, Surface};
use log::debug;

use crate::SurfaceMesh;

/// Maximum recursion depth to prevent infinite subdivision.
const MAX_DEPTH: u32 = 8;

/// Cells per side of the starting grid.
const INITIAL_DIVISIONS: usize = 4;

/// Collects the parameter triangles during recursive subdivision.
struct MeshBuilder<'a> {
    surface: &'a dyn Surface,
    tolerance: f64,
    mesh: SurfaceMesh<'a>,
}

impl<'a> MeshBuilder<'a> {
    fn new(surface: &'a dyn Surface, tolerance: f64) -> Self {
        Self {
            surface,
            tolerance,
            mesh: SurfaceMesh::new(surface),
        }
    }

    fn subdivide(&mut self, u0: f64, u1: f64, v0: f64, v1: f64, depth: u32) -> Result<()> {
        let u_mid = (u0 + u1) * 0.5;
        let v_mid = (v0 + v1) * 0.5;

        let p00 = self.surface.point_at(u0, v0)?;
        let p10 = self.surface.point_at(u1, v0)?;
        let p01 = self.surface.point_at(u0, v1)?;
        let p11 = self.surface.point_at(u1, v1)?;
        let p_mid_true = self.surface.point_at(u_mid, v_mid)?;

        let p_mid_approx = (p00 + p10 + p01 + p11) * 0.25;
        let deviation = (p_mid_true - p_mid_approx).length();

        if deviation > self.tolerance && depth < MAX_DEPTH {
            self.subdivide(u0, u_mid, v0, v_mid, depth + 1)?;
            self.subdivide(u_mid, u1, v0, v_mid, depth + 1)?;
            self.subdivide(u0, u_mid, v_mid, v1, depth + 1)?;
            self.subdivide(u_mid, u1, v_mid, v1, depth + 1)
        } else {
            self.emit_quad(u0, u1, v0, v1)
        }
    }

    fn emit_quad(&mut self, u0: f64, u1: f64, v0: f64, v1: f64) -> Result<()> {
        let base = self.mesh.vertex_count();
        for (u, v) in [(u0, v0), (u1, v0), (u1, v1), (u0, v1)] {
            self.mesh.add_vertex(ParamPoint::new(u, v));
        }
        self.mesh.add_indexed([base, base + 1, base + 2])?;
        self.mesh.add_indexed([base, base + 2, base + 3])?;
        Ok(())
    }
}

/// Adaptively tessellate a surface's unit square based on a distance tolerance.
///
/// Starts from a 4×4 grid and recursively quarters each cell whose true
/// midpoint deviates from the average of its corners by more than
/// `tolerance`, down to a depth of eight.
pub fn adaptive_surface_mesh(surface: &dyn Surface, tolerance: f64) -> Result<SurfaceMesh<'_>> {
    if !(tolerance > 0.0) {
        return Err(CribError::ParameterOutOfRange {
            name: "tolerance",
            value: tolerance,
            low: 0.0,
            high: f64::INFINITY,
        });
    }

    let mut builder = MeshBuilder::new(surface, tolerance);
    let step = 1.0 / INITIAL_DIVISIONS as f64;
    for i in 0..INITIAL_DIVISIONS {
        for j in 0..INITIAL_DIVISIONS {
            let u0 = i as f64 * step;
            let v0 = j as f64 * step;
            let u1 = if i + 1 == INITIAL_DIVISIONS { 1.0 } else { u0 + step };
            let v1 = if j + 1 == INITIAL_DIVISIONS { 1.0 } else { v0 + step };
            builder.subdivide(u0, u1, v0, v1, 0)?;
        }
    }

    debug!(
        "adaptive tessellation at {}: {} triangles",
        tolerance,
        builder.mesh.triangle_count()
    );
    Ok(builder.mesh)
}
