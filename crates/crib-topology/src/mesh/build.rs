use crib_core::error::{CribError, Result};
use crib_math::Point3;

use super::mesh::Mesh;
use super::types::*;

/// Split the quad `a b c d` along its shorter diagonal, `b`–`d` on a tie.
///
/// Both triangles keep the quad's winding.
pub fn split_quad(a: Point3, b: Point3, c: Point3, d: Point3) -> Result<[Facet; 2]> {
    if a.distance(c) < b.distance(d) {
        Ok([Facet::new(a, b, c)?, Facet::new(c, d, a)?])
    } else {
        Ok([Facet::new(b, c, d)?, Facet::new(d, a, b)?])
    }
}

impl Mesh {
    /// Add the two triangles of a quad as one step.
    pub fn add_quad(&mut self, a: Point3, b: Point3, c: Point3, d: Point3) -> Result<[FacetId; 2]> {
        let ids = self.add_facets(&split_quad(a, b, c, d)?)?;
        Ok([ids[0], ids[1]])
    }

    /// Two-facet mesh covering the quad `a b c d`.
    pub fn quad(a: Point3, b: Point3, c: Point3, d: Point3) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        mesh.add_quad(a, b, c, d)?;
        Ok(mesh)
    }

    /// Ladder of quads between two point chains.
    ///
    /// Rung `g` joins `port[g]` to `starboard[g]`. The chains may differ in
    /// length by one; the extra point is closed off with a single wedge
    /// triangle at the far end.
    pub fn ribbon(port: &[Point3], starboard: &[Point3]) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        mesh.add_ribbon(port, starboard)?;
        Ok(mesh)
    }

    /// Add a [`Mesh::ribbon`] ladder to this mesh.
    pub fn add_ribbon(&mut self, port: &[Point3], starboard: &[Point3]) -> Result<Vec<FacetId>> {
        let common = port.len().min(starboard.len());
        let longer = port.len().max(starboard.len());
        if longer > common + 1 {
            return Err(CribError::InvalidInputCount {
                what: "points in the longer ribbon chain",
                expected: common + 1,
                found: longer,
            });
        }
        if common == 0 || longer < 2 {
            return Err(CribError::InvalidInputCount {
                what: "points in each ribbon chain",
                expected: 2,
                found: common,
            });
        }

        let mut facets = Vec::with_capacity(2 * common);
        for g in 1..common {
            facets.extend(split_quad(port[g - 1], port[g], starboard[g], starboard[g - 1])?);
        }
        let n = common - 1;
        if port.len() > common {
            facets.push(Facet::new(port[n], port[common], starboard[n])?);
        } else if starboard.len() > common {
            facets.push(Facet::new(port[n], starboard[common], starboard[n])?);
        }
        self.add_facets(&facets)
    }
}
