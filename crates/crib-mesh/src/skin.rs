//! Facet skins over a surface: ribbon ladders between point chains.

use crib_core::{CribError, Result};
use crib_geometry::{Surface, SurfaceCurve};
use crib_math::Point3;
use crib_topology::Mesh;
use log::debug;

/// `stations + 1` evenly spaced points along the line of constant `u`,
/// each lifted `offset` along the surface normal.
pub fn iso_chain(surface: &dyn Surface, u: f64, stations: usize, offset: f64) -> Result<Vec<Point3>> {
    if stations == 0 {
        return Err(CribError::InvalidInputCount {
            what: "chain stations",
            expected: 1,
            found: 0,
        });
    }
    (0..=stations)
        .map(|k| surface.offset_point(u, k as f64 / stations as f64, offset))
        .collect()
}

/// Facet skin of the whole patch: `columns + 1` iso-u chains joined by
/// ribbons and stitched together with [`Mesh::merge`].
///
/// Facets wind with the surface normal.
pub fn skin_mesh(surface: &dyn Surface, columns: usize, stations: usize, offset: f64) -> Result<Mesh> {
    if columns == 0 {
        return Err(CribError::InvalidInputCount {
            what: "skin columns",
            expected: 1,
            found: 0,
        });
    }
    let chains = (0..=columns)
        .map(|c| iso_chain(surface, c as f64 / columns as f64, stations, offset))
        .collect::<Result<Vec<_>>>()?;

    let mut skin = Mesh::new();
    for pair in chains.windows(2) {
        skin.merge(Mesh::ribbon(&pair[1], &pair[0])?)?;
    }
    debug!(
        "skin {}x{}: {} facets, {} boundary edges",
        columns,
        stations,
        skin.facet_count(),
        skin.boundary_edges().len()
    );
    Ok(skin)
}

/// Strip of facets standing under a surface curve: one chain on the curve,
/// the other `depth` below it against the surface normal, sampled at
/// `steps + 1` even parameter stations.
pub fn curve_strip(curve: &SurfaceCurve<'_>, steps: usize, depth: f64) -> Result<Mesh> {
    if steps == 0 {
        return Err(CribError::InvalidInputCount {
            what: "strip steps",
            expected: 1,
            found: 0,
        });
    }
    let surface = curve.surface();
    let mut top = Vec::with_capacity(steps + 1);
    let mut bottom = Vec::with_capacity(steps + 1);
    for t in curve.stations(steps) {
        let p = curve.point_at(t)?;
        top.push(surface.point_at(p.u, p.v)?);
        bottom.push(surface.offset_point(p.u, p.v, -depth)?);
    }
    Mesh::ribbon(&top, &bottom)
}
