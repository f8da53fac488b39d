//! Polyline extraction from surface curves.

use crib_core::{CribError, Result};
use crib_math::Point3;

use crate::curve::SurfaceCurve;
use crate::surface::Surface;

/// Chord points of a curve within `max_crown` of the true curve.
pub fn curve_to_polyline(curve: &SurfaceCurve<'_>, max_crown: f64) -> Result<Vec<Point3>> {
    Ok(curve.subdivide(max_crown)?.collect())
}

/// Evenly spaced iso-parametric curves: `count + 1` lines of constant `u`
/// followed by `count + 1` lines of constant `v`.
pub fn iso_curves(surface: &dyn Surface, count: usize) -> Result<Vec<SurfaceCurve<'_>>> {
    if count == 0 {
        return Err(CribError::InvalidInputCount {
            what: "iso bands",
            expected: 1,
            found: 0,
        });
    }
    let levels = (0..=count).map(|k| k as f64 / count as f64);
    let mut curves = Vec::with_capacity(2 * (count + 1));
    for level in levels.clone() {
        curves.push(SurfaceCurve::iso_u(surface, level)?);
    }
    for level in levels {
        curves.push(SurfaceCurve::iso_v(surface, level)?);
    }
    Ok(curves)
}

/// Wireframe of the patch as crown-bounded polylines along [`iso_curves`].
pub fn iso_polylines(surface: &dyn Surface, count: usize, max_crown: f64) -> Result<Vec<Vec<Point3>>> {
    iso_curves(surface, count)?
        .iter()
        .map(|curve| curve_to_polyline(curve, max_crown))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{bowl, flat};

    #[test]
    fn test_flat_wireframe_is_straight() {
        let s = flat();
        let lines = iso_polylines(&s, 4, 0.001).unwrap();
        assert_eq!(lines.len(), 10);
        for line in &lines {
            assert_eq!(line.len(), 2);
        }
        assert!(lines[1][0].abs_diff_eq(Point3::new(0.25, 0.0, 0.0), 1e-12));
        assert!(lines[6][1].abs_diff_eq(Point3::new(1.0, 0.25, 0.0), 1e-12));
    }

    #[test]
    fn test_curved_wireframe_needs_more_points() {
        let s = bowl();
        let coarse = iso_polylines(&s, 3, 0.05).unwrap();
        let fine = iso_polylines(&s, 3, 0.001).unwrap();
        let count = |lines: &Vec<Vec<Point3>>| lines.iter().map(Vec::len).sum::<usize>();
        assert!(count(&fine) > count(&coarse));
    }

    #[test]
    fn test_zero_bands_rejected() {
        assert!(iso_curves(&flat(), 0).is_err());
    }
}
