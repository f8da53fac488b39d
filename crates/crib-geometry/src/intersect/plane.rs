use crib_core::{CribError, Result};
use crib_math::{Plane, Point3};
use log::{debug, trace, warn};

use super::SolverConfig;
use crate::curve::{arc_length_fractions, SurfaceCurve};
use crate::surface::Surface;
use crate::uv::{ParamPoint, ParamVector};

/// Fractions of a curve's active range probed by [`plane_crossing_range`].
pub const CROSSING_SCAN_FRACTIONS: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Corners of the unit square, walked in boundary order.
const CORNERS: [ParamPoint; 4] = [
    ParamPoint::new(0.0, 0.0),
    ParamPoint::new(1.0, 0.0),
    ParamPoint::new(1.0, 1.0),
    ParamPoint::new(0.0, 1.0),
];

/// Result of testing the patch boundary against a plane.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeCrossings {
    /// Corners lie on both sides of the plane.
    pub split: bool,
    /// Refined crossing on each boundary edge whose ends straddle the plane,
    /// plus any corner lying on the plane of a split patch.
    pub points: Vec<ParamPoint>,
}

/// First sub-range of the curve, between two of the scan fractions, whose
/// ends straddle the plane. Crossings between samples can be missed.
///
/// A sample lying exactly on the plane comes back as the one-point range
/// `(t, t)`.
pub fn plane_crossing_range(curve: &SurfaceCurve<'_>, plane: &Plane) -> Result<Option<(f64, f64)>> {
    let (low, high) = curve.range();
    let mut previous: Option<(f64, f64)> = None;
    for fraction in CROSSING_SCAN_FRACTIONS {
        let t = if fraction >= 1.0 {
            high
        } else {
            low + (high - low) * fraction
        };
        let distance = plane.signed_distance(curve.position_at(t)?);
        if distance == 0.0 {
            return Ok(Some((t, t)));
        }
        if let Some((t_prev, d_prev)) = previous {
            if d_prev * distance < 0.0 {
                return Ok(Some((t_prev, t)));
            }
        }
        previous = Some((t, distance));
    }
    Ok(None)
}

/// Shrink a bracket `s ∈ [0, 1]` around the plane crossing of `eval(s)`.
///
/// Returns the interpolated zero of the signed distance once the 3-D ends of
/// the bracket are closer than `accuracy`.
fn refine_bracket<F>(eval: F, plane: &Plane, accuracy: f64, config: &SolverConfig) -> Result<f64>
where
    F: Fn(f64) -> Result<Point3>,
{
    let (mut s0, mut s1) = (0.0, 1.0);
    let (mut p0, mut p1) = (eval(s0)?, eval(s1)?);
    let (mut d0, mut d1) = (plane.signed_distance(p0), plane.signed_distance(p1));
    if d0 == 0.0 {
        return Ok(s0);
    }
    if d1 == 0.0 {
        return Ok(s1);
    }
    if d0 * d1 > 0.0 {
        return Err(CribError::NotBracketed {
            distance_a: d0,
            distance_b: d1,
        });
    }

    let divisions = config.refine_divisions.max(2);
    for iteration in 0..=config.max_refine_iterations {
        if (p1 - p0).length() < accuracy {
            trace!("plane bracket closed after {iteration} refinements");
            return Ok(s0 + (s1 - s0) * d0 / (d0 - d1));
        }
        if iteration == config.max_refine_iterations {
            break;
        }

        let mut prev = (s0, p0, d0);
        for k in 1..=divisions {
            let next = if k == divisions {
                (s1, p1, d1)
            } else {
                let s = s0 + (s1 - s0) * k as f64 / divisions as f64;
                let p = eval(s)?;
                (s, p, plane.signed_distance(p))
            };
            if next.2 == 0.0 {
                return Ok(next.0);
            }
            if prev.2 * next.2 < 0.0 {
                (s0, p0, d0) = prev;
                (s1, p1, d1) = next;
                break;
            }
            prev = next;
        }
    }

    Err(CribError::Convergence {
        iterations: config.max_refine_iterations,
    })
}

/// Locate where the parameter segment `a`–`b` crosses the plane.
///
/// `a` and `b` must map to opposite sides of the plane. The segment is cut
/// into `refine_divisions` pieces per step and the straddling piece kept.
pub fn refine_point_on_plane(
    surface: &dyn Surface,
    plane: &Plane,
    a: ParamPoint,
    b: ParamPoint,
    accuracy: f64,
    config: &SolverConfig,
) -> Result<ParamPoint> {
    let along = |s: f64| if s >= 1.0 { b } else { a.lerp(b, s) };
    let s = refine_bracket(|s| surface.point_at_param(along(s)), plane, accuracy, config)?;
    Ok(along(s))
}

/// Locate where `curve` crosses the plane, if the coarse scan finds a flip.
pub fn refine_curve_crossing(
    curve: &SurfaceCurve<'_>,
    plane: &Plane,
    accuracy: f64,
    config: &SolverConfig,
) -> Result<Option<ParamPoint>> {
    let Some((t0, t1)) = plane_crossing_range(curve, plane)? else {
        return Ok(None);
    };
    let at = |s: f64| (t0 + (t1 - t0) * s).clamp(t0, t1);
    let s = refine_bracket(|s| curve.position_at(at(s)), plane, accuracy, config)?;
    curve.point_at(at(s)).map(Some)
}

/// Find where the plane cuts the patch boundary.
///
/// Corners lying exactly on the plane count for neither side. When the other
/// corners are split, such a corner is itself a crossing and is listed once.
pub fn classify_edge_crossings(
    surface: &dyn Surface,
    plane: &Plane,
    accuracy: f64,
    config: &SolverConfig,
) -> Result<EdgeCrossings> {
    let mut distances = [0.0; 4];
    for (d, &corner) in distances.iter_mut().zip(CORNERS.iter()) {
        *d = plane.signed_distance(surface.point_at_param(corner)?);
    }
    let above = distances.iter().filter(|&&d| d > 0.0).count();
    let below = distances.iter().filter(|&&d| d < 0.0).count();
    let split = above > 0 && below > 0;

    let mut points = Vec::new();
    for i in 0..4 {
        if split && distances[i] == 0.0 {
            points.push(CORNERS[i]);
        }
        let j = (i + 1) % 4;
        if distances[i] * distances[j] < 0.0 {
            points.push(refine_point_on_plane(surface, plane, CORNERS[i], CORNERS[j], accuracy, config)?);
        }
    }

    debug!("plane corners {above} above, {below} below, {} edge crossings", points.len());
    Ok(EdgeCrossings { split, points })
}

/// Pair of points either side of `station`, across the walk direction, that
/// straddle the plane.
fn bracket_near(
    surface: &dyn Surface,
    plane: &Plane,
    station: ParamPoint,
    lateral: ParamVector,
    config: &SolverConfig,
) -> Result<Option<(ParamPoint, ParamPoint)>> {
    for reach in 1..=config.lateral_reaches {
        let offset = lateral * (config.lateral_offset * reach as f64);
        let left = (station + -offset).clamped();
        let right = (station + offset).clamped();
        let d_left = plane.signed_distance(surface.point_at_param(left)?);
        let d_right = plane.signed_distance(surface.point_at_param(right)?);
        if d_left * d_right < 0.0 {
            return Ok(Some((left, right)));
        }
    }
    Ok(None)
}

/// Fit a curve along the cut of the plane across the patch.
///
/// Needs exactly two boundary crossings, otherwise returns `None`. Walks
/// `plane_walk_steps` stations between them, brackets and refines the cut
/// beside each station, then fits through the chain points one and two
/// thirds of the way along at their arc-length fractions.
pub fn intersect_with_plane<'a>(
    surface: &'a dyn Surface,
    plane: &Plane,
    accuracy: f64,
    config: &SolverConfig,
) -> Result<Option<SurfaceCurve<'a>>> {
    let crossings = classify_edge_crossings(surface, plane, accuracy, config)?;
    let [start, end] = crossings.points[..] else {
        debug!("plane cut skipped: {} boundary crossings", crossings.points.len());
        return Ok(None);
    };

    let across = end - start;
    if across.is_zero() {
        debug!("plane cut skipped: crossings coincide at {start:?}");
        return Ok(None);
    }
    let lateral = ParamVector::new(-across.j, across.i).normalize();

    let steps = config.plane_walk_steps.max(1);
    let mut chain = Vec::with_capacity(steps + 1);
    chain.push(start);
    for step in 1..steps {
        let station = start.lerp(end, step as f64 / steps as f64);
        match bracket_near(surface, plane, station, lateral, config)? {
            Some((left, right)) => {
                chain.push(refine_point_on_plane(surface, plane, left, right, accuracy, config)?)
            }
            None => warn!("no plane crossing beside station {station:?}, skipped"),
        }
    }
    chain.push(end);

    if chain.len() < 4 {
        return Err(CribError::InvalidInputCount {
            what: "plane cut points",
            expected: 4,
            found: chain.len(),
        });
    }

    let fractions = arc_length_fractions(surface, &chain)?;
    let last = chain.len() - 1;
    let (i1, i2) = (last / 3, 2 * last / 3);
    let curve = SurfaceCurve::fit(
        surface,
        &[chain[0], chain[i1], chain[i2], chain[last]],
        (fractions[i1], fractions[i2]),
    )?;
    debug!("plane cut fitted through {} chain points", chain.len());
    Ok(Some(curve))
}
