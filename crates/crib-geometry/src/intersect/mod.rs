//! Iterative intersection of surfaces with lines and planes.

mod plane;

use crib_core::{CribError, Result, Tolerance};
use crib_math::{Line, Point3, Vector3};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::surface::Surface;
use crate::uv::ParamPoint;

pub use plane::{
    classify_edge_crossings, intersect_with_plane, plane_crossing_range, refine_curve_crossing,
    refine_point_on_plane, EdgeCrossings, CROSSING_SCAN_FRACTIONS,
};

/// Iteration caps, tolerances, and search geometry for the solvers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Newton steps allowed in [`line_surface_intersect`]
    pub max_newton_iterations: usize,
    /// Bracket refinements allowed in [`refine_point_on_plane`]
    pub max_refine_iterations: usize,
    /// 3-D distance at which a line/surface solve counts as converged
    pub tolerance: f64,
    /// Starting parameters for the Newton iteration
    pub seed: ParamPoint,
    /// Sub-segments per bracket refinement
    pub refine_divisions: usize,
    /// Steps walked between the two boundary crossings of a plane cut
    pub plane_walk_steps: usize,
    /// Parameter distance of one sideways reach from a walk station
    pub lateral_offset: f64,
    /// Sideways reaches tried at each walk station before it is skipped
    pub lateral_reaches: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_newton_iterations: 25,
            max_refine_iterations: 8,
            tolerance: Tolerance::DEFAULT_LINEAR,
            seed: ParamPoint::new(0.5, 0.5),
            refine_divisions: 5,
            plane_walk_steps: 20,
            lateral_offset: 0.08,
            lateral_reaches: 12,
        }
    }
}

/// Progress of a Newton-style solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    Searching,
    Converged,
    OutOfRange,
    ExhaustedIterations,
}

/// Where a line pierces a surface.
#[derive(Debug, Clone, Copy)]
pub struct LineHit {
    pub point: Point3,
    pub param: ParamPoint,
    pub iterations: usize,
}

/// Vector from the surface point at `param` to its foot on `line`.
pub fn error_to_line(surface: &dyn Surface, param: ParamPoint, line: &Line) -> Result<Vector3> {
    let approx = surface.point_at_param(param)?;
    Ok(line.closest_point(approx) - approx)
}

/// Find the surface point lying on `line` by damped single-axis Newton steps.
///
/// Each step resolves the residual along the unit partial derivatives and
/// moves only the parameter with the larger error. A step leaving the unit
/// square ends the solve with [`CribError::ParameterOutOfRange`]; running out
/// of steps ends it with [`CribError::Convergence`].
pub fn line_surface_intersect(surface: &dyn Surface, line: &Line, config: &SolverConfig) -> Result<LineHit> {
    let mut param = config.seed;
    let mut state = SolverState::Searching;
    let mut iterations = 0;
    let mut stray = ("u", param.u);

    while state == SolverState::Searching {
        let error = error_to_line(surface, param, line)?;
        trace!("newton {iterations}: {param:?} residual {}", error.length());
        if error.length() < config.tolerance {
            state = SolverState::Converged;
            break;
        }
        if iterations == config.max_newton_iterations {
            state = SolverState::ExhaustedIterations;
            break;
        }

        let du = surface.partial_u(param.u, param.v)?;
        let dv = surface.partial_v(param.u, param.v)?;
        let (len_u, len_v) = (du.length(), dv.length());
        let tol = Tolerance::default();
        if tol.is_zero_length(len_u) || tol.is_zero_length(len_v) {
            return Err(CribError::DegenerateNormal {
                u: param.u,
                v: param.v,
            });
        }
        let error_u = error.dot(du / len_u);
        let error_v = error.dot(dv / len_v);

        if error_u.abs() > error_v.abs() {
            param.u += error_u / len_u;
            stray = ("u", param.u);
        } else {
            param.v += error_v / len_v;
            stray = ("v", param.v);
        }
        iterations += 1;

        if !param.is_in_domain() {
            state = SolverState::OutOfRange;
        }
    }

    match state {
        SolverState::Converged => {
            debug!("line/surface solve converged at {param:?} after {iterations} steps");
            Ok(LineHit {
                point: surface.point_at_param(param)?,
                param,
                iterations,
            })
        }
        SolverState::OutOfRange => Err(CribError::out_of_unit(stray.0, stray.1)),
        _ => Err(CribError::Convergence {
            iterations: config.max_newton_iterations,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::{bowl, flat};
    use crib_math::dvec3;

    #[test]
    fn test_recovers_normal_line_foot() {
        let s = bowl();
        for seed in [ParamPoint::new(0.0, 0.0), ParamPoint::new(0.5, 0.5)] {
            let config = SolverConfig {
                seed,
                ..SolverConfig::default()
            };
            for &(u, v) in &[(0.3, 0.7), (0.5, 0.5), (0.25, 0.4), (0.8, 0.2), (0.6, 0.9), (0.1, 0.1)] {
                let base = s.point_at(u, v).unwrap();
                let normal = s.normal_at(u, v).unwrap();
                let line = Line::new(base + normal * 0.4, normal).unwrap();
                let hit = line_surface_intersect(&s, &line, &config).unwrap();
                assert!(
                    hit.param.distance(ParamPoint::new(u, v)) < 1e-5,
                    "seed {seed:?}: ({u}, {v}) -> {:?}",
                    hit.param
                );
                assert!(line.distance_to_point(hit.point) < config.tolerance);
                assert!(hit.iterations <= config.max_newton_iterations);
            }
        }
    }

    #[test]
    fn test_corner_seed_agrees() {
        let s = bowl();
        let line = Line::new(dvec3(-0.55, 0.3, 2.0), dvec3(0.2, -0.15, 0.6)).unwrap();
        let mid = line_surface_intersect(&s, &line, &SolverConfig::default()).unwrap();
        let corner = SolverConfig {
            seed: ParamPoint::new(0.0, 0.0),
            ..SolverConfig::default()
        };
        let from_corner = line_surface_intersect(&s, &line, &corner).unwrap();
        assert!(mid.param.distance(from_corner.param) < 1e-5);
        assert!((mid.param.u - 0.16733).abs() < 1e-3);
        assert!((mid.param.v - 0.64586).abs() < 1e-3);
    }

    #[test]
    fn test_line_missing_patch_leaves_domain() {
        let s = flat();
        let line = Line::new(dvec3(3.0, 0.5, 1.0), dvec3(0.0, 0.0, 1.0)).unwrap();
        assert!(matches!(
            line_surface_intersect(&s, &line, &SolverConfig::default()),
            Err(CribError::ParameterOutOfRange { name: "u", .. })
        ));
    }

    #[test]
    fn test_iteration_cap() {
        let s = bowl();
        let line = Line::new(dvec3(-0.55, 0.3, 2.0), dvec3(0.2, -0.15, 0.6)).unwrap();
        let starved = SolverConfig {
            max_newton_iterations: 2,
            ..SolverConfig::default()
        };
        assert!(matches!(
            line_surface_intersect(&s, &line, &starved),
            Err(CribError::Convergence { iterations: 2 })
        ));
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"max_newton_iterations": 40}"#).unwrap();
        assert_eq!(config.max_newton_iterations, 40);
        assert_eq!(config.max_refine_iterations, 8);
        assert_eq!(config.plane_walk_steps, 20);
    }
}
