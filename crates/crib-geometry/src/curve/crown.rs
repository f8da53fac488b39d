//! Chord-deviation ("crown") subdivision of sampled curves.

use crib_math::{Line, Point3};

/// Largest perpendicular distance from the interior points to the chord
/// joining the first and last point.
///
/// When the chord collapses, distances are measured from the first point.
pub fn crown(points: &[Point3]) -> f64 {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    let interior = points.iter().skip(1).take(points.len().saturating_sub(2));
    match Line::through(first, last) {
        Ok(chord) => interior.map(|&p| chord.distance_to_point(p)).fold(0.0, f64::max),
        Err(_) => interior.map(|&p| (p - first).length()).fold(0.0, f64::max),
    }
}

/// Lazy sequence of chord vertices over a fixed set of curve samples.
///
/// Yields the first sample, then greedily the farthest sample whose window
/// stays within the crown limit, and finally the last sample. Cloning or
/// calling [`CrownSubdivision::restart`] replays the same sequence.
#[derive(Debug, Clone)]
pub struct CrownSubdivision {
    samples: Vec<Point3>,
    max_crown: f64,
    head: usize,
    started: bool,
    finished: bool,
}

impl CrownSubdivision {
    pub fn new(samples: Vec<Point3>, max_crown: f64) -> Self {
        Self {
            samples,
            max_crown,
            head: 0,
            started: false,
            finished: false,
        }
    }

    /// The dense samples the vertices are chosen from.
    pub fn samples(&self) -> &[Point3] {
        &self.samples
    }

    pub fn max_crown(&self) -> f64 {
        self.max_crown
    }

    pub fn restart(&mut self) {
        self.head = 0;
        self.started = false;
        self.finished = false;
    }
}

impl Iterator for CrownSubdivision {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        if self.finished || self.samples.is_empty() {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.samples[0]);
        }

        let last = self.samples.len() - 1;
        if self.head >= last {
            self.finished = true;
            return None;
        }

        for tail in self.head + 2..=last {
            if crown(&self.samples[self.head..=tail]) > self.max_crown {
                self.head = tail - 1;
                return Some(self.samples[self.head]);
            }
        }

        self.head = last;
        self.finished = true;
        Some(self.samples[last])
    }
}
