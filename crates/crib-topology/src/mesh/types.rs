use crib_core::{CribError, Result, Tolerance};
use crib_math::{Aabb3, Point3, Transform, Vector3};
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

// --- SlotMap key types ---

new_key_type! {
    pub struct FacetId;
    pub struct EdgeId;
}

// --- Entity structs ---

/// A validated triangle. Vertex order sets the normal by the right-hand rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    vertices: [Point3; 3],
}

impl Facet {
    /// Build a facet, rejecting repeated or collinear vertices.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Result<Self> {
        let tol = Tolerance::default();
        if tol.is_zero((b - a).length()) {
            return Err(CribError::CoincidentPoints(a));
        }
        if tol.is_zero((c - b).length()) {
            return Err(CribError::CoincidentPoints(b));
        }
        if tol.is_zero((a - c).length()) {
            return Err(CribError::CoincidentPoints(c));
        }
        // Smallest altitude of the triangle.
        let longest = (b - a).length().max((c - b).length()).max((a - c).length());
        if tol.is_zero((b - a).cross(c - b).length() / longest) {
            return Err(CribError::DegenerateTriangle(b));
        }
        Ok(Self { vertices: [a, b, c] })
    }

    pub fn vertices(&self) -> [Point3; 3] {
        self.vertices
    }

    /// Directed edges `a→b`, `b→c`, `c→a`.
    pub fn edges(&self) -> [(Point3, Point3); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// Unit normal from `(b - a) × (c - b)`.
    pub fn normal(&self) -> Vector3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - b).normalize_or_zero()
    }

    /// Same triangle with the opposite winding.
    pub fn reversed(&self) -> Self {
        let [a, b, c] = self.vertices;
        Self { vertices: [a, c, b] }
    }

    pub fn transformed(&self, transform: &Transform) -> Result<Self> {
        let [a, b, c] = self.vertices.map(|p| transform.transform_point(p));
        Self::new(a, b, c)
    }

    pub fn extent(&self) -> Aabb3 {
        let [a, b, c] = self.vertices;
        Aabb3::from_point(a).include(b).include(c)
    }
}

/// Snap a point onto the integer grid of spacing `epsilon`.
pub(crate) fn quantize(p: Point3, epsilon: f64) -> [i64; 3] {
    [p.x, p.y, p.z].map(|x| (x / epsilon).round() as i64)
}

/// Undirected edge identity on a quantized grid; `(a, b)` and `(b, a)` agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    low: [i64; 3],
    high: [i64; 3],
}

impl EdgeKey {
    pub fn new(a: Point3, b: Point3, epsilon: f64) -> Self {
        let (qa, qb) = (quantize(a, epsilon), quantize(b, epsilon));
        if qa <= qb {
            Self { low: qa, high: qb }
        } else {
            Self { low: qb, high: qa }
        }
    }

    /// Both ends fall in the same grid cell.
    pub fn is_collapsed(&self) -> bool {
        self.low == self.high
    }
}

/// An undirected edge and the (at most two) facets using it.
#[derive(Debug, Clone, Copy)]
pub struct EdgeRecord {
    pub a: Point3,
    pub b: Point3,
    owners: [Option<FacetId>; 2],
}

impl EdgeRecord {
    pub(crate) fn new(a: Point3, b: Point3, owner: FacetId) -> Self {
        Self {
            a,
            b,
            owners: [Some(owner), None],
        }
    }

    pub fn owners(&self) -> impl Iterator<Item = FacetId> + '_ {
        self.owners.iter().flatten().copied()
    }

    pub fn owner_count(&self) -> usize {
        self.owners.iter().filter(|o| o.is_some()).count()
    }

    pub fn is_boundary(&self) -> bool {
        self.owner_count() == 1
    }

    pub fn is_shared(&self) -> bool {
        self.owner_count() == 2
    }

    /// Add a second owner. Returns false when both slots are taken.
    pub(crate) fn attach(&mut self, owner: FacetId) -> bool {
        match self.owners.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(owner);
                true
            }
            None => false,
        }
    }
}
