use std::collections::HashMap;

use crib_core::error::{CribError, Result};
use crib_math::{Point3, Transform};
use log::debug;
use slotmap::{SecondaryMap, SlotMap};

use super::types::*;

/// Triangles plus a map from each undirected edge to the facets using it.
///
/// No edge may be used by more than two facets. Every mutating call checks
/// all of its edges before touching the mesh, so a rejected call leaves the
/// mesh unchanged. Mutation needs `&mut self`; concurrent readers are fine
/// once building is done.
#[derive(Debug, Clone)]
pub struct Mesh {
    epsilon: f64,
    facets: SlotMap<FacetId, Facet>,
    edges: SlotMap<EdgeId, EdgeRecord>,
    edge_index: HashMap<EdgeKey, EdgeId>,
}

impl Mesh {
    /// Edge-matching grid spacing, suited to models in millimetres.
    pub const DEFAULT_EPSILON: f64 = 0.01;

    pub fn new() -> Self {
        Self::with_epsilon(Self::DEFAULT_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        debug_assert!(epsilon > 0.0, "edge epsilon must be positive, got {epsilon}");
        Self {
            epsilon,
            facets: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            edge_index: HashMap::new(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn facet_count(&self) -> usize {
        self.facets.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    pub fn facet(&self, id: FacetId) -> Option<&Facet> {
        self.facets.get(id)
    }

    pub fn facets(&self) -> impl Iterator<Item = (FacetId, &Facet)> {
        self.facets.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeRecord)> {
        self.edges.iter()
    }

    pub fn edge_key(&self, a: Point3, b: Point3) -> EdgeKey {
        EdgeKey::new(a, b, self.epsilon)
    }

    /// The record for the undirected edge between `a` and `b`, if any facet uses it.
    pub fn find_edge(&self, a: Point3, b: Point3) -> Option<&EdgeRecord> {
        let id = self.edge_index.get(&self.edge_key(a, b))?;
        self.edges.get(*id)
    }

    fn owners_of(&self, key: &EdgeKey) -> usize {
        self.edge_index
            .get(key)
            .and_then(|&id| self.edges.get(id))
            .map_or(0, EdgeRecord::owner_count)
    }

    /// Check that adding `claims` (edge end points and owner count) keeps
    /// every edge at two owners or fewer.
    fn check_claims<I>(&self, claims: I) -> Result<Vec<EdgeKey>>
    where
        I: IntoIterator<Item = (Point3, Point3, usize)>,
    {
        let mut pending: HashMap<EdgeKey, usize> = HashMap::new();
        let mut keys = Vec::new();
        for (a, b, count) in claims {
            let key = self.edge_key(a, b);
            if key.is_collapsed() {
                return Err(CribError::CoincidentPoints(a));
            }
            let claimed = pending.entry(key).or_insert(0);
            *claimed += count;
            if self.owners_of(&key) + *claimed > 2 {
                return Err(CribError::EdgeOverflow { a, b });
            }
            keys.push(key);
        }
        Ok(keys)
    }

    fn register(&mut self, key: EdgeKey, a: Point3, b: Point3, owner: FacetId) {
        match self.edge_index.get(&key) {
            Some(&id) => {
                let attached = self.edges[id].attach(owner);
                debug_assert!(attached, "edge claims are checked before registering");
            }
            None => {
                let id = self.edges.insert(EdgeRecord::new(a, b, owner));
                self.edge_index.insert(key, id);
            }
        }
    }

    fn insert_checked(&mut self, facet: Facet, keys: &[EdgeKey]) -> FacetId {
        let id = self.facets.insert(facet);
        for (&key, (a, b)) in keys.iter().zip(facet.edges()) {
            self.register(key, a, b, id);
        }
        id
    }

    /// Add a facet, registering its three edges.
    ///
    /// Fails with [`CribError::EdgeOverflow`] if any edge already has two
    /// owners; nothing is registered in that case.
    pub fn add_facet(&mut self, facet: Facet) -> Result<FacetId> {
        let keys = self.check_claims(facet.edges().map(|(a, b)| (a, b, 1)))?;
        Ok(self.insert_checked(facet, &keys))
    }

    /// Validate three points as a facet and add it.
    pub fn add_points(&mut self, a: Point3, b: Point3, c: Point3) -> Result<FacetId> {
        self.add_facet(Facet::new(a, b, c)?)
    }

    /// Add several facets as one all-or-nothing step.
    pub fn add_facets(&mut self, facets: &[Facet]) -> Result<Vec<FacetId>> {
        let keys = self.check_claims(
            facets
                .iter()
                .flat_map(|f| f.edges())
                .map(|(a, b)| (a, b, 1)),
        )?;
        Ok(facets
            .iter()
            .zip(keys.chunks_exact(3))
            .map(|(&facet, chunk)| self.insert_checked(facet, chunk))
            .collect())
    }

    /// Stitch `other` into this mesh.
    ///
    /// Edges already present here gain the incoming facet as second owner;
    /// new edges are inserted. Edges are re-keyed with this mesh's epsilon.
    /// Fails without modifying `self` if any edge would exceed two owners.
    pub fn merge(&mut self, other: Mesh) -> Result<()> {
        self.check_claims(other.edges.values().map(|e| (e.a, e.b, e.owner_count())))?;

        let incoming_facets = other.facets.len();
        let mut remap: SecondaryMap<FacetId, FacetId> = SecondaryMap::new();
        for (old_id, facet) in other.facets {
            remap.insert(old_id, self.facets.insert(facet));
        }
        for edge in other.edges.values() {
            let key = self.edge_key(edge.a, edge.b);
            for owner in edge.owners() {
                if let Some(&id) = remap.get(owner) {
                    self.register(key, edge.a, edge.b, id);
                }
            }
        }
        debug!(
            "merged {incoming_facets} facets: {} facets, {} edges",
            self.facets.len(),
            self.edges.len()
        );
        Ok(())
    }

    /// Edges used by exactly one facet: the open border of the mesh.
    pub fn boundary_edges(&self) -> Vec<&EdgeRecord> {
        self.edges.values().filter(|e| e.is_boundary()).collect()
    }

    /// Edges used by two facets.
    pub fn shared_edges(&self) -> Vec<&EdgeRecord> {
        self.edges.values().filter(|e| e.is_shared()).collect()
    }

    /// Copy of the mesh with every facet moved by `transform`.
    pub fn transformed(&self, transform: &Transform) -> Result<Mesh> {
        let moved = self
            .facets
            .values()
            .map(|f| f.transformed(transform))
            .collect::<Result<Vec<_>>>()?;
        let mut mesh = Mesh::with_epsilon(self.epsilon);
        mesh.add_facets(&moved)?;
        Ok(mesh)
    }

    /// Shared vertex list and triangle indices, merging points that fall in
    /// the same epsilon cell.
    pub fn to_indexed(&self) -> (Vec<Point3>, Vec<usize>) {
        let mut points = Vec::new();
        let mut lookup: HashMap<[i64; 3], usize> = HashMap::new();
        let mut indices = Vec::with_capacity(self.facets.len() * 3);
        for facet in self.facets.values() {
            for p in facet.vertices() {
                let index = *lookup.entry(quantize(p, self.epsilon)).or_insert_with(|| {
                    points.push(p);
                    points.len() - 1
                });
                indices.push(index);
            }
        }
        (points, indices)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
