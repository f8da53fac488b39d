use crib_core::error::{CribError, Result};
use crib_core::traits::Validate;

use super::mesh::Mesh;

impl Validate for Mesh {
    fn validate(&self) -> Result<()> {
        // 1. Every owner of every edge exists
        for (edge_id, edge) in self.edges() {
            if edge.owner_count() == 0 {
                return Err(CribError::Geometry(format!("Edge {:?} has no owning facet", edge_id)));
            }
            for owner in edge.owners() {
                if self.facet(owner).is_none() {
                    return Err(CribError::Geometry(format!(
                        "Edge {:?} is owned by missing facet {:?}",
                        edge_id, owner
                    )));
                }
            }
        }

        // 2. Every facet edge is registered and names the facet as an owner
        for (facet_id, facet) in self.facets() {
            for (a, b) in facet.edges() {
                let edge = self.find_edge(a, b).ok_or_else(|| {
                    CribError::Geometry(format!(
                        "Facet {:?} edge {} -> {} is not registered",
                        facet_id, a, b
                    ))
                })?;
                if !edge.owners().any(|owner| owner == facet_id) {
                    return Err(CribError::Geometry(format!(
                        "Facet {:?} is missing from the owners of edge {} -> {}",
                        facet_id, a, b
                    )));
                }
            }
        }

        // 3. Owner slots add up to three per facet
        let claimed: usize = self.edges().map(|(_, e)| e.owner_count()).sum();
        if claimed != 3 * self.facet_count() {
            return Err(CribError::Geometry(format!(
                "{} edge claims for {} facets",
                claimed,
                self.facet_count()
            )));
        }

        Ok(())
    }
}
