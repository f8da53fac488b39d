use crib_core::traits::BoundingBox;
use crib_math::Point3;

use super::mesh::Mesh;

impl BoundingBox for Mesh {
    type Point = Point3;

    fn bounding_box(&self) -> (Point3, Point3) {
        let extent = self
            .facets()
            .map(|(_, f)| f.extent())
            .reduce(|a, b| a.merge(&b));
        match extent {
            Some(e) => (e.min, e.max),
            None => (Point3::ZERO, Point3::ZERO),
        }
    }
}
