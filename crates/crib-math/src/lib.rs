pub mod aabb;
pub mod line;
pub mod plane;
pub mod transform;

pub use glam::{dvec2, dvec3, DAffine3, DMat3, DQuat, DVec2, DVec3};
pub use aabb::{Aabb2, Aabb3};
pub use line::Line;
pub use plane::{Plane, Side};
pub use transform::Transform;

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
