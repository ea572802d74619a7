mod aabb;
mod obb;
mod plane;
mod edge;
mod shape;

pub use self::aabb::Aabb;
pub use self::obb::{Obb, Octant};
pub use self::plane::ImplicitPlane;
pub use self::edge::Edge;
pub use self::shape::{BoxShape, Shape};
