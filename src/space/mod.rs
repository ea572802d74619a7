//! Voxel world: dense chunks inside a sparse, bounded space.
//!
//! Boxes are indexed by registering them on every voxel they overlap. Each
//! voxel keeps a sorted list of [`ColliderId`](crate::core::ColliderId)s and
//! each [`Collider`] keeps per-chunk lists of the [`VoxelRef`]s it touches, so
//! either side can be walked without scanning the world.

mod voxel;
mod grid;
mod collider;
mod space;

pub use self::voxel::{Voxel, VoxelRef};
pub use self::grid::Grid;
pub use self::collider::Collider;
pub use self::space::{RegionSample, Space};
