use crate::collision::{collide_aabb, AabbContact};
use crate::core::{ColliderId, List};
use crate::math::{Vector3, Vector3i};
use crate::shapes::{Aabb, Shape};

/// Stable address of a voxel: the chunk slot it lives in and its index inside the chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VoxelRef {
    pub chunk: u32,
    pub index: u32,
}

impl VoxelRef {
    pub const fn new(chunk: u32, index: u32) -> Self {
        Self { chunk, index }
    }
}

/// A unit cell of a chunk
#[derive(Debug, Clone)]
pub struct Voxel {
    offset: Vector3i,
    low: Vector3,
    chunk: u32,
    index: u32,
    occupied: bool,

    /// Colliders whose box overlaps this cell, sorted by id
    pub(crate) colliders: List<ColliderId>,
}

impl Voxel {
    pub(crate) fn new(offset: Vector3i, chunk_low: Vector3i, chunk: u32, index: u32) -> Self {
        Self {
            offset,
            low: Vector3::from(chunk_low + offset),
            chunk,
            index,
            occupied: false,
            colliders: List::new(),
        }
    }

    /// Coordinates inside the chunk
    #[inline]
    pub fn offset(&self) -> Vector3i {
        self.offset
    }

    /// World position of the low corner
    #[inline]
    pub fn low(&self) -> Vector3 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> Vector3 {
        self.low + Vector3::one()
    }

    #[inline]
    pub fn mid_point(&self) -> Vector3 {
        self.low + Vector3::half()
    }

    #[inline]
    pub fn chunk(&self) -> u32 {
        self.chunk
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[inline]
    pub fn voxel_ref(&self) -> VoxelRef {
        VoxelRef::new(self.chunk, self.index)
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    pub(crate) fn set_occupied(&mut self, occupied: bool) {
        self.occupied = occupied;
    }

    /// Handle to the sorted list of colliders overlapping this cell
    #[inline]
    pub fn colliders(&self) -> List<ColliderId> {
        self.colliders
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_low_high(self.low, self.high())
    }

    /// Contact for moving `shape` out of this cell
    pub fn contact(&self, shape: &dyn Shape) -> Option<AabbContact> {
        collide_aabb(shape, &self.to_aabb())
    }
}
