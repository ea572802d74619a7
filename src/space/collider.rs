use crate::core::{Allocator, ColliderId, List};
use crate::space::VoxelRef;

/// Registration record of a box in a [`Space`](crate::space::Space).
///
/// Holds one membership list per chunk the box overlaps, keyed and sorted by
/// chunk slot. The lists live in the allocator, so the owner must hand the
/// record back to [`Space::remove_collider`](crate::space::Space::remove_collider)
/// before dropping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collider {
    id: ColliderId,
    pub(crate) chunks: List<List<VoxelRef>>,
}

impl Collider {
    pub fn new(id: ColliderId) -> Self {
        Self { id, chunks: List::new() }
    }

    #[inline]
    pub fn id(&self) -> ColliderId {
        self.id
    }

    /// Whether any voxel currently references this collider
    #[inline]
    pub fn is_registered(&self) -> bool {
        !self.chunks.is_empty()
    }

    /// Number of chunks the collider is registered in
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Every voxel the collider is registered on, ordered by chunk then index
    pub fn voxels(&self, alloc: &Allocator) -> Vec<VoxelRef> {
        let mut voxels: Vec<VoxelRef> = self
            .chunks
            .iter(alloc)
            .flat_map(|membership| membership.iter(alloc).copied())
            .collect();
        voxels.sort_unstable();
        voxels
    }
}
