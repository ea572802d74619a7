//! Dense voxel storage for a single chunk.
//!
//! A grid of size N owns N³ voxels addressed by `x + y·N + z·N²` and keeps a
//! separate list of the occupied ones, so walking solid cells never has to
//! scan the whole array.

use crate::core::{Allocator, ColliderId, List};
use crate::math::{Direction, Vector3, Vector3i};
use crate::shapes::Aabb;
use crate::space::{Voxel, VoxelRef};
use crate::Result;

/// A chunk of N×N×N unit voxels
#[derive(Debug, Clone)]
pub struct Grid {
    size: u32,
    low: Vector3i,
    chunk: u32,
    voxels: Vec<Voxel>,
    occupied: Vec<u32>,
}

impl Grid {
    /// Creates an empty grid whose low corner sits at `low`
    pub fn new(size: u32, low: Vector3i, chunk: u32) -> Self {
        let n = size as usize;
        let mut voxels = Vec::with_capacity(n * n * n);
        for index in 0..(n * n * n) as u32 {
            let offset = coordinates_in(size, index);
            voxels.push(Voxel::new(offset, low, chunk, index));
        }

        Self {
            size,
            low,
            chunk,
            voxels,
            occupied: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// World position of the low corner
    #[inline]
    pub fn low(&self) -> Vector3i {
        self.low
    }

    /// Slot of this grid in its space
    #[inline]
    pub fn chunk_index(&self) -> u32 {
        self.chunk
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    /// World-space box covered by the grid
    pub fn bounds(&self) -> Aabb {
        let low = Vector3::from(self.low);
        Aabb::from_low_high(low, low + Vector3::splat(self.size as f32))
    }

    /// Linear index of local coordinates; the coordinates must be valid
    #[inline]
    pub fn index_of(&self, coords: Vector3i) -> u32 {
        let n = self.size as i32;
        (coords.x + coords.y * n + coords.z * n * n) as u32
    }

    /// Local coordinates of a linear index
    #[inline]
    pub fn coordinates(&self, index: u32) -> Vector3i {
        coordinates_in(self.size, index)
    }

    /// Whether local coordinates lie inside the grid
    #[inline]
    pub fn validate_coords(&self, coords: Vector3i) -> bool {
        let n = self.size as i32;
        (0..n).contains(&coords.x) && (0..n).contains(&coords.y) && (0..n).contains(&coords.z)
    }

    /// Index of the voxel containing a world position
    pub fn index_at(&self, position: Vector3) -> Option<u32> {
        let coords = Vector3i::floor(position - Vector3::from(self.low));
        self.validate_coords(coords).then(|| self.index_of(coords))
    }

    #[inline]
    pub fn voxel(&self, index: u32) -> Option<&Voxel> {
        self.voxels.get(index as usize)
    }

    #[inline]
    pub(crate) fn voxel_mut(&mut self, index: u32) -> Option<&mut Voxel> {
        self.voxels.get_mut(index as usize)
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    #[inline]
    pub fn is_occupied(&self, index: u32) -> bool {
        self.voxel(index).map_or(false, Voxel::is_occupied)
    }

    /// Marks a voxel solid; returns false if it already was or the index is invalid
    pub fn set_occupied(&mut self, index: u32) -> bool {
        match self.voxels.get_mut(index as usize) {
            Some(voxel) if !voxel.is_occupied() => {
                voxel.set_occupied(true);
                self.occupied.push(index);
                true
            }
            _ => false,
        }
    }

    /// Clears a voxel; returns false if it was already empty or the index is invalid
    pub fn set_unoccupied(&mut self, index: u32) -> bool {
        match self.voxels.get_mut(index as usize) {
            Some(voxel) if voxel.is_occupied() => {
                voxel.set_occupied(false);
                if let Some(slot) = self.occupied.iter().position(|&i| i == index) {
                    self.occupied.swap_remove(slot);
                }
                true
            }
            _ => false,
        }
    }

    /// Indices of all occupied voxels
    #[inline]
    pub fn occupied_voxels(&self) -> &[u32] {
        &self.occupied
    }

    /// Neighbouring index inside this grid, if there is one
    pub fn move_index(&self, index: u32, dir: Direction) -> Option<u32> {
        let coords = self.coordinates(index) + dir.to_offset();
        self.validate_coords(coords).then(|| self.index_of(coords))
    }

    /// Inclusive range of local coordinates overlapped by a world-space box.
    ///
    /// Cell `i` covers the half-open span `[i, i + 1)` while the box is closed,
    /// so a box whose high face touches a cell's low face overlaps that cell
    /// and a box whose low face touches a cell's high face does not. This is
    /// stricter than [`Aabb::is_intersecting`]: a box resting exactly on top of
    /// a voxel is not registered on it.
    pub fn voxel_range(&self, aabb: &Aabb) -> Option<(Vector3i, Vector3i)> {
        let low = Vector3::from(self.low);
        let n = self.size as f32;
        let local_low = aabb.low() - low;
        let local_high = aabb.high() - low;

        if local_low.x > n || local_low.y > n || local_low.z > n {
            return None;
        }
        if local_high.x < 0.0 || local_high.y < 0.0 || local_high.z < 0.0 {
            return None;
        }

        let last = Vector3i::new(self.size as i32 - 1, self.size as i32 - 1, self.size as i32 - 1);
        let from = Vector3i::floor(local_low).component_max(&Vector3i::zero());
        let to = Vector3i::floor(local_high).component_min(&last);

        if from.x > to.x || from.y > to.y || from.z > to.z {
            return None;
        }
        Some((from, to))
    }

    /// Indices of every voxel the box overlaps
    pub fn sample_region(&self, aabb: &Aabb) -> Vec<u32> {
        let mut indices = Vec::new();
        self.for_each_in(aabb, |index| indices.push(index));
        indices
    }

    /// Indices of the occupied voxels the box overlaps
    pub fn sample_occupied_region(&self, aabb: &Aabb) -> Vec<u32> {
        let mut indices = Vec::new();
        self.for_each_in(aabb, |index| {
            if self.is_occupied(index) {
                indices.push(index);
            }
        });
        indices
    }

    /// Occupied voxels the box overlaps, plus every collider registered on any voxel it touches
    pub(crate) fn sample_occupied_with_colliders(
        &self,
        alloc: &mut Allocator,
        aabb: &Aabb,
        voxels: &mut Vec<VoxelRef>,
        colliders: &mut List<ColliderId>,
    ) -> Result<()> {
        for index in self.sample_region(aabb) {
            let Some(voxel) = self.voxel(index) else {
                continue;
            };
            if voxel.is_occupied() {
                voxels.push(voxel.voxel_ref());
            }
            let registered = voxel.colliders().to_vec(alloc);
            for id in registered {
                colliders.insert_sorted_unique(alloc, id)?;
            }
        }
        Ok(())
    }

    /// Registers `id` on every voxel the box overlaps and records them in `membership`
    pub(crate) fn insert_collider(
        &mut self,
        alloc: &mut Allocator,
        id: ColliderId,
        aabb: &Aabb,
        membership: &mut List<VoxelRef>,
    ) -> Result<()> {
        let chunk = self.chunk;
        for index in self.sample_region(aabb) {
            if let Some(voxel) = self.voxel_mut(index) {
                membership.insert(alloc, VoxelRef::new(chunk, index))?;
                voxel.colliders.insert_sorted_unique(alloc, id)?;
            }
        }
        Ok(())
    }

    /// Drops `id` from every voxel in `membership` and frees the membership list
    pub(crate) fn remove_collider(&mut self, alloc: &mut Allocator, id: ColliderId, membership: &mut List<VoxelRef>) {
        for voxel_ref in membership.to_vec(alloc) {
            if let Some(voxel) = self.voxel_mut(voxel_ref.index) {
                voxel.colliders.remove_sorted(alloc, &id);
            }
        }
        membership.free(alloc);
    }

    fn for_each_in(&self, aabb: &Aabb, mut visit: impl FnMut(u32)) {
        let Some((from, to)) = self.voxel_range(aabb) else {
            return;
        };
        for z in from.z..=to.z {
            for y in from.y..=to.y {
                for x in from.x..=to.x {
                    visit(self.index_of(Vector3i::new(x, y, z)));
                }
            }
        }
    }
}

fn coordinates_in(size: u32, index: u32) -> Vector3i {
    let n = size;
    let z = index / (n * n);
    let y = (index % (n * n)) / n;
    let x = index % n;
    Vector3i::new(x as i32, y as i32, z as i32)
}
