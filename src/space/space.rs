use crate::core::{Allocator, ColliderId, List, SpaceConfig};
use crate::error::VoxelError;
use crate::math::{Direction, Vector3, Vector3i};
use crate::shapes::Aabb;
use crate::space::{Collider, Grid, Voxel, VoxelRef};
use crate::Result;

use log::{debug, warn};

/// Result of sampling a box against the space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSample {
    /// Occupied voxels overlapped by the box, grouped by chunk
    pub voxels: Vec<VoxelRef>,

    /// Colliders registered on any voxel the box touches, sorted and unique
    pub colliders: Vec<ColliderId>,
}

/// Sparse set of chunks covering a bounded volume.
///
/// The volume starts at `anchor` and spans `horizontal × vertical × horizontal`
/// chunk slots. Slots stay empty until a voxel is set or a collider is
/// inserted there.
#[derive(Debug)]
pub struct Space {
    config: SpaceConfig,
    chunks: Vec<Option<Box<Grid>>>,
}

impl Space {
    /// Creates an empty space
    pub fn new(config: SpaceConfig) -> Result<Self> {
        config.validate()?;
        let mut chunks = Vec::new();
        chunks.resize_with(config.chunk_count(), || None);
        Ok(Self { config, chunks })
    }

    #[inline]
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    #[inline]
    pub fn chunk_size(&self) -> u32 {
        self.config.chunk_size
    }

    #[inline]
    pub fn anchor(&self) -> Vector3i {
        self.config.anchor
    }

    /// Number of chunks that have been allocated
    pub fn allocated_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_some()).count()
    }

    /// World-space box covered by the whole space
    pub fn bounds(&self) -> Aabb {
        let low = Vector3::from(self.config.anchor);
        Aabb::from_low_high(low, low + self.config.extent())
    }

    // === Chunk addressing ===

    /// Whether a chunk coordinate lies inside the space
    pub fn validate_chunk_coord(&self, coord: Vector3i) -> bool {
        let h = self.config.horizontal_chunks as i32;
        let v = self.config.vertical_chunks as i32;
        (0..h).contains(&coord.x) && (0..v).contains(&coord.y) && (0..h).contains(&coord.z)
    }

    /// Slot index of a chunk coordinate
    pub fn chunk_index(&self, coord: Vector3i) -> Option<u32> {
        if !self.validate_chunk_coord(coord) {
            return None;
        }
        let h = self.config.horizontal_chunks;
        let v = self.config.vertical_chunks;
        Some(coord.x as u32 + coord.y as u32 * h + coord.z as u32 * h * v)
    }

    /// Chunk coordinate of a slot index
    pub fn chunk_coordinates(&self, index: u32) -> Vector3i {
        let h = self.config.horizontal_chunks;
        let layer = h * self.config.vertical_chunks;
        let z = index / layer;
        let y = (index % layer) / h;
        let x = index % h;
        Vector3i::new(x as i32, y as i32, z as i32)
    }

    /// World position of a chunk's low corner
    pub fn chunk_low(&self, coord: Vector3i) -> Vector3i {
        self.config.anchor + coord * self.config.chunk_size as i32
    }

    /// Chunk coordinate containing a world position, valid or not
    pub fn chunk_coord_of(&self, position: Vector3) -> Vector3i {
        let local = Vector3i::floor(position - Vector3::from(self.config.anchor));
        local.div_euclid(self.config.chunk_size as i32)
    }

    /// Inclusive range of chunk coordinates a box overlaps, clamped to the space
    pub fn chunk_range(&self, aabb: &Aabb) -> Option<(Vector3i, Vector3i)> {
        let anchor = Vector3::from(self.config.anchor);
        let extent = self.config.extent();
        let low = aabb.low() - anchor;
        let high = aabb.high() - anchor;

        if low.x > extent.x || low.y > extent.y || low.z > extent.z {
            return None;
        }
        if high.x < 0.0 || high.y < 0.0 || high.z < 0.0 {
            return None;
        }

        let n = self.config.chunk_size as i32;
        let last = Vector3i::new(
            self.config.horizontal_chunks as i32 - 1,
            self.config.vertical_chunks as i32 - 1,
            self.config.horizontal_chunks as i32 - 1,
        );
        let from = Vector3i::floor(low).div_euclid(n).component_max(&Vector3i::zero());
        let to = Vector3i::floor(high).div_euclid(n).component_min(&last);

        if from.x > to.x || from.y > to.y || from.z > to.z {
            return None;
        }
        Some((from, to))
    }

    fn chunk_indices_in(&self, aabb: &Aabb) -> Vec<u32> {
        let Some((from, to)) = self.chunk_range(aabb) else {
            return Vec::new();
        };

        let mut indices = Vec::new();
        for z in from.z..=to.z {
            for y in from.y..=to.y {
                for x in from.x..=to.x {
                    if let Some(index) = self.chunk_index(Vector3i::new(x, y, z)) {
                        indices.push(index);
                    }
                }
            }
        }
        indices
    }

    /// Allocated chunks overlapping a box
    pub fn sample_chunks(&self, aabb: &Aabb) -> Vec<u32> {
        let mut indices = self.chunk_indices_in(aabb);
        indices.retain(|&index| self.grid(index).is_some());
        indices
    }

    // === Chunk access ===

    #[inline]
    pub fn grid(&self, index: u32) -> Option<&Grid> {
        self.chunks.get(index as usize)?.as_deref()
    }

    #[inline]
    pub fn grid_mut(&mut self, index: u32) -> Option<&mut Grid> {
        self.chunks.get_mut(index as usize)?.as_deref_mut()
    }

    /// Chunk containing a world position, if allocated
    pub fn grid_at(&self, position: Vector3) -> Option<&Grid> {
        let index = self.chunk_index(self.chunk_coord_of(position))?;
        self.grid(index)
    }

    pub fn is_chunk_occupied(&self, coord: Vector3i) -> bool {
        self.chunk_index(coord).map_or(false, |index| self.grid(index).is_some())
    }

    /// Allocates the chunk at `coord` if needed. Returns false for coordinates outside the space.
    pub fn set_chunk_occupied(&mut self, coord: Vector3i) -> bool {
        match self.chunk_index(coord) {
            Some(index) => {
                self.ensure_chunk(index);
                true
            }
            None => false,
        }
    }

    fn ensure_chunk(&mut self, index: u32) -> Option<&mut Grid> {
        let coord = self.chunk_coordinates(index);
        let low = self.chunk_low(coord);
        let size = self.config.chunk_size;

        let slot = self.chunks.get_mut(index as usize)?;
        if slot.is_none() {
            debug!("allocating chunk {} at {}", coord, low);
        }
        let grid: &mut Grid = slot.get_or_insert_with(|| Box::new(Grid::new(size, low, index)));
        Some(grid)
    }

    /// Copies the occupancy of `source` into the chunk at `coord`.
    ///
    /// Colliders registered on the target chunk stay registered.
    pub fn insert_chunk(&mut self, coord: Vector3i, source: &Grid) -> Result<()> {
        let index = self
            .chunk_index(coord)
            .ok_or_else(|| VoxelError::OutOfBounds(format!("chunk {} is outside the space", coord)))?;
        if source.size() != self.config.chunk_size {
            return Err(VoxelError::InvalidParameter(format!(
                "chunk size {} does not match space chunk size {}",
                source.size(),
                self.config.chunk_size
            )));
        }

        let Some(grid) = self.ensure_chunk(index) else {
            return Err(VoxelError::OutOfBounds(format!("chunk {} is outside the space", coord)));
        };
        for voxel in source.voxels() {
            if voxel.is_occupied() {
                grid.set_occupied(voxel.index());
            } else {
                grid.set_unoccupied(voxel.index());
            }
        }
        Ok(())
    }

    // === Voxel access ===

    /// Address of the voxel containing a world position, if its chunk is allocated
    pub fn voxel_at(&self, position: Vector3) -> Option<VoxelRef> {
        let grid = self.grid_at(position)?;
        let index = grid.index_at(position)?;
        Some(VoxelRef::new(grid.chunk_index(), index))
    }

    #[inline]
    pub fn voxel(&self, voxel: VoxelRef) -> Option<&Voxel> {
        self.grid(voxel.chunk)?.voxel(voxel.index)
    }

    pub fn is_occupied(&self, voxel: VoxelRef) -> bool {
        self.voxel(voxel).map_or(false, Voxel::is_occupied)
    }

    pub fn is_voxel_occupied(&self, position: Vector3) -> bool {
        self.voxel_at(position).map_or(false, |v| self.is_occupied(v))
    }

    /// Marks the voxel containing a world position solid, allocating its chunk on demand.
    /// Returns whether the voxel changed.
    pub fn set_voxel_occupied(&mut self, position: Vector3) -> bool {
        let coord = self.chunk_coord_of(position);
        let Some(index) = self.chunk_index(coord) else {
            warn!("voxel at {} lies outside the space", position);
            return false;
        };

        let Some(grid) = self.ensure_chunk(index) else {
            return false;
        };
        match grid.index_at(position) {
            Some(voxel) => grid.set_occupied(voxel),
            None => false,
        }
    }

    /// Clears the voxel containing a world position. Returns whether the voxel changed.
    pub fn set_voxel_unoccupied(&mut self, position: Vector3) -> bool {
        let coord = self.chunk_coord_of(position);
        let Some(index) = self.chunk_index(coord) else {
            warn!("voxel at {} lies outside the space", position);
            return false;
        };

        let Some(grid) = self.grid_mut(index) else {
            return false;
        };
        match grid.index_at(position) {
            Some(voxel) => grid.set_unoccupied(voxel),
            None => false,
        }
    }

    /// Marks every voxel overlapped by a box solid; returns how many changed
    pub fn fill_region(&mut self, aabb: &Aabb) -> usize {
        let mut changed = 0;
        for index in self.chunk_indices_in(aabb) {
            if let Some(grid) = self.ensure_chunk(index) {
                for voxel in grid.sample_region(aabb) {
                    if grid.set_occupied(voxel) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Chunk and voxel coordinates one step from `index` in `dir`.
    ///
    /// Leaving the chunk moves to the adjacent chunk coordinate and wraps the
    /// voxel coordinate to the opposite face. Neither result is validated.
    pub fn move_index(&self, index: u32, chunk_coord: Vector3i, dir: Direction) -> (Vector3i, Vector3i) {
        let n = self.config.chunk_size as i32;
        let n_u = self.config.chunk_size;
        let local = Vector3i::new(
            (index % n_u) as i32,
            ((index % (n_u * n_u)) / n_u) as i32,
            (index / (n_u * n_u)) as i32,
        );

        let mut voxel = local + dir.to_offset();
        let mut chunk = chunk_coord;
        for (v, c) in [(&mut voxel.x, &mut chunk.x), (&mut voxel.y, &mut chunk.y), (&mut voxel.z, &mut chunk.z)] {
            if *v < 0 {
                *v = n - 1;
                *c -= 1;
            } else if *v >= n {
                *v = 0;
                *c += 1;
            }
        }
        (chunk, voxel)
    }

    /// The voxel adjacent to `voxel` in `dir`, if it lies inside the space
    pub fn neighbour(&self, voxel: VoxelRef, dir: Direction) -> Option<VoxelRef> {
        let coord = self.chunk_coordinates(voxel.chunk);
        let (chunk, local) = self.move_index(voxel.index, coord, dir);
        let chunk = self.chunk_index(chunk)?;
        let n = self.config.chunk_size as i32;
        Some(VoxelRef::new(chunk, (local.x + local.y * n + local.z * n * n) as u32))
    }

    /// Whether the neighbour of `voxel` in `dir` is in bounds and solid
    pub fn is_neighbour_occupied(&self, voxel: VoxelRef, dir: Direction) -> bool {
        self.neighbour(voxel, dir).map_or(false, |n| self.is_occupied(n))
    }

    // === Colliders ===

    /// Registers a box on every voxel it overlaps, allocating chunks on demand.
    ///
    /// A collider that is already registered is removed first, so its voxels
    /// always match the latest box.
    pub fn insert_collider(&mut self, alloc: &mut Allocator, collider: &mut Collider, aabb: &Aabb) -> Result<()> {
        let id = collider.id();
        if collider.is_registered() {
            warn!("{} inserted twice, re-registering", id);
            self.remove_collider(alloc, collider);
        }

        for index in self.chunk_indices_in(aabb) {
            let Some(grid) = self.ensure_chunk(index) else {
                continue;
            };

            let mut membership = List::with_id(index);
            if let Err(err) = grid.insert_collider(alloc, id, aabb, &mut membership) {
                grid.remove_collider(alloc, id, &mut membership);
                return Err(err);
            }
            if membership.is_empty() {
                continue;
            }
            match collider.chunks.insert_sorted_unique(alloc, membership) {
                Ok(true) => {}
                Ok(false) => membership.free(alloc),
                Err(err) => {
                    grid.remove_collider(alloc, id, &mut membership);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Unregisters a collider from every voxel it was registered on
    pub fn remove_collider(&mut self, alloc: &mut Allocator, collider: &mut Collider) {
        let id = collider.id();
        for mut membership in collider.chunks.to_vec(alloc) {
            match self.grid_mut(membership.id) {
                Some(grid) => grid.remove_collider(alloc, id, &mut membership),
                None => membership.free(alloc),
            }
        }
        collider.chunks.free(alloc);
    }

    /// Re-registers a collider for its current box
    pub fn update_collider(&mut self, alloc: &mut Allocator, collider: &mut Collider, aabb: &Aabb) -> Result<()> {
        self.remove_collider(alloc, collider);
        self.insert_collider(alloc, collider, aabb)
    }

    /// Colliders registered on a single voxel, sorted by id
    pub fn colliders_at(&self, alloc: &Allocator, voxel: VoxelRef) -> Vec<ColliderId> {
        self.voxel(voxel).map_or_else(Vec::new, |v| v.colliders().to_vec(alloc))
    }

    /// Occupied voxels and registered colliders overlapping a box
    pub fn sample_occupied_region(&self, alloc: &mut Allocator, aabb: &Aabb) -> Result<RegionSample> {
        let mut voxels = Vec::new();
        let mut colliders = List::new();
        let mut sampled = Ok(());
        for index in self.sample_chunks(aabb) {
            if let Some(grid) = self.grid(index) {
                sampled = grid.sample_occupied_with_colliders(alloc, aabb, &mut voxels, &mut colliders);
                if sampled.is_err() {
                    break;
                }
            }
        }

        let ids = colliders.to_vec(alloc);
        colliders.free(alloc);
        sampled.map(|_| RegionSample { voxels, colliders: ids })
    }
}
