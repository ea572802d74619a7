use crate::error::VoxelError;
use crate::math::{Vector3, Vector3i};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the simulation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Constant acceleration applied to bodies and agents
    pub gravity: Vector3,

    /// Largest time step a single call to `simulate` integrates
    pub dt_cap: f32,

    /// Global softening factor for friction impulses
    pub friction_factor: f32,

    /// Relative speed under which an upward contact puts a body to sleep
    /// and over which a sleeping partner is woken
    pub sleep_velocity_threshold: f32,

    /// Ray offset used by box-vs-plane face tests
    pub skin_width: f32,

    /// Slabs created per allocator pool batch
    pub pool_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, -9.81, 0.0),
            dt_cap: 1.0 / 60.0,
            friction_factor: 0.15,
            sleep_velocity_threshold: 0.5,
            skin_width: 0.005,
            pool_capacity: crate::core::allocator::DEFAULT_POOL_CAPACITY,
        }
    }
}

impl SimulationConfig {
    pub fn with_gravity(mut self, gravity: Vector3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_dt_cap(mut self, dt_cap: f32) -> Self {
        self.dt_cap = dt_cap;
        self
    }

    pub fn with_friction_factor(mut self, friction_factor: f32) -> Self {
        self.friction_factor = friction_factor;
        self
    }

    pub fn with_sleep_velocity_threshold(mut self, threshold: f32) -> Self {
        self.sleep_velocity_threshold = threshold;
        self
    }

    pub fn with_skin_width(mut self, skin_width: f32) -> Self {
        self.skin_width = skin_width;
        self
    }

    pub fn with_pool_capacity(mut self, pool_capacity: usize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    /// Checks that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.dt_cap > 0.0) {
            return Err(VoxelError::InvalidParameter(format!(
                "dt_cap must be positive, got {}",
                self.dt_cap
            )));
        }
        if self.friction_factor < 0.0 {
            return Err(VoxelError::InvalidParameter(format!(
                "friction_factor must not be negative, got {}",
                self.friction_factor
            )));
        }
        if self.skin_width < 0.0 {
            return Err(VoxelError::InvalidParameter(format!(
                "skin_width must not be negative, got {}",
                self.skin_width
            )));
        }
        if self.pool_capacity == 0 {
            return Err(VoxelError::InvalidParameter("pool_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// Layout of the chunked voxel world
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SpaceConfig {
    /// Voxels along each edge of a chunk
    pub chunk_size: u32,

    /// World position of the low corner of chunk (0, 0, 0)
    pub anchor: Vector3i,

    /// Chunks along X and along Z
    pub horizontal_chunks: u32,

    /// Chunks along Y
    pub vertical_chunks: u32,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            chunk_size: 16,
            anchor: Vector3i::new(-64, -64, -64),
            horizontal_chunks: 8,
            vertical_chunks: 8,
        }
    }
}

impl SpaceConfig {
    pub fn new(chunk_size: u32, anchor: Vector3i, horizontal_chunks: u32, vertical_chunks: u32) -> Self {
        Self { chunk_size, anchor, horizontal_chunks, vertical_chunks }
    }

    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_anchor(mut self, anchor: Vector3i) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn with_horizontal_chunks(mut self, count: u32) -> Self {
        self.horizontal_chunks = count;
        self
    }

    pub fn with_vertical_chunks(mut self, count: u32) -> Self {
        self.vertical_chunks = count;
        self
    }

    /// Total number of chunk slots
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.horizontal_chunks as usize * self.vertical_chunks as usize * self.horizontal_chunks as usize
    }

    /// World-space extent covered by the space
    pub fn extent(&self) -> Vector3 {
        let n = self.chunk_size as f32;
        Vector3::new(
            self.horizontal_chunks as f32 * n,
            self.vertical_chunks as f32 * n,
            self.horizontal_chunks as f32 * n,
        )
    }

    /// Checks that every dimension is non-zero and the voxel index fits in a u32
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(VoxelError::InvalidParameter("chunk_size must be at least 1".into()));
        }
        if self.horizontal_chunks == 0 || self.vertical_chunks == 0 {
            return Err(VoxelError::InvalidParameter(format!(
                "space needs at least one chunk per axis, got {}x{}x{}",
                self.horizontal_chunks, self.vertical_chunks, self.horizontal_chunks
            )));
        }
        let voxels = (self.chunk_size as u64).pow(3);
        if voxels > u32::MAX as u64 || self.chunk_count() as u64 > u32::MAX as u64 {
            return Err(VoxelError::InvalidParameter(format!(
                "chunk_size {} is too large",
                self.chunk_size
            )));
        }
        Ok(())
    }
}
