pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod space;

/// Re-export common types for easier usage
pub use crate::core::{AgentHandle, Allocator, BodyHandle, ColliderId, Simulation, SimulationConfig, SpaceConfig};
pub use crate::bodies::{AgentController, Body, BodyFlags, Material};
pub use crate::shapes::{Aabb, BoxShape, ImplicitPlane, Obb};
pub use crate::space::{Space, VoxelRef};
pub use crate::math::{Direction, Vector3, Vector3i};

/// Error types for the voxel engine
pub mod error {
    use crate::core::{AgentHandle, BodyHandle};
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum VoxelError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Body not found: {0}")]
        BodyNotFound(BodyHandle),

        #[error("Agent not found: {0}")]
        AgentNotFound(AgentHandle),

        #[error("Out of bounds: {0}")]
        OutOfBounds(String),

        #[error("Allocation failed: {0}")]
        AllocationFailed(String),
    }
}

/// Result type for voxel engine operations
pub type Result<T> = std::result::Result<T, error::VoxelError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
