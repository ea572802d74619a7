pub mod allocator;
pub mod list;
pub mod config;
pub mod storage;
pub mod simulation;

pub use self::allocator::{Allocator, ObjectPool, Slab};
pub use self::list::{List, ListIter};
pub use self::config::{SimulationConfig, SpaceConfig};
pub use self::storage::{AgentStorage, BodyStorage, SlotStorage, Storage};
pub use self::simulation::Simulation;

use std::fmt;

/// A unique identifier for a rigid body in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub(crate) u32);

/// A unique identifier for an agent controller in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentHandle(pub(crate) u32);

/// Identity of a box registered in the voxel space.
///
/// Voxels keep sorted lists of these as non-owning back-references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ColliderId(pub u32);

impl From<BodyHandle> for ColliderId {
    fn from(handle: BodyHandle) -> Self {
        ColliderId(handle.0)
    }
}

impl From<ColliderId> for BodyHandle {
    fn from(id: ColliderId) -> Self {
        BodyHandle(id.0)
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "body #{}", self.0)
    }
}

impl fmt::Display for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "agent #{}", self.0)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "collider #{}", self.0)
    }
}
