mod body;
mod agent;
mod material;

pub use self::body::Body;
pub use self::agent::AgentController;
pub use self::material::Material;
pub use self::body_flags::BodyFlags;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
        pub struct BodyFlags: u32 {
            /// Body is currently sleeping
            const SLEEPING = 0x01;

            /// Body is affected by gravity
            const USE_GRAVITY = 0x02;
        }
    }
}
