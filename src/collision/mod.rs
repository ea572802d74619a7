mod contact;
mod contact_manifold;
mod penetration;
pub mod narrow_phase;
pub mod raycast;

pub use self::contact::{AabbContact, ContactKind, ContactPoint};
pub use self::contact_manifold::{Manifold, MAX_CONTACT_POINTS};
pub use self::penetration::PenetrationField;
pub use self::narrow_phase::{
    collide_aabb, collide_box_plane, resolve_aabb_contact, resolve_box_plane_face, NarrowPhase, VoxelNarrowPhase,
};
pub use self::raycast::{raycast_aabb, raycast_box, raycast_implicit_plane, raycast_obb, raycast_plane};
