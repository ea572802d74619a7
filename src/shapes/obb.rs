use crate::math::{Direction, Frame, Quaternion, Vector3};
use crate::shapes::aabb::{cross_section, face_plane};
use crate::shapes::{Aabb, ImplicitPlane};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Corner of a box, named by its side along each local axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Octant {
    LeftDownBack = 0,
    RightDownBack = 1,
    LeftDownForward = 2,
    RightDownForward = 3,
    LeftUpBack = 4,
    RightUpBack = 5,
    LeftUpForward = 6,
    RightUpForward = 7,
}

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant::LeftDownBack,
        Octant::RightDownBack,
        Octant::LeftDownForward,
        Octant::RightDownForward,
        Octant::LeftUpBack,
        Octant::RightUpBack,
        Octant::LeftUpForward,
        Octant::RightUpForward,
    ];

    /// Sign of the corner along each local axis
    #[inline]
    pub fn signs(self) -> Vector3 {
        let i = self as u8;
        let pick = |bit: u8| if i & bit != 0 { 1.0 } else { -1.0 };
        Vector3::new(pick(1), pick(4), pick(2))
    }
}

/// Oriented box.
///
/// `bounds` is the conservative axis-aligned box around the rotated shape.
/// The eight corners are cached and refreshed lazily after a move or turn.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Obb {
    bounds: Aabb,
    half_extents: Vector3,
    rotation: Quaternion,
    frame: Frame,
    vertices: [Vector3; 8],
    vertices_dirty: bool,
}

impl Obb {
    pub fn new(position: Vector3, half_extents: Vector3, rotation: Quaternion) -> Self {
        let rotation = rotation.normalize();
        let mut obb = Self {
            bounds: Aabb::new(position, half_extents),
            half_extents: Aabb::new(position, half_extents).half_extents(),
            rotation,
            frame: rotation.to_frame(),
            vertices: [position; 8],
            vertices_dirty: true,
        };
        obb.update_bounds();
        obb
    }

    /// Unrotated box matching an AABB
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.position(), aabb.half_extents(), Quaternion::identity())
    }

    fn update_bounds(&mut self) {
        let h = self.half_extents;
        let r = self.frame.right.abs();
        let u = self.frame.up.abs();
        let f = self.frame.forward.abs();
        let bound_extents = Vector3::new(
            r.x * h.x + u.x * h.y + f.x * h.z,
            r.y * h.x + u.y * h.y + f.y * h.z,
            r.z * h.x + u.z * h.y + f.z * h.z,
        );
        self.bounds = Aabb::new(self.bounds.position(), bound_extents);
        self.vertices_dirty = true;
    }

    #[inline]
    pub fn position(&self) -> Vector3 {
        self.bounds.position()
    }

    /// Half extents along the box's own axes
    #[inline]
    pub fn half_extents(&self) -> Vector3 {
        self.half_extents
    }

    #[inline]
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Conservative world-aligned bound
    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[inline]
    pub fn low(&self) -> Vector3 {
        self.bounds.low()
    }

    #[inline]
    pub fn high(&self) -> Vector3 {
        self.bounds.high()
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.bounds.set_position(position);
        self.vertices_dirty = true;
    }

    pub fn translate(&mut self, translation: Vector3) {
        self.bounds.translate(translation);
        self.vertices_dirty = true;
    }

    pub fn set_half_extents(&mut self, half_extents: Vector3) {
        self.half_extents = Aabb::new(Vector3::zero(), half_extents).half_extents();
        self.update_bounds();
    }

    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.rotation = rotation.normalize();
        self.frame = self.rotation.to_frame();
        self.update_bounds();
    }

    /// Applies `rotation` on top of the current orientation
    pub fn rotate(&mut self, rotation: Quaternion) {
        self.rotation.rotate(rotation);
        self.frame = self.rotation.to_frame();
        self.update_bounds();
    }

    /// Corner positions, without touching the cache
    pub fn compute_vertices(&self) -> [Vector3; 8] {
        let mut vertices = [Vector3::zero(); 8];
        for octant in Octant::ALL {
            let s = octant.signs().component_mul(&self.half_extents);
            vertices[octant as usize] = self.position() + self.frame.world_direction(s);
        }
        vertices
    }

    /// Cached corners in [`Octant`] order, refreshed if the box moved
    pub fn vertices(&mut self) -> &[Vector3; 8] {
        if self.vertices_dirty {
            self.vertices = self.compute_vertices();
            self.vertices_dirty = false;
        }
        &self.vertices
    }

    pub fn vertex(&mut self, octant: Octant) -> Vector3 {
        self.vertices()[octant as usize]
    }

    pub fn contains_point(&self, point: Vector3) -> bool {
        let local = self.frame.local_position(point, self.position()).abs();
        local.all_le(&self.half_extents)
    }

    /// Area of the face perpendicular to the local axis `dir`
    pub fn cross_section(&self, dir: Direction) -> f32 {
        cross_section(self.half_extents, dir)
    }

    /// The face on local side `dir` as a bounded plane whose normal points outward
    pub fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane {
        face_plane(self.position(), self.half_extents, &self.frame, dir)
    }
}

impl Default for Obb {
    fn default() -> Self {
        Self::new(Vector3::zero(), Vector3::half(), Quaternion::identity())
    }
}
