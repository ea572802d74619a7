use crate::math::{Direction, Frame, Vector3};
use crate::shapes::ImplicitPlane;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Axis-aligned box.
///
/// `low` and `high` are always `position ∓ half_extents`; every mutator
/// recomputes them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    position: Vector3,
    half_extents: Vector3,
    low: Vector3,
    high: Vector3,
}

impl Aabb {
    /// Creates a box centered at `position`. Negative extents are clamped to zero.
    pub fn new(position: Vector3, half_extents: Vector3) -> Self {
        let mut aabb = Self {
            position,
            half_extents: clamp_extents(half_extents),
            low: position,
            high: position,
        };
        aabb.update_bounds();
        aabb
    }

    /// Creates an AABB centered at a position with the given half extents
    #[inline]
    pub fn from_center_half_extents(center: Vector3, half_extents: Vector3) -> Self {
        Self::new(center, half_extents)
    }

    /// Creates the box spanning two corners
    pub fn from_low_high(low: Vector3, high: Vector3) -> Self {
        let low_c = low.component_min(&high);
        let high_c = low.component_max(&high);
        let position = (low_c + high_c) * 0.5;
        Self {
            position,
            half_extents: high_c - position,
            low: low_c,
            high: high_c,
        }
    }

    #[inline]
    fn update_bounds(&mut self) {
        self.low = self.position - self.half_extents;
        self.high = self.position + self.half_extents;
    }

    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    #[inline]
    pub fn half_extents(&self) -> Vector3 {
        self.half_extents
    }

    #[inline]
    pub fn low(&self) -> Vector3 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> Vector3 {
        self.high
    }

    /// Full edge lengths
    #[inline]
    pub fn size(&self) -> Vector3 {
        self.half_extents * 2.0
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
        self.update_bounds();
    }

    pub fn translate(&mut self, translation: Vector3) {
        self.position += translation;
        self.update_bounds();
    }

    pub fn set_half_extents(&mut self, half_extents: Vector3) {
        self.half_extents = clamp_extents(half_extents);
        self.update_bounds();
    }

    /// Grows the box to cover `other` as well
    pub fn expand_to_include(&mut self, other: &Aabb) {
        *self = Self::from_low_high(self.low.component_min(&other.low), self.high.component_max(&other.high));
    }

    /// Touching boxes count as intersecting
    pub fn is_intersecting(&self, other: &Aabb) -> bool {
        self.low.x <= other.high.x && self.high.x >= other.low.x
            && self.low.y <= other.high.y && self.high.y >= other.low.y
            && self.low.z <= other.high.z && self.high.z >= other.low.z
    }

    /// Points on the surface count as inside
    pub fn contains_point(&self, point: Vector3) -> bool {
        self.low.all_le(&point) && point.all_le(&self.high)
    }

    /// Overlap of the two boxes, or None when some axis does not overlap
    pub fn intersection_region(&self, other: &Aabb) -> Option<Aabb> {
        let low = self.low.component_max(&other.low);
        let high = self.high.component_min(&other.high);
        if low.all_le(&high) {
            Some(Self::from_low_high(low, high))
        } else {
            None
        }
    }

    /// Copy grown by `margin` on every side
    pub fn skinned(&self, margin: f32) -> Aabb {
        Self::new(self.position, self.half_extents + Vector3::splat(margin))
    }

    /// Area of the face perpendicular to `dir`
    pub fn cross_section(&self, dir: Direction) -> f32 {
        cross_section(self.half_extents, dir)
    }

    /// The face on side `dir` as a bounded plane whose normal points outward
    pub fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane {
        face_plane(self.position, self.half_extents, &Frame::identity(), dir)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vector3::zero(), Vector3::half())
    }
}

#[inline]
fn clamp_extents(half_extents: Vector3) -> Vector3 {
    Vector3::new(half_extents.x.max(0.0), half_extents.y.max(0.0), half_extents.z.max(0.0))
}

pub(crate) fn cross_section(half_extents: Vector3, dir: Direction) -> f32 {
    match dir {
        Direction::Right | Direction::Left => 2.0 * half_extents.y * half_extents.z,
        Direction::Up | Direction::Down => 2.0 * half_extents.x * half_extents.z,
        Direction::Forward | Direction::Back => 2.0 * half_extents.x * half_extents.y,
    }
}

/// Face of a box with the given axes, expressed as a bounded plane.
///
/// The plane normal is the face's outward axis; the in-plane axes keep the
/// box's remaining axes in (right, up, forward) order.
pub(crate) fn face_plane(position: Vector3, half_extents: Vector3, axes: &Frame, dir: Direction) -> ImplicitPlane {
    let (r, u, f) = (axes.right, axes.up, axes.forward);
    let h = half_extents;
    match dir {
        Direction::Right => ImplicitPlane::from_frame(position + r * h.x, Frame::new(u, r, f), h.y, h.z),
        Direction::Left => ImplicitPlane::from_frame(position - r * h.x, Frame::new(u, -r, f), h.y, h.z),
        Direction::Up => ImplicitPlane::from_frame(position + u * h.y, Frame::new(r, u, f), h.x, h.z),
        Direction::Down => ImplicitPlane::from_frame(position - u * h.y, Frame::new(r, -u, f), h.x, h.z),
        Direction::Forward => ImplicitPlane::from_frame(position + f * h.z, Frame::new(r, f, u), h.x, h.y),
        Direction::Back => ImplicitPlane::from_frame(position - f * h.z, Frame::new(r, -f, u), h.x, h.y),
    }
}
