use crate::math::{Direction, Frame, Vector3};
use crate::shapes::{Aabb, ImplicitPlane, Obb};
use std::fmt::Debug;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Capabilities shared by every box the collision code handles
pub trait Shape: Debug {
    /// Returns the type name of the shape
    fn shape_type(&self) -> &'static str;

    /// Center of the box
    fn get_position(&self) -> Vector3;

    /// Half extents along the box's own axes
    fn get_half_extents(&self) -> Vector3;

    /// The box's own axes
    fn get_frame(&self) -> Frame;

    /// World-aligned box enclosing the shape
    fn get_bounds(&self) -> Aabb;

    /// Face on local side `dir` as a bounded plane
    fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane;

    /// Whether `point` lies inside or on the box
    fn contains_point(&self, point: Vector3) -> bool;

    /// Overlap of the world-aligned footprints, or None when they are apart
    fn intersect(&self, other: &dyn Shape) -> Option<Aabb>;

    /// Width of the overlap with `other` along the axis of `dir`, zero when apart
    fn penetration_along_axis(&self, other: &dyn Shape, dir: Direction) -> f32 {
        self.intersect(other)
            .map_or(0.0, |region| 2.0 * region.half_extents().component(dir.axis()))
    }

    /// Returns the volume of the shape
    fn get_volume(&self) -> f32 {
        let h = self.get_half_extents();
        8.0 * h.x * h.y * h.z
    }
}

impl Shape for Aabb {
    fn shape_type(&self) -> &'static str {
        "Aabb"
    }

    fn get_position(&self) -> Vector3 {
        self.position()
    }

    fn get_half_extents(&self) -> Vector3 {
        self.half_extents()
    }

    fn get_frame(&self) -> Frame {
        Frame::identity()
    }

    fn get_bounds(&self) -> Aabb {
        *self
    }

    fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane {
        Aabb::to_implicit_plane(self, dir)
    }

    fn contains_point(&self, point: Vector3) -> bool {
        Aabb::contains_point(self, point)
    }

    fn intersect(&self, other: &dyn Shape) -> Option<Aabb> {
        self.intersection_region(&other.get_bounds())
    }
}

impl Shape for Obb {
    fn shape_type(&self) -> &'static str {
        "Obb"
    }

    fn get_position(&self) -> Vector3 {
        self.position()
    }

    fn get_half_extents(&self) -> Vector3 {
        self.half_extents()
    }

    fn get_frame(&self) -> Frame {
        *self.frame()
    }

    fn get_bounds(&self) -> Aabb {
        *self.bounds()
    }

    fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane {
        Obb::to_implicit_plane(self, dir)
    }

    fn contains_point(&self, point: Vector3) -> bool {
        Obb::contains_point(self, point)
    }

    /// Uses the conservative world-aligned bounds, not the rotated box
    fn intersect(&self, other: &dyn Shape) -> Option<Aabb> {
        self.bounds().intersection_region(&other.get_bounds())
    }
}

/// A box that is either world-aligned or rotated.
///
/// Code that only needs the world-aligned footprint (voxel registration,
/// box-box contacts) goes through [`BoxShape::bounds`], so a rotated box
/// keeps its rotation however it is passed around.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum BoxShape {
    Aabb(Aabb),
    Obb(Obb),
}

impl BoxShape {
    /// World-aligned footprint
    pub fn bounds(&self) -> &Aabb {
        match self {
            BoxShape::Aabb(aabb) => aabb,
            BoxShape::Obb(obb) => obb.bounds(),
        }
    }

    pub fn position(&self) -> Vector3 {
        self.bounds().position()
    }

    pub fn set_position(&mut self, position: Vector3) {
        match self {
            BoxShape::Aabb(aabb) => aabb.set_position(position),
            BoxShape::Obb(obb) => obb.set_position(position),
        }
    }

    pub fn translate(&mut self, translation: Vector3) {
        match self {
            BoxShape::Aabb(aabb) => aabb.translate(translation),
            BoxShape::Obb(obb) => obb.translate(translation),
        }
    }

    pub fn as_obb(&self) -> Option<&Obb> {
        match self {
            BoxShape::Obb(obb) => Some(obb),
            BoxShape::Aabb(_) => None,
        }
    }

    pub fn as_obb_mut(&mut self) -> Option<&mut Obb> {
        match self {
            BoxShape::Obb(obb) => Some(obb),
            BoxShape::Aabb(_) => None,
        }
    }

    fn inner(&self) -> &dyn Shape {
        match self {
            BoxShape::Aabb(aabb) => aabb,
            BoxShape::Obb(obb) => obb,
        }
    }
}

impl Shape for BoxShape {
    fn shape_type(&self) -> &'static str {
        self.inner().shape_type()
    }

    fn get_position(&self) -> Vector3 {
        self.position()
    }

    fn get_half_extents(&self) -> Vector3 {
        self.inner().get_half_extents()
    }

    fn get_frame(&self) -> Frame {
        self.inner().get_frame()
    }

    fn get_bounds(&self) -> Aabb {
        *self.bounds()
    }

    fn to_implicit_plane(&self, dir: Direction) -> ImplicitPlane {
        self.inner().to_implicit_plane(dir)
    }

    fn contains_point(&self, point: Vector3) -> bool {
        self.inner().contains_point(point)
    }

    fn intersect(&self, other: &dyn Shape) -> Option<Aabb> {
        self.inner().intersect(other)
    }
}

impl From<Aabb> for BoxShape {
    fn from(aabb: Aabb) -> Self {
        BoxShape::Aabb(aabb)
    }
}

impl From<Obb> for BoxShape {
    fn from(obb: Obb) -> Self {
        BoxShape::Obb(obb)
    }
}
