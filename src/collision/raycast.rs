//! Ray queries against planes and boxes.
//!
//! Box queries are approximate: they only try the up to three faces the ray
//! direction points into, and stop at the first face that is hit.

use crate::collision::{ContactKind, ContactPoint};
use crate::math::{Direction, Ray, Vector3, TOLERANCE};
use crate::shapes::{Aabb, BoxShape, ImplicitPlane, Obb};

/// Ray against the unbounded plane through `point_on_plane`.
///
/// The returned normal faces the ray origin. An origin lying on the plane
/// yields a zero-distance hit at the origin; a ray parallel to the plane
/// never hits.
pub fn raycast_plane(ray: &Ray, normal: Vector3, point_on_plane: Vector3) -> Option<ContactPoint> {
    let offset = (point_on_plane - ray.origin).dot(&normal);
    if offset.abs() < TOLERANCE {
        return Some(ContactPoint::new(ray.origin, normal, 0.0, ContactKind::Face));
    }

    let approach = ray.direction.dot(&normal);
    if approach.abs() < TOLERANCE {
        return None;
    }

    let distance = offset / approach;
    if distance <= 0.0 {
        return None;
    }

    let facing = if offset > 0.0 { -normal } else { normal };
    Some(ContactPoint::new(ray.point_at(distance), facing, distance, ContactKind::Face))
}

/// Ray against a bounded plane
pub fn raycast_implicit_plane(ray: &Ray, plane: &ImplicitPlane) -> Option<ContactPoint> {
    raycast_plane(ray, plane.normal(), plane.center).filter(|hit| plane.contains_projection(hit.point))
}

// Faces facing a ray whose direction, in box axes, is `local_dir`
fn facing_faces(local_dir: Vector3) -> [Direction; 3] {
    [
        if local_dir.x > 0.0 { Direction::Left } else { Direction::Right },
        if local_dir.y > 0.0 { Direction::Down } else { Direction::Up },
        if local_dir.z > 0.0 { Direction::Back } else { Direction::Forward },
    ]
}

/// Ray against an axis-aligned box
pub fn raycast_aabb(ray: &Ray, aabb: &Aabb) -> Option<ContactPoint> {
    if aabb.contains_point(ray.origin) {
        return Some(ContactPoint::new(ray.origin, ray.direction, 0.0, ContactKind::Internal));
    }
    if (aabb.position() - ray.origin).dot(&ray.direction) < 0.0 {
        return None;
    }

    facing_faces(ray.direction)
        .into_iter()
        .find_map(|face| raycast_implicit_plane(ray, &aabb.to_implicit_plane(face)))
}

/// Ray against an oriented box
pub fn raycast_obb(ray: &Ray, obb: &Obb) -> Option<ContactPoint> {
    if obb.contains_point(ray.origin) {
        return Some(ContactPoint::new(ray.origin, ray.direction, 0.0, ContactKind::Internal));
    }
    if (obb.position() - ray.origin).dot(&ray.direction) < 0.0 {
        return None;
    }

    facing_faces(obb.frame().local_direction(ray.direction))
        .into_iter()
        .find_map(|face| raycast_implicit_plane(ray, &obb.to_implicit_plane(face)))
}

/// Ray against either kind of box
pub fn raycast_box(ray: &Ray, shape: &BoxShape) -> Option<ContactPoint> {
    match shape {
        BoxShape::Aabb(aabb) => raycast_aabb(ray, aabb),
        BoxShape::Obb(obb) => raycast_obb(ray, obb),
    }
}
