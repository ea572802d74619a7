use crate::collision::raycast::raycast_implicit_plane;
use crate::collision::{AabbContact, ContactKind, ContactPoint, Manifold};
use crate::math::{Direction, Quaternion, Ray, Vector3, TOLERANCE};
use crate::shapes::{Aabb, BoxShape, Edge, ImplicitPlane, Obb, Shape};

/// Narrow-phase tests used by the simulation
pub trait NarrowPhase {
    /// Minimum-translation contact between the world-aligned footprints of two boxes
    fn collide_boxes(&self, a: &dyn Shape, b: &dyn Shape) -> Option<AabbContact>;

    /// Face and edge contacts of a box against a bounded plane
    fn collide_box_plane(&self, shape: &BoxShape, plane: &ImplicitPlane) -> Manifold;
}

/// Box-box and box-plane tests for voxel worlds
#[derive(Debug, Clone, Copy)]
pub struct VoxelNarrowPhase {
    skin_width: f32,
}

impl VoxelNarrowPhase {
    pub fn new(skin_width: f32) -> Self {
        Self { skin_width }
    }

    pub fn skin_width(&self) -> f32 {
        self.skin_width
    }
}

impl Default for VoxelNarrowPhase {
    fn default() -> Self {
        Self::new(0.005)
    }
}

impl NarrowPhase for VoxelNarrowPhase {
    fn collide_boxes(&self, a: &dyn Shape, b: &dyn Shape) -> Option<AabbContact> {
        collide_aabb(a, b)
    }

    fn collide_box_plane(&self, shape: &BoxShape, plane: &ImplicitPlane) -> Manifold {
        match shape {
            BoxShape::Obb(obb) => collide_box_plane(obb, plane, self.skin_width),
            BoxShape::Aabb(aabb) => collide_box_plane(&Obb::from_aabb(aabb), plane, self.skin_width),
        }
    }
}

/// Contact for moving `a` out of `b`, if they overlap
pub fn collide_aabb(a: &dyn Shape, b: &dyn Shape) -> Option<AabbContact> {
    let region = a.intersect(b)?;
    let quadrant = (a.get_position() - b.get_position()).sign();
    Some(AabbContact::new(region, quadrant))
}

/// Moves `a` out along the contact's best direction
pub fn resolve_aabb_contact(a: &mut Aabb, contact: &AabbContact) {
    a.translate(contact.resolution());
}

/// Box face most anti-parallel to the plane normal
pub fn closest_face(obb: &Obb, plane: &ImplicitPlane) -> Direction {
    Direction::from_frame_vector(-plane.normal(), obb.frame())
}

/// Contacts of a box resting on or sinking into a bounded plane.
///
/// Corners of the face nearest the plane are raycast along the plane normal
/// from `skin_width` beyond the face; every hit becomes a FACE contact whose
/// normal points out of the plane. Corners sunk equally deep collapse into
/// one contact at their centroid. Box edges are then matched against the
/// plane's boundary edges and accepted gaps become EDGE contacts.
pub fn collide_box_plane(obb: &Obb, plane: &ImplicitPlane, skin_width: f32) -> Manifold {
    let mut manifold = Manifold::new();
    let frame = *obb.frame();
    let up = plane.normal();

    let face_dir = closest_face(obb, plane);
    let face_normal = face_dir.to_frame_vector(&frame);
    let face = obb.to_implicit_plane(face_dir);

    let hits: Vec<ContactPoint> = face
        .vertices()
        .iter()
        .filter_map(|vertex| {
            let ray = Ray::new(*vertex + face_normal * skin_width, up);
            raycast_implicit_plane(&ray, plane).map(|mut hit| {
                hit.normal = -hit.normal;
                hit.distance -= skin_width;
                hit
            })
        })
        .collect();
    add_face_hits(&mut manifold, &hits);

    let inward = (plane.center - obb.position()).tangential_component(&up);
    let edge_face = if face.normal().dot(&inward) >= 0.0 {
        face
    } else {
        obb.to_implicit_plane(Direction::from_frame_vector(inward, &frame))
    };

    for side in [Direction::Right, Direction::Left, Direction::Forward, Direction::Back] {
        if let Some(edge) = edge_face.edge_by_direction(side) {
            edge_contacts(obb, &edge, plane, &mut manifold);
        }
    }

    manifold
}

fn add_face_hits(manifold: &mut Manifold, hits: &[ContactPoint]) {
    let Some(first) = hits.first() else {
        return;
    };

    let level = hits.len() > 1 && hits.iter().all(|h| (h.distance - first.distance).abs() < TOLERANCE);
    if level {
        let count = hits.len() as f32;
        let centroid = hits.iter().fold(Vector3::zero(), |acc, h| acc + h.point) / count;
        let depth = hits.iter().map(|h| h.distance).sum::<f32>() / count;
        manifold.add_contact(ContactPoint::new(centroid, first.normal, depth, ContactKind::Face));
    } else {
        for hit in hits {
            manifold.add_contact(*hit);
        }
    }
}

fn edge_contacts(obb: &Obb, edge: &Edge, plane: &ImplicitPlane, manifold: &mut Manifold) {
    let from_side = plane.closest_edge_direction(edge.from);
    let to_side = plane.closest_edge_direction(edge.to);

    edge_contact(obb, edge, plane, from_side, manifold);
    if to_side != from_side {
        edge_contact(obb, edge, plane, to_side, manifold);
    }
}

fn edge_contact(obb: &Obb, edge: &Edge, plane: &ImplicitPlane, side: Direction, manifold: &mut Manifold) {
    let Some(boundary) = plane.edge_by_direction(side) else {
        return;
    };

    let gap = edge.closest_edge_to_edge(&boundary);
    let outward = side.to_frame_vector(&plane.frame);
    if gap.dir.dot(&plane.normal()) >= 0.0 && gap.dir.dot(&outward) >= 0.0 && obb.contains_point(gap.to) {
        manifold.add_edge_contact(&gap);
    }
}

/// Settles a box onto a plane at a FACE contact.
///
/// The box pivots about the contact point until its nearest face lies flat
/// against the plane, then moves out along the contact normal by the
/// penetration depth.
pub fn resolve_box_plane_face(obb: &mut Obb, plane: &ImplicitPlane, contact: &ContactPoint) {
    let face_normal = closest_face(obb, plane).to_frame_vector(obb.frame());
    let rotation = Quaternion::from_two_vectors(face_normal, -plane.normal());

    obb.set_position(rotation.rotate_around(contact.point, obb.position()));
    obb.rotate(rotation);
    obb.translate(contact.normal * contact.distance);
}
