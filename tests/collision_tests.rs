use voxel_dynamics::collision::{
    collide_aabb, collide_box_plane, raycast_aabb, raycast_box, raycast_implicit_plane, raycast_obb, raycast_plane,
    resolve_aabb_contact, resolve_box_plane_face, ContactKind, NarrowPhase, VoxelNarrowPhase,
};
use voxel_dynamics::math::{Direction, Quaternion, Ray, Vector3};
use voxel_dynamics::shapes::{Aabb, BoxShape, Edge, ImplicitPlane, Obb, Octant, Shape};
use approx::{assert_abs_diff_eq, assert_relative_eq};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::f32::consts::PI;

fn random_vector(rng: &mut StdRng, range: f32) -> Vector3 {
    Vector3::new(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

fn ground() -> ImplicitPlane {
    ImplicitPlane::new(Vector3::zero(), Vector3::up(), 10.0, 10.0, 0.0)
}

#[test]
fn test_aabb_bounds_follow_mutations() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut aabb = Aabb::new(Vector3::zero(), Vector3::one());

    for _ in 0..200 {
        match rng.gen_range(0..3) {
            0 => aabb.translate(random_vector(&mut rng, 5.0)),
            1 => aabb.set_position(random_vector(&mut rng, 50.0)),
            _ => aabb.set_half_extents(random_vector(&mut rng, 3.0).abs()),
        }

        assert!(aabb.low().all_le(&aabb.high()));
        assert_abs_diff_eq!(aabb.position(), (aabb.low() + aabb.high()) * 0.5, epsilon = 1e-4);
    }
}

#[test]
fn test_intersection_region_matches_is_intersecting() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..500 {
        let a = Aabb::new(random_vector(&mut rng, 3.0), random_vector(&mut rng, 2.0).abs());
        let b = Aabb::new(random_vector(&mut rng, 3.0), random_vector(&mut rng, 2.0).abs());

        let region = a.intersection_region(&b);
        assert_eq!(region.is_some(), a.is_intersecting(&b));

        if let Some(region) = region {
            assert_abs_diff_eq!(region.low(), a.low().component_max(&b.low()), epsilon = 1e-5);
            assert_abs_diff_eq!(region.high(), a.high().component_min(&b.high()), epsilon = 1e-5);
        }
    }
}

#[test]
fn test_aabb_helpers() {
    let mut aabb = Aabb::from_low_high(Vector3::new(1.0, 2.0, 3.0), Vector3::new(-1.0, -2.0, -3.0));
    assert_eq!(aabb.low(), Vector3::new(-1.0, -2.0, -3.0));
    assert_eq!(aabb.size(), Vector3::new(2.0, 4.0, 6.0));
    assert_relative_eq!(aabb.volume(), 48.0);

    assert!(aabb.contains_point(Vector3::new(1.0, 0.0, 0.0)));
    assert!(!aabb.contains_point(Vector3::new(1.1, 0.0, 0.0)));

    aabb.expand_to_include(&Aabb::new(Vector3::new(3.0, 0.0, 0.0), Vector3::half()));
    assert_eq!(aabb.high().x, 3.5);

    let top = aabb.to_implicit_plane(Direction::Up);
    assert_eq!(top.normal(), Vector3::up());
    assert_relative_eq!(top.center.y, 2.0);
}

#[test]
fn test_box_contact_picks_shallowest_axis() {
    let a = Aabb::new(Vector3::new(0.2, 0.9, 0.0), Vector3::half());
    let b = Aabb::new(Vector3::zero(), Vector3::half());

    let contact = collide_aabb(&a, &b).expect("boxes overlap");
    assert_eq!(contact.best(), Direction::Up);
    assert_relative_eq!(contact.penetration(), 0.1, epsilon = 1e-5);
    assert_eq!(contact.second(), Direction::Right);
    assert_eq!(contact.third(), Direction::Forward.opposite());

    let mut moved = a;
    resolve_aabb_contact(&mut moved, &contact);
    assert_relative_eq!(moved.low().y, b.high().y, epsilon = 1e-5);

    let apart = Aabb::new(Vector3::new(0.0, 2.0, 0.0), Vector3::half());
    assert!(collide_aabb(&apart, &b).is_none());
}

#[test]
fn test_shape_intersect_and_axis_penetration() {
    let a = Aabb::new(Vector3::new(0.2, 0.9, 0.0), Vector3::half());
    let b = Aabb::new(Vector3::zero(), Vector3::half());

    let region = a.intersect(&b).expect("boxes overlap");
    assert_abs_diff_eq!(region.low(), Vector3::new(-0.3, 0.4, -0.5), epsilon = 1e-6);
    assert_abs_diff_eq!(region.high(), Vector3::new(0.5, 0.5, 0.5), epsilon = 1e-6);
    assert_relative_eq!(a.penetration_along_axis(&b, Direction::Up), 0.1, epsilon = 1e-5);
    assert_relative_eq!(a.penetration_along_axis(&b, Direction::Left), 0.8, epsilon = 1e-5);
    assert_relative_eq!(a.penetration_along_axis(&b, Direction::Forward), 1.0, epsilon = 1e-5);

    let apart = Aabb::new(Vector3::new(0.0, 2.0, 0.0), Vector3::half());
    assert!(apart.intersect(&b).is_none());
    assert_eq!(apart.penetration_along_axis(&b, Direction::Up), 0.0);

    // A rotated box overlaps through its world-aligned bounds
    let obb = Obb::new(Vector3::zero(), Vector3::half(), Quaternion::from_axis_angle(Vector3::up(), PI / 4.0));
    let wall = Aabb::new(Vector3::new(1.0, 0.0, 0.0), Vector3::half());
    let reach = 0.5 * 2.0f32.sqrt() - 0.5;
    assert_relative_eq!(obb.penetration_along_axis(&wall, Direction::Right), reach, epsilon = 1e-4);

    let shape = BoxShape::Obb(obb);
    assert_eq!(shape.intersect(&wall), obb.intersect(&wall));

    let contact = collide_aabb(&shape, &wall).expect("bounds overlap");
    assert_eq!(contact.best(), Direction::Left);
    assert_relative_eq!(contact.penetration(), reach, epsilon = 1e-4);
}

#[test]
fn test_box_contact_ties_prefer_x() {
    let a = Aabb::new(Vector3::new(-0.75, 0.75, 0.0), Vector3::half());
    let b = Aabb::new(Vector3::zero(), Vector3::half());

    let contact = collide_aabb(&a, &b).expect("boxes overlap");
    assert_eq!(contact.best(), Direction::Left);
    assert_eq!(contact.second(), Direction::Up);
    assert_relative_eq!(contact.penetration_along(Direction::Up), 0.25);
}

#[test]
fn test_flush_box_on_plane_gives_single_face_contact() {
    let obb = Obb::new(Vector3::new(0.0, 0.99, 0.0), Vector3::new(0.5, 1.0, 1.5), Quaternion::identity());
    let manifold = collide_box_plane(&obb, &ground(), 0.005);

    assert_eq!(manifold.count_of_kind(ContactKind::Face), 1);
    assert_eq!(manifold.count_of_kind(ContactKind::Edge), 0);

    let contact = manifold.deepest().expect("one contact");
    assert_eq!(contact.kind, ContactKind::Face);
    assert_abs_diff_eq!(contact.normal, Vector3::up(), epsilon = 1e-6);
    assert_relative_eq!(contact.distance, 0.01, epsilon = 1e-4);
    assert_abs_diff_eq!(contact.point, Vector3::zero(), epsilon = 1e-5);
}

#[test]
fn test_box_above_plane_has_no_face_contact() {
    let obb = Obb::new(Vector3::new(0.0, 2.0, 0.0), Vector3::one(), Quaternion::identity());
    let manifold = collide_box_plane(&obb, &ground(), 0.005);
    assert_eq!(manifold.count_of_kind(ContactKind::Face), 0);
}

#[test]
fn test_tilted_box_settles_flat() {
    let plane = ground();
    let mut obb = Obb::new(
        Vector3::new(0.0, 0.5, 0.0),
        Vector3::half(),
        Quaternion::from_axis_angle(Vector3::forward(), 0.2),
    );

    let manifold = collide_box_plane(&obb, &plane, 0.005);
    let contact = *manifold.deepest_of_kind(ContactKind::Face).expect("low corners sink");
    assert!(contact.distance > 0.0);
    assert_abs_diff_eq!(contact.normal, Vector3::up(), epsilon = 1e-5);

    resolve_box_plane_face(&mut obb, &plane, &contact);
    assert_abs_diff_eq!(obb.frame().up, Vector3::up(), epsilon = 1e-4);
    assert_abs_diff_eq!(obb.low().y, 0.0, epsilon = 0.01);
}

#[test]
fn test_narrow_phase_accepts_either_box() {
    let narrow = VoxelNarrowPhase::default();
    let aabb = Aabb::new(Vector3::new(0.0, 0.99, 0.0), Vector3::new(0.5, 1.0, 1.5));

    let from_aabb = narrow.collide_box_plane(&BoxShape::Aabb(aabb), &ground());
    let from_obb = narrow.collide_box_plane(&BoxShape::Obb(Obb::from_aabb(&aabb)), &ground());
    assert_eq!(from_aabb.len(), from_obb.len());
    assert!(narrow.collide_boxes(&aabb, &Aabb::new(Vector3::zero(), Vector3::one())).is_some());
}

#[test]
fn test_raycast_plane() {
    let down = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::down());
    let hit = raycast_plane(&down, Vector3::up(), Vector3::zero()).expect("hits the plane");
    assert_relative_eq!(hit.distance, 5.0);
    assert_eq!(hit.point, Vector3::zero());
    assert_eq!(hit.normal, Vector3::up());

    // From below, the normal flips toward the origin
    let up = Ray::new(Vector3::new(0.0, -2.0, 0.0), Vector3::up());
    let hit = raycast_plane(&up, Vector3::up(), Vector3::zero()).expect("hits the plane");
    assert_relative_eq!(hit.distance, 2.0);
    assert_eq!(hit.normal, Vector3::down());

    let parallel = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::right());
    assert!(raycast_plane(&parallel, Vector3::up(), Vector3::zero()).is_none());

    let away = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::up());
    assert!(raycast_plane(&away, Vector3::up(), Vector3::zero()).is_none());

    let on_plane = Ray::new(Vector3::new(3.0, 0.0, 1.0), Vector3::down());
    let hit = raycast_plane(&on_plane, Vector3::up(), Vector3::zero()).expect("starts on the plane");
    assert_eq!(hit.distance, 0.0);
    assert_eq!(hit.point, on_plane.origin);
}

#[test]
fn test_raycast_bounded_plane() {
    let plane = ground();
    let inside = Ray::new(Vector3::new(9.0, 1.0, -9.0), Vector3::down());
    assert!(raycast_implicit_plane(&inside, &plane).is_some());

    let outside = Ray::new(Vector3::new(20.0, 1.0, 0.0), Vector3::down());
    assert!(raycast_implicit_plane(&outside, &plane).is_none());
}

#[test]
fn test_raycast_aabb() {
    let aabb = Aabb::new(Vector3::zero(), Vector3::half());

    let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::right());
    let hit = raycast_aabb(&ray, &aabb).expect("hits the left face");
    assert_eq!(hit.kind, ContactKind::Face);
    assert_relative_eq!(hit.distance, 4.5);
    assert_abs_diff_eq!(hit.point, Vector3::new(-0.5, 0.0, 0.0), epsilon = 1e-6);
    assert_eq!(hit.normal, Vector3::left());

    let from_inside = Ray::new(Vector3::new(0.1, 0.0, 0.0), Vector3::right());
    let hit = raycast_aabb(&from_inside, &aabb).expect("starts inside");
    assert_eq!(hit.kind, ContactKind::Internal);
    assert_eq!(hit.distance, 0.0);

    let behind = Ray::new(Vector3::new(5.0, 0.0, 0.0), Vector3::right());
    assert!(raycast_aabb(&behind, &aabb).is_none());

    let miss = Ray::new(Vector3::new(-5.0, 2.0, 0.0), Vector3::right());
    assert!(raycast_aabb(&miss, &aabb).is_none());
}

#[test]
fn test_raycast_obb() {
    let obb = Obb::new(Vector3::zero(), Vector3::half(), Quaternion::from_axis_angle(Vector3::up(), PI / 4.0));
    let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.2), Vector3::right());

    let hit = raycast_obb(&ray, &obb).expect("hits a slanted face");
    let corner = 0.5 * 2.0f32.sqrt();
    assert_relative_eq!(hit.distance, 5.0 - (corner - 0.2), epsilon = 1e-3);
    assert!(hit.normal.dot(&ray.direction) < 0.0);

    let shape = BoxShape::Obb(obb);
    assert_eq!(raycast_box(&ray, &shape).map(|h| h.kind), Some(ContactKind::Face));
}

#[test]
fn test_obb_bounds_and_vertices() {
    let mut obb = Obb::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(1.0, 2.0, 3.0), Quaternion::identity());
    assert_eq!(obb.vertex(Octant::RightUpForward), Vector3::new(2.0, 4.0, 6.0));
    assert_eq!(obb.vertex(Octant::LeftDownBack), Vector3::zero());

    obb.set_rotation(Quaternion::from_axis_angle(Vector3::up(), PI / 4.0));
    obb.set_half_extents(Vector3::one());
    let sqrt2 = 2.0f32.sqrt();
    assert_abs_diff_eq!(obb.bounds().half_extents(), Vector3::new(sqrt2, 1.0, sqrt2), epsilon = 1e-5);

    // Every corner lies inside the bounds
    let bounds = obb.bounds().skinned(1e-4);
    for vertex in obb.vertices() {
        assert!(bounds.contains_point(*vertex));
    }
}

#[test]
fn test_edge_closest_points() {
    let a = Edge::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
    let b = Edge::new(Vector3::new(0.0, 1.0, -1.0), Vector3::new(0.0, 1.0, 1.0));

    let gap = a.closest_edge_to_edge(&b);
    assert_abs_diff_eq!(gap.from, Vector3::zero(), epsilon = 1e-6);
    assert_abs_diff_eq!(gap.to, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    assert_relative_eq!(gap.distance, 1.0, epsilon = 1e-6);

    // Parallel edges fall back to the start of the other edge
    let c = Edge::new(Vector3::zero(), Vector3::new(2.0, 0.0, 0.0));
    let d = Edge::new(Vector3::new(1.0, 1.0, 0.0), Vector3::new(3.0, 1.0, 0.0));
    let gap = c.closest_edge_to_edge(&d);
    assert_abs_diff_eq!(gap.from, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    assert_abs_diff_eq!(gap.to, d.from, epsilon = 1e-6);

    let mut e = c;
    e.align(Vector3::left());
    assert_eq!(e.from, c.to);
    assert_eq!(e.dir, Vector3::left());
}

#[test]
fn test_plane_edges_and_vertices() {
    let plane = ground();
    assert_eq!(
        plane.vertex_by_directions(Direction::Right, Direction::Back),
        Some(Vector3::new(10.0, 0.0, -10.0))
    );
    assert!(plane.vertex_by_directions(Direction::Up, Direction::Back).is_none());
    assert!(plane.edge_by_direction(Direction::Up).is_none());

    assert_eq!(plane.closest_edge_direction(Vector3::new(9.0, 0.0, 2.0)), Direction::Right);
    assert_eq!(plane.closest_edge_direction(Vector3::new(1.0, 0.0, -9.5)), Direction::Back);

    let edge = plane.edge_by_direction(Direction::Forward).expect("side edge");
    assert_relative_eq!(edge.distance, 20.0);
    assert_abs_diff_eq!(edge.dir, Vector3::right(), epsilon = 1e-6);

    assert!(plane.contains_projection(Vector3::new(10.0, 3.0, -10.0)));
    assert!(!plane.contains_projection(Vector3::new(10.5, 0.0, 0.0)));
}
