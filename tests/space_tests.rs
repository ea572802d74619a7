use voxel_dynamics::core::list::ListNode;
use voxel_dynamics::core::{Allocator, ColliderId, SpaceConfig};
use voxel_dynamics::error::VoxelError;
use voxel_dynamics::math::{Direction, Vector3, Vector3i};
use voxel_dynamics::shapes::Aabb;
use voxel_dynamics::space::{Collider, Grid, Space, VoxelRef};
use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// 4×4 chunks, 4 across, 2 high and 4 deep, anchored at the origin
fn small_space() -> Space {
    Space::new(SpaceConfig::new(4, Vector3i::zero(), 4, 2)).expect("valid space")
}

fn in_use<T: 'static>(alloc: &Allocator) -> usize {
    alloc.pool::<ListNode<T>>(1).map_or(0, |pool| pool.in_use())
}

#[test]
fn test_grid_indexing() {
    let grid = Grid::new(4, Vector3i::new(-4, 0, 0), 0);
    assert_eq!(grid.voxel_count(), 64);

    let index = grid.index_of(Vector3i::new(1, 2, 3));
    assert_eq!(index, 57);
    assert_eq!(grid.coordinates(index), Vector3i::new(1, 2, 3));
    assert_eq!(grid.index_at(Vector3::new(-2.5, 2.1, 3.9)), Some(57));
    assert_eq!(grid.index_at(Vector3::new(0.5, 0.5, 0.5)), None);

    let edge = grid.index_of(Vector3i::new(3, 0, 0));
    assert_eq!(grid.move_index(edge, Direction::Right), None);
    assert_eq!(grid.move_index(edge, Direction::Up), Some(grid.index_of(Vector3i::new(3, 1, 0))));

    let voxel = grid.voxel(57).expect("valid index");
    assert_eq!(voxel.low(), Vector3::new(-3.0, 2.0, 3.0));
    assert_eq!(voxel.mid_point(), Vector3::new(-2.5, 2.5, 3.5));
}

#[test]
fn test_grid_region_is_half_open() {
    let grid = Grid::new(4, Vector3i::zero(), 0);

    // The box ends exactly on the low face of column x = 2
    let touching = Aabb::from_low_high(Vector3::new(0.5, 0.5, 0.5), Vector3::new(2.0, 0.9, 0.9));
    assert_eq!(grid.sample_region(&touching).len(), 3);

    let inside = Aabb::from_low_high(Vector3::new(0.5, 0.5, 0.5), Vector3::new(1.9, 0.9, 0.9));
    assert_eq!(grid.sample_region(&inside).len(), 2);

    // Starting exactly on the high face of column x = 1 leaves that column out,
    // even though the closed boxes intersect
    let resting = Aabb::from_low_high(Vector3::new(2.0, 0.5, 0.5), Vector3::new(3.5, 0.9, 0.9));
    let column = grid.voxel(grid.index_of(Vector3i::new(1, 0, 0))).expect("valid index").to_aabb();
    assert!(resting.is_intersecting(&column));
    assert_eq!(
        grid.sample_region(&resting),
        vec![grid.index_of(Vector3i::new(2, 0, 0)), grid.index_of(Vector3i::new(3, 0, 0))]
    );
    assert_eq!(
        grid.voxel_range(&resting),
        Some((Vector3i::new(2, 0, 0), Vector3i::new(3, 0, 0)))
    );
}

#[test]
fn test_invalid_space_config() {
    assert!(matches!(
        Space::new(SpaceConfig::new(0, Vector3i::zero(), 4, 4)),
        Err(VoxelError::InvalidParameter(_))
    ));
    assert!(Space::new(SpaceConfig::new(8, Vector3i::zero(), 0, 4)).is_err());
}

#[test]
fn test_chunk_addressing() {
    let space = small_space();

    for index in 0..32 {
        let coord = space.chunk_coordinates(index);
        assert_eq!(space.chunk_index(coord), Some(index));
    }
    assert_eq!(space.chunk_index(Vector3i::new(1, 1, 2)), Some(1 + 4 + 2 * 8));
    assert_eq!(space.chunk_index(Vector3i::new(0, 2, 0)), None);
    assert_eq!(space.chunk_index(Vector3i::new(-1, 0, 0)), None);

    assert_eq!(space.chunk_coord_of(Vector3::new(5.5, 0.0, -0.5)), Vector3i::new(1, 0, -1));
    assert_eq!(space.chunk_low(Vector3i::new(1, 1, 3)), Vector3i::new(4, 4, 12));

    let bounds = space.bounds();
    assert_eq!(bounds.high(), Vector3::new(16.0, 8.0, 16.0));
}

#[test]
fn test_lazy_chunk_allocation() {
    let mut space = small_space();
    assert_eq!(space.allocated_chunks(), 0);
    assert!(space.voxel_at(Vector3::new(1.5, 0.5, 1.5)).is_none());

    assert!(space.set_voxel_occupied(Vector3::new(1.5, 0.5, 1.5)));
    assert!(!space.set_voxel_occupied(Vector3::new(1.5, 0.5, 1.5)));
    assert_eq!(space.allocated_chunks(), 1);
    assert!(space.is_voxel_occupied(Vector3::new(1.1, 0.9, 1.9)));
    assert!(!space.is_voxel_occupied(Vector3::new(2.1, 0.9, 1.9)));

    // Outside the space nothing is allocated
    assert!(!space.set_voxel_occupied(Vector3::new(-1.0, 0.5, 0.5)));
    assert!(!space.set_voxel_occupied(Vector3::new(0.5, 9.0, 0.5)));
    assert_eq!(space.allocated_chunks(), 1);

    assert!(space.set_voxel_unoccupied(Vector3::new(1.5, 0.5, 1.5)));
    assert!(!space.set_voxel_unoccupied(Vector3::new(1.5, 0.5, 1.5)));
    assert!(!space.set_voxel_unoccupied(Vector3::new(10.5, 0.5, 1.5)));
    assert_eq!(space.allocated_chunks(), 1);

    assert!(space.set_chunk_occupied(Vector3i::new(3, 1, 3)));
    assert!(!space.set_chunk_occupied(Vector3i::new(4, 0, 0)));
    assert!(space.is_chunk_occupied(Vector3i::new(3, 1, 3)));
    assert_eq!(space.allocated_chunks(), 2);
}

#[test]
fn test_fill_and_sample_region() {
    let mut space = small_space();
    let floor = Aabb::from_low_high(Vector3::zero(), Vector3::new(7.5, 0.5, 7.5));

    assert_eq!(space.fill_region(&floor), 64);
    assert_eq!(space.fill_region(&floor), 0);
    assert_eq!(space.allocated_chunks(), 4);
    assert_eq!(space.sample_chunks(&floor).len(), 4);

    let mut alloc = Allocator::new();
    let query = Aabb::new(Vector3::new(2.0, 1.25, 2.0), Vector3::half());
    let sample = space.sample_occupied_region(&mut alloc, &query).expect("sampled");
    assert_eq!(sample.voxels.len(), 4);
    assert!(sample.colliders.is_empty());
    for voxel in &sample.voxels {
        assert!(space.is_occupied(*voxel));
    }

    let above = Aabb::new(Vector3::new(2.0, 3.0, 2.0), Vector3::half());
    assert!(space.sample_occupied_region(&mut alloc, &above).expect("sampled").voxels.is_empty());
}

#[test]
fn test_neighbours_cross_chunks() {
    let mut space = small_space();
    let n = 4;

    // Last voxel along X wraps to the first voxel of the next chunk
    let (chunk, voxel) = space.move_index(3, Vector3i::zero(), Direction::Right);
    assert_eq!(chunk, Vector3i::new(1, 0, 0));
    assert_eq!(voxel, Vector3i::zero());

    let (chunk, voxel) = space.move_index(0, Vector3i::zero(), Direction::Left);
    assert_eq!(chunk, Vector3i::new(-1, 0, 0));
    assert_eq!(voxel, Vector3i::new(n - 1, 0, 0));

    // Top of the chunk wraps to the bottom of the chunk above
    let (chunk, voxel) = space.move_index(12, Vector3i::zero(), Direction::Up);
    assert_eq!(chunk, Vector3i::new(0, 1, 0));
    assert_eq!(voxel, Vector3i::zero());

    assert_eq!(space.neighbour(VoxelRef::new(0, 0), Direction::Left), None);
    assert_eq!(space.neighbour(VoxelRef::new(0, 3), Direction::Right), Some(VoxelRef::new(1, 0)));

    space.set_voxel_occupied(Vector3::new(4.5, 0.5, 0.5));
    assert!(space.is_neighbour_occupied(VoxelRef::new(0, 3), Direction::Right));
    assert!(!space.is_neighbour_occupied(VoxelRef::new(0, 3), Direction::Up));
}

#[test]
fn test_voxel_contact() {
    let mut space = small_space();
    space.set_voxel_occupied(Vector3::new(0.5, 0.5, 0.5));
    let voxel_ref = space.voxel_at(Vector3::new(0.5, 0.5, 0.5)).expect("allocated");
    let voxel = space.voxel(voxel_ref).expect("valid voxel");

    let resting = Aabb::new(Vector3::new(0.5, 1.4, 0.5), Vector3::new(0.4, 0.5, 0.4));
    let contact = voxel.contact(&resting).expect("overlaps the voxel top");
    assert_eq!(contact.best(), Direction::Up);
    assert_relative_eq!(contact.penetration(), 0.1, epsilon = 1e-5);

    let clear = Aabb::new(Vector3::new(0.5, 2.0, 0.5), Vector3::new(0.4, 0.5, 0.4));
    assert!(voxel.contact(&clear).is_none());
}

#[test]
fn test_insert_chunk_copies_occupancy() {
    let mut space = small_space();
    let mut source = Grid::new(4, Vector3i::zero(), 0);
    source.set_occupied(0);
    source.set_occupied(63);

    space.insert_chunk(Vector3i::new(1, 0, 0), &source).expect("chunk inside the space");
    assert!(space.is_voxel_occupied(Vector3::new(4.5, 0.5, 0.5)));
    assert!(space.is_voxel_occupied(Vector3::new(7.5, 3.5, 3.5)));
    assert!(!space.is_voxel_occupied(Vector3::new(5.5, 0.5, 0.5)));

    let wrong_size = Grid::new(2, Vector3i::zero(), 0);
    assert!(matches!(
        space.insert_chunk(Vector3i::new(0, 0, 0), &wrong_size),
        Err(VoxelError::InvalidParameter(_))
    ));
    assert!(matches!(
        space.insert_chunk(Vector3i::new(9, 0, 0), &source),
        Err(VoxelError::OutOfBounds(_))
    ));
}

#[test]
fn test_collider_membership_tracks_box() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut space = small_space();
    let mut alloc = Allocator::with_capacity(16);
    let mut collider = Collider::new(ColliderId(3));

    for _ in 0..50 {
        let position = Vector3::new(rng.gen_range(1.0..15.0), rng.gen_range(1.0..7.0), rng.gen_range(1.0..15.0));
        let half = Vector3::new(rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0), rng.gen_range(0.1..2.0));
        let aabb = Aabb::new(position, half);
        space.update_collider(&mut alloc, &mut collider, &aabb).expect("registered");

        let from = Vector3i::floor(aabb.low()).component_max(&Vector3i::zero());
        let to = Vector3i::floor(aabb.high()).component_min(&Vector3i::new(15, 7, 15));
        let mut expected = Vec::new();
        for z in from.z..=to.z {
            for y in from.y..=to.y {
                for x in from.x..=to.x {
                    let center = Vector3::from(Vector3i::new(x, y, z)) + Vector3::half();
                    expected.push(space.voxel_at(center).expect("chunk allocated by insert"));
                }
            }
        }
        expected.sort_unstable();

        let actual = collider.voxels(&alloc);
        assert_eq!(actual, expected);
        for voxel in &actual {
            assert_eq!(space.colliders_at(&alloc, *voxel), vec![ColliderId(3)]);
        }
    }

    let last = collider.voxels(&alloc);
    space.remove_collider(&mut alloc, &mut collider);
    assert!(!collider.is_registered());
    for voxel in last {
        assert!(space.colliders_at(&alloc, voxel).is_empty());
    }

    // Every pooled node went back to its pool
    assert_eq!(in_use::<ColliderId>(&alloc), 0);
    assert_eq!(in_use::<VoxelRef>(&alloc), 0);
}

#[test]
fn test_sample_reports_overlapping_colliders() {
    let mut space = small_space();
    let mut alloc = Allocator::new();

    let mut a = Collider::new(ColliderId(7));
    let mut b = Collider::new(ColliderId(2));
    space
        .insert_collider(&mut alloc, &mut a, &Aabb::new(Vector3::new(3.5, 1.5, 1.5), Vector3::one()))
        .expect("registered");
    space
        .insert_collider(&mut alloc, &mut b, &Aabb::new(Vector3::new(4.5, 1.5, 1.5), Vector3::one()))
        .expect("registered");
    assert_eq!(a.chunk_count(), 2);

    let query = Aabb::new(Vector3::new(4.0, 1.5, 1.5), Vector3::splat(0.25));
    let sample = space.sample_occupied_region(&mut alloc, &query).expect("sampled");
    assert_eq!(sample.colliders, vec![ColliderId(2), ColliderId(7)]);

    space.remove_collider(&mut alloc, &mut b);
    let sample = space.sample_occupied_region(&mut alloc, &query).expect("sampled");
    assert_eq!(sample.colliders, vec![ColliderId(7)]);
}

#[test]
fn test_inserting_registered_collider_replaces_its_voxels() {
    let mut space = small_space();
    let mut alloc = Allocator::new();
    let mut collider = Collider::new(ColliderId(4));

    let short = Aabb::new(Vector3::new(2.0, 1.5, 1.5), Vector3::new(1.0, 0.25, 0.25));
    space.insert_collider(&mut alloc, &mut collider, &short).expect("registered");
    assert_eq!(collider.voxels(&alloc).len(), 3);

    // Same chunk, one more voxel
    let long = Aabb::new(Vector3::new(2.0, 1.5, 1.5), Vector3::new(1.9, 0.25, 0.25));
    space.insert_collider(&mut alloc, &mut collider, &long).expect("registered");
    let voxels = collider.voxels(&alloc);
    assert_eq!(voxels.len(), 4);
    assert_eq!(collider.chunk_count(), 1);
    for voxel in &voxels {
        assert_eq!(space.colliders_at(&alloc, *voxel), vec![ColliderId(4)]);
    }

    // Into the next chunk: nothing is left behind in the first one
    let moved = Aabb::new(Vector3::new(6.5, 1.5, 1.5), Vector3::splat(0.25));
    space.insert_collider(&mut alloc, &mut collider, &moved).expect("registered");
    for voxel in &voxels {
        assert!(space.colliders_at(&alloc, *voxel).is_empty());
    }
    assert_eq!(collider.voxels(&alloc).len(), 1);

    space.remove_collider(&mut alloc, &mut collider);
    assert_eq!(in_use::<ColliderId>(&alloc), 0);
    assert_eq!(in_use::<VoxelRef>(&alloc), 0);
}

#[test]
fn test_removing_unregistered_collider_is_noop() {
    let mut space = small_space();
    let mut alloc = Allocator::new();
    let mut collider = Collider::new(ColliderId(9));

    space.remove_collider(&mut alloc, &mut collider);
    assert!(!collider.is_registered());
    assert_eq!(space.allocated_chunks(), 0);
    assert_eq!(alloc.pool_count(), 0);
}
