use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use voxel_dynamics::core::Allocator;
use voxel_dynamics::{Aabb, Simulation, SimulationConfig, SpaceConfig, Vector3};

const DT: f32 = 1.0 / 60.0;

/// A 32×32 voxel floor with `n` boxes stacked in columns above it
fn build_world(n: usize) -> Simulation {
    let mut sim = Simulation::new(SimulationConfig::default(), SpaceConfig::default()).expect("valid configuration");
    sim.fill_region(&Aabb::from_low_high(Vector3::new(-16.0, -1.0, -16.0), Vector3::new(15.5, -0.5, 15.5)));

    for i in 0..n {
        let column = (i % 64) as f32;
        let x = (column % 8.0) * 2.0 - 8.0 + 0.5;
        let z = (column / 8.0).floor() * 2.0 - 8.0 + 0.5;
        let y = 1.0 + (i / 64) as f32 * 1.2;
        sim.create_aabb_body(Aabb::new(Vector3::new(x, y, z), Vector3::splat(0.45)), 1.0)
            .expect("valid body");
    }
    sim
}

fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    for &n in &[1usize, 16, 64, 256] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build_world(n),
                |mut sim| {
                    for _ in 0..10 {
                        sim.simulate(DT);
                    }
                    sim
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_list_churn(c: &mut Criterion) {
    c.bench_function("list_insert_sorted_unique", |b| {
        let mut alloc = Allocator::new();
        b.iter(|| {
            let mut list = voxel_dynamics::core::List::new();
            for i in (0..64u32).rev() {
                list.insert_sorted_unique(&mut alloc, i * 7 % 64).expect("pooled node");
            }
            list.free(&mut alloc);
        })
    });
}

criterion_group!(benches, bench_simulate, bench_list_churn);
criterion_main!(benches);
