use criterion::{criterion_group, criterion_main, Criterion, black_box};

use voxsculpt::core::config::GridDimensions;
use voxsculpt::core::camera::Camera;
use voxsculpt::interaction::Picker;
use voxsculpt::persist::codec;
use voxsculpt::voxel::{CoordinateMapper, InstanceSynchronizer, VoxelGrid};
use voxsculpt::voxel::terrain::fill_default_terrain;

use glam::{Vec2, Vec3};

fn terrain(dims: GridDimensions) -> (VoxelGrid, CoordinateMapper) {
    let mut grid = VoxelGrid::new(dims);
    fill_default_terrain(&mut grid, 12345);
    (grid, CoordinateMapper::new(dims, 1.0))
}

fn bench_rebuild_16(c: &mut Criterion) {
    let (grid, mapper) = terrain(GridDimensions::new(16, 12, 16));
    let mut sync = InstanceSynchronizer::new();

    c.bench_function("instance_rebuild_16x12x16", |b| {
        b.iter(|| sync.rebuild(black_box(&grid), &mapper));
    });
}

fn bench_rebuild_64(c: &mut Criterion) {
    let (grid, mapper) = terrain(GridDimensions::new(64, 32, 64));
    let mut sync = InstanceSynchronizer::new();

    c.bench_function("instance_rebuild_64x32x64", |b| {
        b.iter(|| sync.rebuild(black_box(&grid), &mapper));
    });
}

fn bench_pick(c: &mut Criterion) {
    let (grid, mapper) = terrain(GridDimensions::new(16, 12, 16));
    let mut sync = InstanceSynchronizer::new();
    sync.rebuild(&grid, &mapper);
    let camera = Camera::look_at(Vec3::new(11.0, 14.0, 14.0), Vec3::ZERO, Vec3::Y);
    let picker = Picker::default();

    c.bench_function("pick_center_16x12x16", |b| {
        b.iter(|| picker.pick(&camera, black_box(Vec2::ZERO), &grid, &mapper, &sync));
    });
}

fn bench_codec(c: &mut Criterion) {
    let (grid, _) = terrain(GridDimensions::new(16, 12, 16));
    let text = codec::encode(&grid);
    let mut target = grid.clone();

    c.bench_function("snapshot_encode", |b| {
        b.iter(|| codec::encode(black_box(&grid)));
    });
    c.bench_function("snapshot_decode", |b| {
        b.iter(|| codec::decode(black_box(&text), &mut target));
    });
}

criterion_group!(
    benches,
    bench_rebuild_16,
    bench_rebuild_64,
    bench_pick,
    bench_codec,
);
criterion_main!(benches);
