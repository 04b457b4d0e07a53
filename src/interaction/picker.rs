//! Screen-space picking against rendered block instances.
//!
//! A pick resolves to at most one removal candidate (the block under the
//! pointer) and at most one placement candidate (the empty neighbor across
//! the face that was hit).

use glam::{IVec3, Vec2, Vec3};

use crate::core::camera::Camera;
use crate::core::config::EditorConfig;
use crate::math::{Aabb, Ray};
use crate::voxel::block::BlockType;
use crate::voxel::coords::{Cell, CoordinateMapper, SnapMode};
use crate::voxel::grid::VoxelGrid;
use crate::voxel::instancing::InstanceSynchronizer;

/// What the pick ray struck
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PickTarget {
    /// A rendered block instance
    Instance { block: BlockType, index: usize },
    /// The implicit ground plane under the grid
    Ground,
}

/// Nearest intersection along a pick ray
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub target: PickTarget,
    pub distance: f32,
    pub point: Vec3,
    /// Outward face normal, one unit along a single axis
    pub normal: IVec3,
}

/// Candidates produced by a pick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PickResult {
    /// Empty in-bounds cell a new block could go into
    pub place: Option<Cell>,
    /// Occupied cell that could be removed
    pub remove: Option<Cell>,
    pub hit: Option<PickHit>,
}

impl PickResult {
    pub const NONE: PickResult = PickResult { place: None, remove: None, hit: None };

    pub fn has_candidate(&self) -> bool {
        self.place.is_some() || self.remove.is_some()
    }
}

/// Resolves rays into placement and removal candidates
#[derive(Clone, Copy, Debug)]
pub struct Picker {
    /// Inward nudge applied to hit points, in block-size units
    nudge: f32,
    ground_fallback: bool,
}

impl Picker {
    pub fn new(nudge: f32, ground_fallback: bool) -> Self {
        Self { nudge, ground_fallback }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.pick_nudge, config.ground_fallback)
    }

    /// Pick through a normalized device coordinate of `camera`
    pub fn pick(
        &self,
        camera: &Camera,
        ndc: Vec2,
        grid: &VoxelGrid,
        mapper: &CoordinateMapper,
        instances: &InstanceSynchronizer,
    ) -> PickResult {
        self.pick_ray(&camera.screen_ray(ndc), grid, mapper, instances)
    }

    /// Pick along an explicit world-space ray
    pub fn pick_ray(
        &self,
        ray: &Ray,
        grid: &VoxelGrid,
        mapper: &CoordinateMapper,
        instances: &InstanceSynchronizer,
    ) -> PickResult {
        if let Some(hit) = nearest_instance_hit(ray, mapper, instances) {
            return self.resolve_block_hit(hit, grid, mapper);
        }
        if self.ground_fallback {
            return self.resolve_ground_hit(ray, grid, mapper);
        }
        PickResult::NONE
    }

    fn resolve_block_hit(
        &self,
        hit: PickHit,
        grid: &VoxelGrid,
        mapper: &CoordinateMapper,
    ) -> PickResult {
        // Push the hit point back inside the block it landed on
        let inside = hit.point - hit.normal.as_vec3() * (self.nudge * mapper.block_size());
        let Some(hit_cell) = mapper.world_to_cell(inside, SnapMode::Snapped) else {
            return PickResult { hit: Some(hit), ..PickResult::NONE };
        };

        let remove = (!grid.get_cell(hit_cell).is_empty()).then_some(hit_cell);

        let neighbor = hit_cell.offset(hit.normal);
        let place = (mapper.contains(neighbor) && grid.get_cell(neighbor).is_empty())
            .then_some(neighbor);

        PickResult { place, remove, hit: Some(hit) }
    }

    fn resolve_ground_hit(
        &self,
        ray: &Ray,
        grid: &VoxelGrid,
        mapper: &CoordinateMapper,
    ) -> PickResult {
        let Some(distance) = ray.intersects_horizontal_plane(mapper.ground_height()) else {
            return PickResult::NONE;
        };
        let point = ray.at(distance);
        let Some(cell) = mapper.world_to_cell(point, SnapMode::Ground) else {
            return PickResult::NONE;
        };
        let hit = PickHit {
            target: PickTarget::Ground,
            distance,
            point,
            normal: IVec3::Y,
        };
        if grid.get_cell(cell).is_empty() {
            PickResult { place: Some(cell), remove: None, hit: Some(hit) }
        } else {
            PickResult { place: None, remove: Some(cell), hit: Some(hit) }
        }
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(0.01, true)
    }
}

/// Nearest visible instance along the ray.
///
/// Ties keep the first instance in batch order, so equal-distance hits are
/// resolved the same way every time.
fn nearest_instance_hit(
    ray: &Ray,
    mapper: &CoordinateMapper,
    instances: &InstanceSynchronizer,
) -> Option<PickHit> {
    let half = Vec3::splat(mapper.block_size() * 0.5);
    let mut best: Option<PickHit> = None;

    for batch in instances.batches() {
        for (index, instance) in batch.instances().iter().enumerate() {
            let bounds = Aabb::from_center_half_extent(Vec3::from(instance.position), half);
            let Some(hit) = ray.hit_aabb(&bounds) else {
                continue;
            };
            if best.is_some_and(|b| hit.distance >= b.distance) {
                continue;
            }
            best = Some(PickHit {
                target: PickTarget::Instance { block: batch.block(), index },
                distance: hit.distance,
                point: hit.point,
                normal: hit.normal.round().as_ivec3(),
            });
        }
    }

    best
}
