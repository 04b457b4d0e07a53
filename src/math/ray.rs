//! Ray type and operations

use crate::core::types::Vec3;
use super::aabb::Aabb;

/// A ray defined by origin and direction
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Precomputed 1/direction for fast AABB intersection
    pub inv_direction: Vec3,
}

/// Entry point of a ray into a box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the ray
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Outward unit normal of the entered face (axis-aligned)
    pub normal: Vec3,
}

impl Ray {
    /// Create a new ray (direction should be normalized)
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(
                1.0 / direction.x,
                1.0 / direction.y,
                1.0 / direction.z,
            ),
        }
    }

    /// Get point along ray at parameter t
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test that also reports which face was entered.
    ///
    /// Rays starting inside the box report no hit: there is no entry face.
    /// When the ray enters through an edge, the face is chosen in x, y, z order.
    /// An axis the ray runs parallel to only bounds it by containment, so rays
    /// lying exactly in a face plane still hit the boxes sharing that face.
    pub fn hit_aabb(&self, aabb: &Aabb) -> Option<RayHit> {
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;
        let mut entry_axis = None;

        for axis in 0..3 {
            let origin = self.origin[axis];
            let (lo, hi) = (aabb.min[axis], aabb.max[axis]);
            if self.direction[axis] == 0.0 {
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }
            let inv = self.inv_direction[axis];
            let a = (lo - origin) * inv;
            let b = (hi - origin) * inv;
            let (t0, t1) = (a.min(b), a.max(b));
            if entry_axis.is_none() || t0 > t_near {
                t_near = t0;
                entry_axis = Some(axis);
            }
            t_far = t_far.min(t1);
        }

        let axis = entry_axis?;
        if t_near > t_far || t_near < 0.0 {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[axis] = -self.direction[axis].signum();

        Some(RayHit {
            distance: t_near,
            point: self.at(t_near),
            normal,
        })
    }

    /// Intersect with the horizontal plane `y = height`, facing either way.
    pub fn intersects_horizontal_plane(&self, height: f32) -> Option<f32> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.direction.y;
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(ray.at(5.0), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_hit_aabb_top_face() {
        let ray = Ray::new(Vec3::new(0.5, 5.0, 0.5), Vec3::NEG_Y);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let hit = ray.hit_aabb(&aabb).expect("should hit");
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.point.y - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_hit_aabb_side_face() {
        let ray = Ray::new(Vec3::new(3.0, 0.5, 0.5), Vec3::NEG_X);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let hit = ray.hit_aabb(&aabb).expect("should hit");
        assert_eq!(hit.normal, Vec3::X);
        assert!((hit.distance - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_hit_aabb_from_inside() {
        let ray = Ray::new(Vec3::splat(0.5), Vec3::X);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.hit_aabb(&aabb).is_none());
    }

    #[test]
    fn test_horizontal_plane() {
        let down = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::NEG_Y);
        assert_eq!(down.intersects_horizontal_plane(0.0), Some(4.0));

        let up = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::Y);
        assert!(up.intersects_horizontal_plane(0.0).is_none());

        let flat = Ray::new(Vec3::new(0.0, 4.0, 0.0), Vec3::X);
        assert!(flat.intersects_horizontal_plane(0.0).is_none());
    }

    #[test]
    fn test_hit_aabb_miss() {
        let ray = Ray::new(Vec3::new(-2.0, 5.0, 0.5), Vec3::X);
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(ray.hit_aabb(&aabb).is_none());
    }

    #[test]
    fn test_hit_aabb_ray_in_face_plane() {
        // Axis-aligned ray lying exactly in the plane x = 0 shared by two boxes
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.5), Vec3::NEG_Y);
        let left = Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        let right = Aabb::new(Vec3::ZERO, Vec3::ONE);

        for aabb in [left, right] {
            let hit = ray.hit_aabb(&aabb).expect("ray on the shared face should hit");
            assert!((hit.distance - 4.0).abs() < 1e-4);
            assert_eq!(hit.normal, Vec3::Y);
            assert!(hit.point.is_finite());
        }

        // Parallel axis outside the slab
        let outside = Ray::new(Vec3::new(1.5, 5.0, 0.5), Vec3::NEG_Y);
        assert!(outside.hit_aabb(&right).is_none());
    }
}
