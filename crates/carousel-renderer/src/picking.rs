//! Picking system for ray-quad intersection
//!
//! Provides CPU-based plane picking using raycasting.

use glam::{Mat4, Vec2, Vec3};

/// Ray for raycasting
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point along the ray at distance `t`
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect a double-sided quad lying in the local XY plane of `world`,
    /// centred on its origin with the given half extents.
    /// Returns the world-space distance to the hit point.
    pub fn intersect_quad(&self, world: &Mat4, half_extents: Vec2) -> Option<f32> {
        let inverse = world.inverse();
        if !inverse.is_finite() {
            return None;
        }
        let origin = inverse.transform_point3(self.origin);
        let direction = inverse.transform_vector3(self.direction);

        // Parallel to the quad
        if direction.z.abs() < 1e-6 {
            return None;
        }

        let t = -origin.z / direction.z;
        if t < 0.0 {
            return None;
        }

        let local = origin + direction * t;
        if local.x.abs() > half_extents.x || local.y.abs() > half_extents.y {
            return None;
        }

        Some((world.transform_point3(local) - self.origin).length())
    }
}

/// Nearest quad hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the quad in the candidate list
    pub index: usize,
    /// World-space distance from the ray origin
    pub distance: f32,
}

/// Test every candidate quad and return the nearest hit.
/// An empty candidate list yields `None`.
pub fn pick_nearest<I>(ray: &Ray, quads: I, half_extents: Vec2) -> Option<Hit>
where
    I: IntoIterator<Item = (usize, Mat4)>,
{
    quads
        .into_iter()
        .filter_map(|(index, world)| {
            ray.intersect_quad(&world, half_extents)
                .map(|distance| Hit { index, distance })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const HALF: Vec2 = Vec2::new(0.5, 0.5);

    #[test]
    fn test_ray_quad_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray.intersect_quad(&Mat4::IDENTITY, HALF);
        assert!((t.unwrap() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_ray_quad_miss() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_quad(&Mat4::IDENTITY, HALF).is_none());
    }

    #[test]
    fn test_quad_behind_ray_is_missed() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray.intersect_quad(&Mat4::IDENTITY, HALF).is_none());
    }

    #[test]
    fn test_back_face_is_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray.intersect_quad(&Mat4::IDENTITY, HALF).is_some());
    }

    #[test]
    fn test_edge_on_quad_is_missed() {
        let world = Mat4::from_quat(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray.intersect_quad(&world, HALF).is_none());
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let quads = vec![
            (0, Mat4::from_translation(Vec3::new(0.0, 0.0, -2.0))),
            (1, Mat4::from_translation(Vec3::new(0.0, 0.0, 3.0))),
            (2, Mat4::from_translation(Vec3::new(4.0, 0.0, 5.0))),
        ];
        let hit = pick_nearest(&ray, quads, HALF).unwrap();
        assert_eq!(hit.index, 1);
        assert!((hit.distance - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_pick_nearest_empty() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(pick_nearest(&ray, Vec::new(), HALF).is_none());
    }
}
