//! Rays, rig transforms and ray/box intersection
//!
//! Coordinate convention: right-handed, +Y up, forward is -Z at yaw 0 and a
//! positive yaw turns left (counter-clockwise seen from above).

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray; returns `None` for a zero-length or non-finite direction
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.try_normalize()?;
        Some(Self { origin, direction })
    }
}

/// Position plus heading of a rigid object that only rotates about +Y
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YawPose {
    pub position: Vec3,
    pub yaw: f32,
}

impl YawPose {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self { position, yaw }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Unit forward vector (-Z rotated by yaw)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_Z
    }

    /// Unit right vector (+X rotated by yaw)
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Transform a point from this pose's local space to world space
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation() * local
    }

    /// Transform a ray from this pose's local space to world space
    pub fn ray_to_world(&self, local: &Ray) -> Ray {
        Ray {
            origin: self.to_world(local.origin),
            direction: self.rotation() * local.direction,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.position)
    }
}

/// Intersect a ray with a box of `size` centred on `transform`'s origin
///
/// The ray is moved into the box's local space and tested against the
/// axis-aligned extents there.
pub fn ray_hits_box(ray: &Ray, transform: Mat4, size: Vec3) -> Option<f32> {
    let inv = transform.inverse();
    let o_local = inv.transform_point3(ray.origin);
    let d_local = inv.transform_vector3(ray.direction);
    let half = size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -half, half)
}

/// Slab-method ray/AABB intersection, returns the entry distance or `None`
///
/// When the origin is inside the box the exit distance is returned.
pub fn ray_aabb_hit_t(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d == 0.0 {
            // Parallel to this slab: must already be inside it
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (mut t0, mut t1) = ((min[axis] - o) * inv, (max[axis] - o) * inv);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(if t_near >= 0.0 { t_near } else { t_far })
}
