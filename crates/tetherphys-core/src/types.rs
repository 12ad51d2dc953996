use glam::{Vec3A, Quat};
use crate::Scalar;

pub type Vec3 = Vec3A;

#[inline] pub fn vec3(x: Scalar, y: Scalar, z: Scalar) -> Vec3 { Vec3::new(x, y, z) }
#[inline] pub fn iso(pos: Vec3, rot: Quat) -> Isometry { Isometry { pos, rot } }
#[inline] pub fn quat_identity() -> Quat { Quat::IDENTITY }

/// Rigid pose: position + rotation. Used for both the tracked frame and the
/// proxy-body frame.
#[derive(Copy, Clone, Debug)]
pub struct Isometry { pub pos: Vec3, pub rot: Quat }

impl Isometry {
    /// Local point -> world.
    #[inline] pub fn transform_point(&self, p: Vec3) -> Vec3 { self.pos + self.rot * p }
    /// World point -> local.
    #[inline] pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        self.rot.inverse() * (p - self.pos)
    }
}

impl Default for Isometry {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct Velocity { pub lin: Vec3, pub ang: Vec3 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn point_roundtrip() {
        let p = iso(vec3(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let w = p.transform_point(vec3(0.3, -0.1, 0.5));
        let l = p.inverse_transform_point(w);
        assert!((l - vec3(0.3, -0.1, 0.5)).length() < 1e-6);
    }
}
