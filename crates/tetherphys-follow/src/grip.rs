use tetherphys_core::types::{Isometry, Vec3};
use glam::Quat;

/// Relative transform between the grab source (hand/controller anchor) and the
/// tracked object, captured once per grab session. The position part is a
/// plain world-space delta; the rotation part is tracked-relative. Both are
/// applied the same way to the tracked frame and the proxy frame, so the two
/// grip poses stay comparable.
///
/// The value is only meaningful while a grab is active; callers gate on grab
/// state. A stale offset after release is never read.
#[derive(Copy, Clone, Debug)]
pub struct GripOffset { pub pos: Vec3, pub rot: Quat }

impl Default for GripOffset {
    fn default() -> Self { Self { pos: Vec3::ZERO, rot: Quat::IDENTITY } }
}

impl GripOffset {
    pub fn capture(tracked: &Isometry, source: &Isometry) -> Self {
        Self {
            pos: source.pos - tracked.pos,
            rot: tracked.rot.inverse() * source.rot,
        }
    }
}

/// World position of a frame's grip point. Pure; same formula for the tracked
/// frame and the proxy frame.
#[inline]
pub fn grip_world_pos(frame: &Isometry, off: &GripOffset) -> Vec3 { frame.pos + off.pos }

/// World rotation of a frame's grip point.
#[inline]
pub fn grip_world_rot(frame: &Isometry, off: &GripOffset) -> Quat { frame.rot * off.rot }

#[cfg(test)]
mod tests {
    use super::*;
    use tetherphys_core::{iso, vec3};

    #[test] fn capture_is_source_minus_tracked() {
        let tracked = iso(vec3(1.0, 0.0, 0.0), Quat::from_rotation_y(0.5));
        let source = iso(vec3(1.2, 0.1, -0.3), Quat::from_rotation_y(0.9));
        let off = GripOffset::capture(&tracked, &source);
        assert!((off.pos - vec3(0.2, 0.1, -0.3)).length() < 1e-6);
        assert!((tracked.rot * off.rot).angle_between(source.rot) < 1e-6);
    }

    #[test] fn equal_frames_give_equal_grip_poses() {
        let off = GripOffset { pos: vec3(0.0, -0.1, 0.05), rot: Quat::from_rotation_x(0.2) };
        let frame = iso(vec3(3.0, 1.0, -2.0), Quat::from_rotation_z(1.1));
        let other = frame;
        assert_eq!(grip_world_pos(&frame, &off), grip_world_pos(&other, &off));
        assert_eq!(grip_world_rot(&frame, &off), grip_world_rot(&other, &off));
    }
}
