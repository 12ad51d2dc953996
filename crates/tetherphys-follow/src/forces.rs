use tetherphys_core::types::{Isometry, Velocity, Vec3};
use tetherphys_core::Scalar;
use tetherphys_drive::{force_towards, torque_towards};

use crate::contact::ContactTracker;
use crate::grip::{GripOffset, grip_world_pos, grip_world_rot};
use crate::FollowParams;

/// Output of the corrective model for one Colliding step.
#[derive(Copy, Clone, Debug)]
pub struct CorrectiveForces {
    /// Grip-point pull toward the tracked grip position.
    pub force: Vec3,
    /// Grip-rotation pull toward the tracked grip rotation.
    pub torque: Vec3,
    /// Half-strength contact-spot pull (right position, bent grip).
    pub assist: Vec3,
    /// Normalized spot separation in [0, 1].
    pub alignment_error: Scalar,
}

/// Corrective gain pair for one step; exactly 4x base inside the urgent
/// window.
#[inline]
pub fn catchup_scales(params: &FollowParams, urgent: bool) -> (Scalar, Scalar) {
    if urgent {
        (params.force_catchup_scale * 4.0, params.torque_catchup_scale * 4.0)
    } else {
        (params.force_catchup_scale, params.torque_catchup_scale)
    }
}

pub fn corrective_forces(
    params: &FollowParams,
    urgent: bool,
    tracked: &Isometry,
    avatar: &Isometry,
    vel: &Velocity,
    grip: &GripOffset,
    contact: &ContactTracker,
    dt: Scalar,
    mass: Scalar,
) -> CorrectiveForces {
    let (fscale, tscale) = catchup_scales(params, urgent);

    let force = force_towards(
        grip_world_pos(avatar, grip), grip_world_pos(tracked, grip),
        vel.lin, fscale, dt, mass,
    );
    let torque = torque_towards(
        grip_world_rot(avatar, grip), grip_world_rot(tracked, grip),
        vel.ang, tscale, dt, mass,
    );

    let avatar_spot = contact.avatar_spot_world(avatar);
    let tracked_spot = contact.tracked_spot_world(tracked);
    let assist = force_towards(avatar_spot, tracked_spot, vel.lin, fscale * 0.5, dt, mass);

    // max_distance is nonzero by configuration; the clamp still bounds any
    // nonnegative distance into [0, 1].
    let alignment_error = (avatar_spot.distance(tracked_spot) / params.max_distance).clamp(0.0, 1.0);

    CorrectiveForces { force, torque, assist, alignment_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetherphys_core::{iso, vec3, quat_identity};

    const DT: Scalar = 1.0 / 90.0;

    fn params() -> FollowParams { FollowParams::default() }

    #[test] fn urgent_scales_are_exactly_4x() {
        let p = params();
        let (f0, t0) = catchup_scales(&p, false);
        let (f1, t1) = catchup_scales(&p, true);
        assert_eq!(f1, f0 * 4.0);
        assert_eq!(t1, t0 * 4.0);
    }

    #[test] fn aligned_pair_produces_no_correction() {
        let pose = iso(vec3(0.3, 1.0, -0.2), quat_identity());
        let out = corrective_forces(
            &params(), false, &pose, &pose, &Velocity::default(),
            &GripOffset::default(), &ContactTracker::default(), DT, 1.0,
        );
        assert!(out.force.length() < 1e-6);
        assert!(out.torque.length() < 1e-6);
        assert!(out.assist.length() < 1e-6);
        assert_eq!(out.alignment_error, 0.0);
    }

    #[test] fn force_points_from_avatar_toward_tracked() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let tracked = iso(vec3(1.0, 0.0, 0.0), quat_identity());
        let out = corrective_forces(
            &params(), false, &tracked, &avatar, &Velocity::default(),
            &GripOffset::default(), &ContactTracker::default(), DT, 1.0,
        );
        assert!(out.force.x > 0.0);
        assert!(out.assist.x > 0.0);
        assert!(out.assist.x < out.force.x); // half-strength pull
    }

    #[test] fn recorded_spot_drives_the_assist_pull() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let tracked = iso(vec3(1.0, 0.0, 0.0), quat_identity());
        let mut contact = ContactTracker::default();
        contact.on_begin(&avatar, vec3(0.2, 0.0, 0.0), false);

        let out = corrective_forces(
            &params(), false, &tracked, &avatar, &Velocity::default(),
            &GripOffset::default(), &contact, DT, 1.0,
        );
        // Spot separation equals the frame separation here: 1m, saturated.
        assert!(out.assist.x > 0.0);
        assert_eq!(out.alignment_error, 1.0);
    }

    #[test] fn alignment_error_saturates_at_one() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let tracked = iso(vec3(10.0, 0.0, 0.0), quat_identity());
        let out = corrective_forces(
            &params(), false, &tracked, &avatar, &Velocity::default(),
            &GripOffset::default(), &ContactTracker::default(), DT, 1.0,
        );
        assert_eq!(out.alignment_error, 1.0);

        let near = iso(vec3(0.25, 0.0, 0.0), quat_identity());
        let out = corrective_forces(
            &params(), false, &near, &avatar, &Velocity::default(),
            &GripOffset::default(), &ContactTracker::default(), DT, 1.0,
        );
        assert!((out.alignment_error - 0.5).abs() < 1e-5);
    }
}
