//! "Towards" drive primitive: critically damped spring pull with `frequency`
//! as the only tunable. Gains are rescaled against the step size
//! (backward-Euler style) so the pull never diverges, for any positive
//! frequency and any dt. At the target with zero velocity the output is zero.

use tetherphys_core::types::Vec3;
use tetherphys_core::Scalar;
use glam::Quat;

/// (ksg, kdg): stiffness and damping gains for one step of size `dt`.
/// kp/kd are the continuous critically-damped pair for `frequency`; the
/// 1/(1 + kd*dt + kp*dt^2) factor keeps the discrete update stable.
#[inline]
pub fn spring_gains(frequency: Scalar, dt: Scalar) -> (Scalar, Scalar) {
    let kp = (6.0 * frequency) * (6.0 * frequency) * 0.25;
    let kd = 4.5 * frequency;
    let g = 1.0 / (1.0 + kd * dt + kp * dt * dt);
    (kp * g, (kd + kp * dt) * g)
}

/// Force pulling `current` toward `target`, damped against `vel`.
pub fn force_towards(
    current: Vec3, target: Vec3, vel: Vec3,
    frequency: Scalar, dt: Scalar, mass: Scalar,
) -> Vec3 {
    let (ksg, kdg) = spring_gains(frequency, dt);
    ((target - current) * ksg - vel * kdg) * mass
}

/// Torque pulling `current` toward `target` along the shortest arc, damped
/// against `ang_vel`. `inertia` is the isotropic moment of the driven body.
pub fn torque_towards(
    current: Quat, target: Quat, ang_vel: Vec3,
    frequency: Scalar, dt: Scalar, inertia: Scalar,
) -> Vec3 {
    let mut dq = target * current.inverse();
    if dq.w < 0.0 { dq = -dq; } // shortest arc
    let (axis, angle) = dq.to_axis_angle();
    let err = if angle > 1.0e-7 { Vec3::from(axis) * angle } else { Vec3::ZERO };
    let (ksg, kdg) = spring_gains(frequency, dt);
    (err * ksg - ang_vel * kdg) * inertia
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetherphys_core::vec3;

    const DT: Scalar = 1.0 / 90.0;

    #[test] fn zero_at_target_at_rest() {
        let p = vec3(1.0, 2.0, 3.0);
        let f = force_towards(p, p, Vec3::ZERO, 14.0, DT, 1.0);
        assert_eq!(f, Vec3::ZERO);
        let q = Quat::from_rotation_z(0.4);
        let t = torque_towards(q, q, Vec3::ZERO, 14.0, DT, 1.0);
        assert!(t.length() < 1e-6);
    }

    #[test] fn higher_frequency_pulls_harder() {
        let lo = force_towards(Vec3::ZERO, vec3(1.0, 0.0, 0.0), Vec3::ZERO, 7.0, DT, 1.0);
        let hi = force_towards(Vec3::ZERO, vec3(1.0, 0.0, 0.0), Vec3::ZERO, 28.0, DT, 1.0);
        assert!(hi.x > lo.x);
    }

    #[test] fn converges_without_divergence() {
        // Explicitly integrate a unit mass; position error must settle, not blow up.
        for freq in [1.0, 14.0, 200.0] {
            let target = vec3(0.5, -0.3, 1.2);
            let mut p = Vec3::ZERO;
            let mut v = Vec3::ZERO;
            for _ in 0..2000 {
                let f = force_towards(p, target, v, freq, DT, 1.0);
                v += f * DT;
                p += v * DT;
                assert!(p.is_finite());
            }
            assert!((p - target).length() < 1e-2, "freq {freq} did not settle");
        }
    }

    #[test] fn torque_settles_rotation() {
        let target = Quat::from_rotation_y(1.3);
        let mut q = Quat::IDENTITY;
        let mut w = Vec3::ZERO;
        for _ in 0..2000 {
            let t = torque_towards(q, target, w, 14.0, DT, 1.0);
            w += t * DT;
            let dtheta = w * DT;
            let dq = Quat::from_xyzw(dtheta.x * 0.5, dtheta.y * 0.5, dtheta.z * 0.5, 1.0).normalize();
            q = (dq * q).normalize();
        }
        assert!(q.angle_between(target) < 1e-2);
    }
}
