use tetherphys_core::types::{Isometry, Velocity, Vec3};
use tetherphys_core::Scalar;
use glam::Quat;

/// Input descriptor when creating a proxy body.
#[derive(Copy, Clone, Debug)]
pub struct BodyDesc {
    pub pose: Isometry,
    pub vel: Velocity,
    pub inv_mass: Scalar,
}

/// SoA proxy-body storage with ID = index semantics. One body per avatar;
/// forces/torques accumulate during the step and are consumed by `integrate`.
/// Rotational inertia is isotropic (inv_mass about every axis), which is all
/// the corrective model needs.
pub struct Bodies {
    pos: Vec<Vec3>,
    rot: Vec<Quat>,
    linvel: Vec<Vec3>,
    angvel: Vec<Vec3>,
    inv_mass: Vec<Scalar>,
    force: Vec<Vec3>,
    torque: Vec<Vec3>,
}

impl Bodies {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            pos: Vec::with_capacity(cap),
            rot: Vec::with_capacity(cap),
            linvel: Vec::with_capacity(cap),
            angvel: Vec::with_capacity(cap),
            inv_mass: Vec::with_capacity(cap),
            force: Vec::with_capacity(cap),
            torque: Vec::with_capacity(cap),
        }
    }

    pub fn add(&mut self, desc: BodyDesc) -> u32 {
        self.pos.push(desc.pose.pos);
        self.rot.push(desc.pose.rot);
        self.linvel.push(desc.vel.lin);
        self.angvel.push(desc.vel.ang);
        self.inv_mass.push(desc.inv_mass);
        self.force.push(Vec3::ZERO);
        self.torque.push(Vec3::ZERO);
        (self.pos.len() as u32) - 1
    }

    #[inline] pub fn len(&self) -> usize { self.pos.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.pos.is_empty() }

    #[inline] pub fn pose(&self, id: u32) -> Isometry {
        let i = id as usize;
        Isometry { pos: self.pos[i], rot: self.rot[i] }
    }
    #[inline] pub fn set_pose(&mut self, id: u32, iso: Isometry) {
        let i = id as usize;
        self.pos[i] = iso.pos;
        self.rot[i] = iso.rot;
    }

    #[inline] pub fn vel(&self, id: u32) -> Velocity {
        let i = id as usize;
        Velocity { lin: self.linvel[i], ang: self.angvel[i] }
    }
    #[inline] pub fn set_vel(&mut self, id: u32, v: Velocity) {
        let i = id as usize;
        self.linvel[i] = v.lin;
        self.angvel[i] = v.ang;
    }
    #[inline] pub fn zero_vel(&mut self, id: u32) {
        self.set_vel(id, Velocity::default());
    }

    #[inline] pub fn inv_mass_of(&self, id: u32) -> Scalar { self.inv_mass[id as usize] }
    #[inline] pub fn mass_of(&self, id: u32) -> Scalar {
        let im = self.inv_mass[id as usize];
        if im > 0.0 { 1.0 / im } else { 0.0 }
    }

    /// Accumulate a world-space force for this step.
    #[inline] pub fn apply_force(&mut self, id: u32, f: Vec3) {
        self.force[id as usize] += f;
    }
    /// Accumulate a world-space torque for this step.
    #[inline] pub fn apply_torque(&mut self, id: u32, t: Vec3) {
        self.torque[id as usize] += t;
    }

    /// Drop anything accumulated but not yet integrated. Used when a body is
    /// pose-set directly mid-step (snap/blend paths).
    #[inline] pub fn clear_accumulators(&mut self, id: u32) {
        let i = id as usize;
        self.force[i] = Vec3::ZERO;
        self.torque[i] = Vec3::ZERO;
    }

    /// Semi-implicit Euler over all bodies; consumes the accumulators.
    pub fn integrate_all(&mut self, dt: Scalar) {
        for i in 0..self.len() {
            let im = self.inv_mass[i];
            if im == 0.0 {
                self.force[i] = Vec3::ZERO;
                self.torque[i] = Vec3::ZERO;
                continue;
            }
            self.linvel[i] += self.force[i] * im * dt;
            self.pos[i] += self.linvel[i] * dt;

            self.angvel[i] += self.torque[i] * im * dt;
            let dtheta = self.angvel[i] * dt;
            if dtheta.length_squared() > 0.0 {
                // Small-angle quaternion: (v*0.5, 1) normalized.
                let dq = Quat::from_xyzw(dtheta.x * 0.5, dtheta.y * 0.5, dtheta.z * 0.5, 1.0).normalize();
                self.rot[i] = (dq * self.rot[i]).normalize();
            }

            self.force[i] = Vec3::ZERO;
            self.torque[i] = Vec3::ZERO;
        }
    }

    // Iterator for hashing in stable order
    pub fn indices(&self) -> impl ExactSizeIterator<Item = u32> + '_ {
        0..(self.len() as u32)
    }
}

impl Default for Bodies {
    fn default() -> Self { Self::with_capacity(0) }
}
