use blake3::Hasher;
use crate::types::{Isometry, Velocity};

/// Thin wrapper so downstream crates hash world state without naming blake3.
pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { StepHasher(Hasher::new()) }
    pub fn update_bytes(&mut self, bytes: &[u8]) { self.0.update(bytes); }
    pub fn finalize(self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

impl Default for StepHasher {
    fn default() -> Self { Self::new() }
}

#[inline]
pub fn hash_pose(h: &mut StepHasher, p: &Isometry) {
    for c in [p.pos.x, p.pos.y, p.pos.z, p.rot.x, p.rot.y, p.rot.z, p.rot.w] {
        h.update_bytes(&c.to_le_bytes());
    }
}

#[inline]
pub fn hash_velocity(h: &mut StepHasher, v: &Velocity) {
    for c in [v.lin.x, v.lin.y, v.lin.z, v.ang.x, v.ang.y, v.ang.z] {
        h.update_bytes(&c.to_le_bytes());
    }
}
