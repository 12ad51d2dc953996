use tetherphys_core::types::{Isometry, Vec3};

/// Merged collision state plus the contact spot of the current episode.
///
/// Enter/stay/exit arrive as edge-triggered events (zero, one or many per
/// physics step) and are folded into the `colliding` flag rather than
/// re-derived each step. The spot is written only on the no-contact ->
/// first-contact transition of an episode; the same local coordinates go into
/// both the avatar-side and tracked-side spots (the two frames are assumed to
/// share comparable local frames - an approximation, not a geometric
/// guarantee).
#[derive(Copy, Clone, Debug, Default)]
pub struct ContactTracker {
    avatar_spot: Vec3,
    tracked_spot: Vec3,
    colliding: bool,
}

impl ContactTracker {
    /// `keep_spot` suppresses the spot re-record (begin events that land
    /// inside an armed return window keep the episode's old spot).
    pub fn on_begin(&mut self, avatar: &Isometry, world_point: Vec3, keep_spot: bool) {
        if !self.colliding && !keep_spot {
            let local = avatar.inverse_transform_point(world_point);
            self.avatar_spot = local;
            self.tracked_spot = local;
        }
        self.colliding = true;
    }

    pub fn on_persist(&mut self) { self.colliding = true; }

    pub fn on_end(&mut self) { self.colliding = false; }

    #[inline] pub fn is_colliding(&self) -> bool { self.colliding }

    /// (avatar-local, tracked-local) spot coordinates.
    #[inline] pub fn spots_local(&self) -> (Vec3, Vec3) { (self.avatar_spot, self.tracked_spot) }

    #[inline] pub fn avatar_spot_world(&self, avatar: &Isometry) -> Vec3 {
        avatar.transform_point(self.avatar_spot)
    }
    #[inline] pub fn tracked_spot_world(&self, tracked: &Isometry) -> Vec3 {
        tracked.transform_point(self.tracked_spot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetherphys_core::{iso, vec3, quat_identity};
    use glam::Quat;

    #[test] fn first_contact_records_shared_local_spot() {
        let avatar = iso(vec3(1.0, 0.0, 0.0), Quat::from_rotation_y(0.5));
        let mut t = ContactTracker::default();
        let p = vec3(1.5, 0.2, 0.1);
        t.on_begin(&avatar, p, false);
        assert!(t.is_colliding());
        let (a, b) = t.spots_local();
        assert_eq!(a, b);
        assert!((t.avatar_spot_world(&avatar) - p).length() < 1e-5);
    }

    #[test] fn later_contacts_do_not_move_the_spot() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let mut t = ContactTracker::default();
        t.on_begin(&avatar, vec3(0.1, 0.0, 0.0), false);
        let first = t.spots_local().0;
        t.on_persist();
        t.on_begin(&avatar, vec3(9.0, 9.0, 9.0), false);
        assert_eq!(t.spots_local().0, first);
    }

    #[test] fn end_clears_flag_and_next_episode_rerecords() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let mut t = ContactTracker::default();
        t.on_begin(&avatar, vec3(0.1, 0.0, 0.0), false);
        t.on_end();
        assert!(!t.is_colliding());
        t.on_begin(&avatar, vec3(0.0, 0.4, 0.0), false);
        assert_eq!(t.spots_local().0, vec3(0.0, 0.4, 0.0));
    }

    #[test] fn keep_spot_merges_flag_without_rerecord() {
        let avatar = iso(vec3(0.0, 0.0, 0.0), quat_identity());
        let mut t = ContactTracker::default();
        t.on_begin(&avatar, vec3(0.1, 0.0, 0.0), false);
        t.on_end();
        t.on_begin(&avatar, vec3(5.0, 0.0, 0.0), true);
        assert!(t.is_colliding());
        assert_eq!(t.spots_local().0, vec3(0.1, 0.0, 0.0));
    }
}
