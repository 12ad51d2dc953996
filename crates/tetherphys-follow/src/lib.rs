//! Reconciliation core: decide, once per physics step, whether a proxy body is
//! free-following its tracked pose, obstructed by collision, or blending back,
//! and what correction each of those means for the body, the haptics and the
//! ghost visual. The world crate owns the bodies and applies the decisions.

pub mod grip;
pub mod contact;
pub mod mode;
pub mod forces;

pub use grip::{GripOffset, grip_world_pos, grip_world_rot};
pub use contact::ContactTracker;
pub use mode::{Mode, ReturnWindow};
pub use forces::{CorrectiveForces, corrective_forces, catchup_scales};

use tetherphys_core::types::{Isometry, Velocity, Vec3};
use tetherphys_core::{AvatarId, Hand, HandRegistry, Scalar};

/// Tuning constants. Scales are spring frequencies for the drive primitive.
#[derive(Copy, Clone, Debug)]
pub struct FollowParams {
    pub force_catchup_scale: Scalar,   // grip position pull
    pub torque_catchup_scale: Scalar,  // grip rotation pull
    pub max_distance: Scalar,          // alignment error saturates here (m)
    pub joining_back_duration: Scalar, // return blend window (s)
}

impl Default for FollowParams {
    fn default() -> Self {
        Self {
            force_catchup_scale: 14.0,
            torque_catchup_scale: 14.0,
            max_distance: 0.5,
            joining_back_duration: 0.2,
        }
    }
}

/// Grab status polled from the interaction layer each logic step.
#[derive(Clone, Debug, Default)]
pub struct GrabInput {
    pub grabbed: bool,
    /// Present while grabbed: identifier + pose of whatever grabbed us.
    pub source: Option<GrabSource>,
}

#[derive(Clone, Debug)]
pub struct GrabSource {
    pub name: String,
    pub pose: Isometry,
}

/// What the body does this step.
#[derive(Copy, Clone, Debug)]
pub enum BodyCommand {
    /// Direct pose set with velocities zeroed (Free snap, JoiningBack blend).
    SetPose { pose: Isometry },
    /// Corrective drive; forces accumulate and the body integrates.
    Drive { force: Vec3, torque: Vec3, assist: Vec3 },
}

/// One physics step's outcome for a single avatar.
#[derive(Copy, Clone, Debug)]
pub struct StepDecision {
    pub mode: Mode,
    pub body: BodyCommand,
    /// (frequency, amplitude) for the assigned hand; None = nothing to emit.
    pub haptic: Option<(Scalar, Scalar)>,
    /// Some(v) = ghost visibility must become v; None = leave the latch alone.
    pub ghost: Option<bool>,
    pub alignment_error: Scalar,
}

/// Per-avatar reconciliation state: grip session, contact episode, return
/// window. Exclusively owned by one tracked/proxy pair; no cross-instance
/// sharing.
#[derive(Clone, Debug, Default)]
pub struct FollowCtrl {
    pub params: FollowParams,
    hand: Option<Hand>,
    grip: GripOffset,
    grabbed: bool,
    contact: ContactTracker,
    window: ReturnWindow,
}

impl FollowCtrl {
    pub fn new(params: FollowParams) -> Self {
        Self { params, ..Self::default() }
    }

    #[inline] pub fn hand(&self) -> Option<Hand> { self.hand }
    #[inline] pub fn is_grabbed(&self) -> bool { self.grabbed }
    #[inline] pub fn is_colliding(&self) -> bool { self.contact.is_colliding() }
    #[inline] pub fn grip(&self) -> &GripOffset { &self.grip }
    #[inline] pub fn contact(&self) -> &ContactTracker { &self.contact }

    /// Logic-rate update: grab/hand bookkeeping and window expiry.
    ///
    /// The first poll where a grab is active and no hand is assigned resolves
    /// the hand from the source name and captures the grip offset; an
    /// unresolvable name leaves the grab ignored until it resolves. Release
    /// clears the assignment (the offset value goes stale, unread) and
    /// returns the hand so the caller can zero its vibration.
    pub fn poll(
        &mut self,
        now: Scalar,
        tracked: &Isometry,
        grab: &GrabInput,
        registry: &mut HandRegistry,
        id: AvatarId,
    ) -> Option<Hand> {
        self.window.expire(now);
        self.grabbed = grab.grabbed;

        if self.grabbed {
            if self.hand.is_none() {
                if let Some(src) = &grab.source {
                    if let Some(hand) = Hand::from_source_name(&src.name) {
                        self.hand = Some(hand);
                        registry.assign(hand, id);
                        self.grip = GripOffset::capture(tracked, &src.pose);
                    }
                }
            }
            None
        } else if let Some(hand) = self.hand.take() {
            registry.release(hand, id);
            Some(hand)
        } else {
            None
        }
    }

    /// Collision-begin event. The contact spot is recorded only at the start
    /// of a fresh episode outside the return window.
    pub fn on_contact_begin(&mut self, avatar: &Isometry, world_point: Vec3) {
        self.contact.on_begin(avatar, world_point, self.window.armed);
    }

    pub fn on_contact_persist(&mut self) {
        self.contact.on_persist();
    }

    /// Collision-end event: clears the merged flag and arms the return window.
    pub fn on_contact_end(&mut self, now: Scalar) {
        self.contact.on_end();
        self.window.arm(now, self.params.joining_back_duration);
    }

    /// Physics-rate evaluation. Reads the merged state, picks the mode and
    /// produces the correction; mutation of the body is left to the caller.
    pub fn decide(
        &mut self,
        now: Scalar,
        dt: Scalar,
        tracked: &Isometry,
        avatar: &Isometry,
        vel: &Velocity,
        mass: Scalar,
    ) -> StepDecision {
        // Window expiry also runs here: a lagging logic poll must not
        // stretch the blend past its end time.
        self.window.expire(now);

        let mut decision = match mode::evaluate(self.contact.is_colliding(), self.grabbed, self.window.armed) {
            Mode::Colliding => {
                let out = corrective_forces(
                    &self.params, self.window.armed, tracked, avatar, vel,
                    &self.grip, &self.contact, dt, mass,
                );
                StepDecision {
                    mode: Mode::Colliding,
                    body: BodyCommand::Drive { force: out.force, torque: out.torque, assist: out.assist },
                    haptic: None,
                    ghost: Some(true),
                    alignment_error: out.alignment_error,
                }
            }
            Mode::JoiningBack => {
                let s = self.window.fraction(now, self.params.joining_back_duration);
                let pose = Isometry {
                    pos: avatar.pos.lerp(tracked.pos, s),
                    rot: avatar.rot.slerp(tracked.rot, s),
                };
                StepDecision {
                    mode: Mode::JoiningBack,
                    body: BodyCommand::SetPose { pose },
                    haptic: None,
                    ghost: None, // latch untouched until the mode resolves
                    alignment_error: 0.0,
                }
            }
            Mode::Free => StepDecision {
                mode: Mode::Free,
                body: BodyCommand::SetPose { pose: *tracked },
                haptic: None,
                ghost: Some(false),
                alignment_error: 0.0,
            },
        };

        // The haptic signal follows the raw flags, not the mode: a held,
        // obstructed proxy reports its alignment error; an obstructed but
        // unheld one emits a faint idle rumble; a held unobstructed one goes
        // silent. Ungrabbed and clear means nothing to emit.
        decision.haptic = match (self.grabbed, self.contact.is_colliding()) {
            (true, true) => Some((decision.alignment_error, decision.alignment_error)),
            (false, true) => Some((0.0, 0.1)),
            (true, false) => Some((0.0, 0.0)),
            (false, false) => None,
        };
        decision
    }
}
