//! Fixed-step harness for tracked/proxy pairs. Owns the proxy bodies and one
//! `FollowCtrl` per pair, merges queued collision events into controller state
//! before each evaluation, applies the resulting step decisions through the
//! body storage, and hashes world state per step for determinism checks.
//!
//! Two rates: `poll` runs at the logic rate (grab/hand bookkeeping, timer
//! expiry), `step` at the fixed physics rate.

use tetherphys_core::{
    AvatarId, Hand, HandRegistry, Scalar, StepHasher, StepStage,
    hash_pose, hash_velocity,
};
use tetherphys_core::types::{Isometry, Velocity, Vec3};
use tetherphys_body::{Bodies, BodyDesc};
use tetherphys_follow::{BodyCommand, FollowCtrl, FollowParams, GrabInput, Mode};
use tetherphys_feedback::{HapticSink, NullHaptics};
use tetherphys_viz::{DebugSettings, GhostVisual, Ledger, LedgerEvent, NullGhost, ScheduleRecorder};

/// Queued collision callback, merged at the top of the next step.
#[derive(Copy, Clone, Debug)]
enum ContactEvent {
    Begin { world_point: Vec3 },
    Persist,
    End,
}

struct Slot {
    body: u32,
    tracked: Isometry,
    grab: GrabInput,
    pending: Vec<ContactEvent>,
    ctrl: FollowCtrl,
    ghost_visible: bool, // latch; toggled through the GhostVisual boundary
    last_mode: Option<Mode>,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct StepStats {
    pub evaluated: u32,
    pub colliding: u32,
    pub joining_back: u32,
    pub contacts_merged: u32,
}

pub struct World {
    bodies: Bodies,
    slots: Vec<Slot>,
    registry: HandRegistry,
    ledger: Ledger,
    debug: DebugSettings,
    schedule: ScheduleRecorder,
    tick: u64,
    time: Scalar,
}

impl World {
    pub fn new() -> Self { Self::with_capacity(8) }

    pub fn with_capacity(pairs: usize) -> Self {
        Self {
            bodies: Bodies::with_capacity(pairs),
            slots: Vec::with_capacity(pairs),
            registry: HandRegistry::new(),
            ledger: Ledger::new(4096),
            debug: DebugSettings::default(),
            schedule: ScheduleRecorder::new(),
            tick: 0,
            time: 0.0,
        }
    }

    /* ---------- composition ---------- */

    /// Adds a tracked/proxy pair; the proxy body starts at the tracked pose.
    pub fn add_avatar(&mut self, pose: Isometry, mass: Scalar, params: FollowParams) -> AvatarId {
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        let body = self.bodies.add(BodyDesc { pose, vel: Velocity::default(), inv_mass });
        self.slots.push(Slot {
            body,
            tracked: pose,
            grab: GrabInput::default(),
            pending: Vec::new(),
            ctrl: FollowCtrl::new(params),
            ghost_visible: true, // ghost meshes start enabled; first Free step hides them
            last_mode: None,
        });
        AvatarId(body)
    }

    pub fn set_debug(&mut self, cfg: DebugSettings) { self.debug = cfg; }

    /* ---------- per-frame inputs ---------- */

    /// Tracked pose of the real object, polled in by the caller every frame.
    pub fn set_tracked_pose(&mut self, id: AvatarId, pose: Isometry) {
        self.slots[id.0 as usize].tracked = pose;
    }

    pub fn set_grab(&mut self, id: AvatarId, grab: GrabInput) {
        self.slots[id.0 as usize].grab = grab;
    }

    /// Collision callbacks: queued, then merged synchronously at the top of
    /// the next step so ordering stays deterministic. Zero, one or many may
    /// arrive between steps.
    pub fn contact_begin(&mut self, id: AvatarId, world_point: Vec3) {
        self.slots[id.0 as usize].pending.push(ContactEvent::Begin { world_point });
    }
    pub fn contact_persist(&mut self, id: AvatarId) {
        self.slots[id.0 as usize].pending.push(ContactEvent::Persist);
    }
    pub fn contact_end(&mut self, id: AvatarId) {
        self.slots[id.0 as usize].pending.push(ContactEvent::End);
    }

    /* ---------- logic step ---------- */

    pub fn poll(&mut self) { self.poll_with(&mut NullHaptics); }

    /// Grab/hand bookkeeping at the logic rate. A release zeroes the freed
    /// hand's vibration.
    pub fn poll_with(&mut self, haptics: &mut dyn HapticSink) {
        let now = self.time;
        for slot in &mut self.slots {
            let id = AvatarId(slot.body);
            if let Some(hand) = slot.ctrl.poll(now, &slot.tracked, &slot.grab, &mut self.registry, id) {
                haptics.set_vibration(hand, 0.0, 0.0);
            }
        }
    }

    /* ---------- physics step ---------- */

    pub fn step(&mut self, dt: Scalar) -> StepStats {
        self.step_with(dt, &mut NullHaptics, &mut NullGhost)
    }

    pub fn step_with(
        &mut self,
        dt: Scalar,
        haptics: &mut dyn HapticSink,
        ghosts: &mut dyn GhostVisual,
    ) -> StepStats {
        self.tick = self.tick.wrapping_add(1);
        self.time += dt;
        let now = self.time;
        self.schedule.clear();
        self.ledger.clear();

        let mut stats = StepStats::default();

        // Merge queued collision events into controller state first; the mode
        // evaluation below must see a settled picture.
        self.schedule.push(StepStage::MergeEvents);
        for slot in &mut self.slots {
            let id = slot.body;
            let pose = self.bodies.pose(id);
            for ev in slot.pending.drain(..) {
                stats.contacts_merged += 1;
                match ev {
                    ContactEvent::Begin { world_point } => {
                        slot.ctrl.on_contact_begin(&pose, world_point);
                        self.ledger.push(LedgerEvent::ContactBegin { id });
                    }
                    ContactEvent::Persist => slot.ctrl.on_contact_persist(),
                    ContactEvent::End => {
                        slot.ctrl.on_contact_end(now);
                        self.ledger.push(LedgerEvent::ContactEnd { id });
                    }
                }
            }
        }

        self.schedule.push(StepStage::Evaluate);
        self.schedule.push(StepStage::ApplyCommands);
        for slot in &mut self.slots {
            let id = slot.body;
            let pose = self.bodies.pose(id);
            let vel = self.bodies.vel(id);
            let mass = self.bodies.mass_of(id);

            let decision = slot.ctrl.decide(now, dt, &slot.tracked, &pose, &vel, mass);
            slot.last_mode = Some(decision.mode);
            stats.evaluated += 1;
            match decision.mode {
                Mode::Colliding => stats.colliding += 1,
                Mode::JoiningBack => stats.joining_back += 1,
                Mode::Free => {}
            }
            self.ledger.push(LedgerEvent::Mode { id, mode: mode_name(decision.mode) });

            match decision.body {
                BodyCommand::SetPose { pose } => {
                    self.bodies.set_pose(id, pose);
                    self.bodies.zero_vel(id);
                    self.bodies.clear_accumulators(id);
                    self.ledger.push(LedgerEvent::Snap { id });
                }
                BodyCommand::Drive { force, torque, assist } => {
                    let f = force + assist;
                    self.bodies.apply_force(id, f);
                    self.bodies.apply_torque(id, torque);
                    self.ledger.push(LedgerEvent::Drive {
                        id,
                        f: [f.x, f.y, f.z],
                        tau: [torque.x, torque.y, torque.z],
                    });
                }
            }

            // No assigned hand -> no haptic coupling this step.
            if let (Some(hand), Some((freq, amp))) = (slot.ctrl.hand(), decision.haptic) {
                haptics.set_vibration(hand, freq, amp);
                self.ledger.push(LedgerEvent::Haptic {
                    id, hand: hand.into(), freq, amp,
                });
            }

            if let Some(visible) = decision.ghost {
                if slot.ghost_visible != visible {
                    slot.ghost_visible = visible;
                    ghosts.set_ghost_visible(id, visible);
                    self.ledger.push(LedgerEvent::Ghost { id, visible });
                }
            }
        }

        self.schedule.push(StepStage::Integrate);
        self.bodies.integrate_all(dt);

        if self.debug.print_every != 0 && (self.tick as u32) % self.debug.print_every == 0 {
            self.print_debug_block();
        }
        if self.debug.json_every != 0 && (self.tick as u32) % self.debug.json_every == 0 {
            let _ = self.ledger.write_jsonl("out", self.tick);
        }
        stats
    }

    /* ---------- readers ---------- */

    #[inline] pub fn tick_index(&self) -> u64 { self.tick }
    #[inline] pub fn time(&self) -> Scalar { self.time }
    pub fn avatar_pose(&self, id: AvatarId) -> Isometry { self.bodies.pose(id.0) }
    pub fn avatar_vel(&self, id: AvatarId) -> Velocity { self.bodies.vel(id.0) }
    pub fn tracked_pose(&self, id: AvatarId) -> Isometry { self.slots[id.0 as usize].tracked }
    pub fn mode_of(&self, id: AvatarId) -> Option<Mode> { self.slots[id.0 as usize].last_mode }
    pub fn hand_of(&self, id: AvatarId) -> Option<Hand> { self.slots[id.0 as usize].ctrl.hand() }
    pub fn held_by(&self, hand: Hand) -> Option<AvatarId> { self.registry.held_by(hand) }
    pub fn registry(&self) -> &HandRegistry { &self.registry }
    pub fn ghost_visible(&self, id: AvatarId) -> bool { self.slots[id.0 as usize].ghost_visible }

    /// Deterministic digest of the whole world after the last step.
    pub fn step_hash(&self) -> [u8; 32] {
        let mut h = StepHasher::new();
        h.update_bytes(&self.tick.to_le_bytes());
        h.update_bytes(&self.schedule.digest());
        for i in self.bodies.indices() {
            h.update_bytes(&i.to_le_bytes());
            hash_pose(&mut h, &self.bodies.pose(i));
            hash_velocity(&mut h, &self.bodies.vel(i));
        }
        for slot in &self.slots {
            let hand_tag: u8 = match slot.ctrl.hand() {
                None => 0, Some(Hand::Left) => 1, Some(Hand::Right) => 2,
            };
            let mode_tag: u8 = match slot.last_mode {
                None => 0, Some(Mode::Free) => 1, Some(Mode::Colliding) => 2, Some(Mode::JoiningBack) => 3,
            };
            h.update_bytes(&[
                hand_tag,
                mode_tag,
                slot.ctrl.is_grabbed() as u8,
                slot.ctrl.is_colliding() as u8,
                slot.ghost_visible as u8,
            ]);
        }
        h.finalize()
    }

    /* ---------- debug printer ---------- */

    fn print_debug_block(&self) {
        println!("--- debug @ tick {}  t={:.4}s ---", self.tick, self.time);
        if self.debug.show_bodies {
            let mut lines = 0usize;
            for slot in &self.slots {
                let p = self.bodies.pose(slot.body).pos;
                let t = slot.tracked.pos;
                println!(
                    "avatar {:3}  mode={:<11}  pos=({:+.3},{:+.3},{:+.3})  tracked=({:+.3},{:+.3},{:+.3})",
                    slot.body,
                    slot.last_mode.map(mode_name).unwrap_or("-"),
                    p.x, p.y, p.z, t.x, t.y, t.z,
                );
                lines += 1;
                if lines >= self.debug.max_lines { break; }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self { Self::new() }
}

fn mode_name(m: Mode) -> &'static str {
    match m {
        Mode::Free => "Free",
        Mode::Colliding => "Colliding",
        Mode::JoiningBack => "JoiningBack",
    }
}
