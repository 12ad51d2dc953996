//! Observability edges: the ghost-visual toggle boundary, a JSONL telemetry
//! ledger, debug print settings, and the step-stage recorder.

use serde::Serialize;
use std::io::Write;
use std::path::Path;

use tetherphys_core::{Hand, StepStage, schedule_digest};

/// Ghost-mesh visibility boundary. Called on mode-relevant transitions only;
/// the world latches the current state so repeated decisions don't churn the
/// renderer.
pub trait GhostVisual {
    fn set_ghost_visible(&mut self, avatar: u32, visible: bool);
}

#[derive(Default)]
pub struct NullGhost;

impl GhostVisual for NullGhost {
    fn set_ghost_visible(&mut self, _avatar: u32, _visible: bool) {}
}

/// Records toggles for tests: (avatar, visible).
#[derive(Default)]
pub struct RecordingGhost {
    pub toggles: Vec<(u32, bool)>,
}

impl GhostVisual for RecordingGhost {
    fn set_ghost_visible(&mut self, avatar: u32, visible: bool) {
        self.toggles.push((avatar, visible));
    }
}

/* ---------- telemetry ledger ---------- */

#[derive(Copy, Clone, Debug, Serialize)]
pub enum LedgerEvent {
    Mode { id: u32, mode: &'static str },
    Drive { id: u32, f: [f32; 3], tau: [f32; 3] },
    Snap { id: u32 },
    Haptic { id: u32, hand: Hand2, freq: f32, amp: f32 },
    Ghost { id: u32, visible: bool },
    ContactBegin { id: u32 },
    ContactEnd { id: u32 },
}

/// Serializable mirror of `Hand` (core stays serde-free).
#[derive(Copy, Clone, Debug, Serialize)]
pub enum Hand2 { Left, Right }

impl From<Hand> for Hand2 {
    fn from(h: Hand) -> Self {
        match h { Hand::Left => Hand2::Left, Hand::Right => Hand2::Right }
    }
}

/// Bounded per-tick event buffer, dumped as JSONL on demand.
pub struct Ledger {
    events: Vec<LedgerEvent>,
    cap: usize,
}

impl Ledger {
    pub fn new(cap: usize) -> Self { Self { events: Vec::with_capacity(cap.min(1024)), cap } }
    pub fn push(&mut self, ev: LedgerEvent) {
        if self.events.len() < self.cap { self.events.push(ev); }
    }
    pub fn clear(&mut self) { self.events.clear(); }
    pub fn iter(&self) -> impl Iterator<Item = &LedgerEvent> { self.events.iter() }
    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    /// Write this tick's events to `<dir>/tick_<n>.jsonl`, one event per line.
    pub fn write_jsonl(&self, dir: &str, tick: u64) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let path = Path::new(dir).join(format!("tick_{tick:08}.jsonl"));
        let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
        for ev in &self.events {
            let line = serde_json::to_string(ev).map_err(std::io::Error::other)?;
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

/* ---------- debug + schedule ---------- */

#[derive(Copy, Clone, Debug)]
pub struct DebugSettings {
    pub print_every: u32, // 0 = never
    pub json_every: u32,  // 0 = never
    pub show_bodies: bool,
    pub max_lines: usize,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self { print_every: 0, json_every: 0, show_bodies: true, max_lines: 16 }
    }
}

#[derive(Default)]
pub struct ScheduleRecorder { stages: Vec<StepStage> }

impl ScheduleRecorder {
    pub fn new() -> Self { Self { stages: Vec::new() } }
    pub fn push(&mut self, s: StepStage) { self.stages.push(s); }
    pub fn clear(&mut self) { self.stages.clear(); }
    pub fn digest(&self) -> [u8; 32] { schedule_digest(&self.stages) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn ledger_caps_events() {
        let mut l = Ledger::new(2);
        l.push(LedgerEvent::Snap { id: 0 });
        l.push(LedgerEvent::Snap { id: 1 });
        l.push(LedgerEvent::Snap { id: 2 });
        assert_eq!(l.len(), 2);
    }

    #[test] fn events_serialize_to_json_lines() {
        let ev = LedgerEvent::Mode { id: 3, mode: "Colliding" };
        let s = serde_json::to_string(&ev).unwrap();
        assert!(s.contains("Colliding"));
    }
}
