use crate::StepHasher;

/// Fixed-step stages in execution order. Digest of the recorded sequence goes
/// into the step hash so a reordered pipeline shows up as a divergence.
#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum StepStage {
    MergeEvents = 1,
    Evaluate = 2,
    ApplyCommands = 3,
    Integrate = 4,
}

pub fn schedule_digest(stages: &[StepStage]) -> [u8; 32] {
    let mut h = StepHasher::new();
    for s in stages { h.update_bytes(&[*s as u8]); }
    h.finalize()
}
