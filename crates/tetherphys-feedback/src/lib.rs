//! Haptic output boundary. The world feeds one (frequency, amplitude) pair per
//! assigned hand per physics step; the device layer behind the trait is not
//! our concern.

use tetherphys_core::{Hand, Scalar};

pub trait HapticSink {
    fn set_vibration(&mut self, hand: Hand, frequency: Scalar, amplitude: Scalar);
}

/// Discards everything. Default sink until a device layer is attached.
#[derive(Default)]
pub struct NullHaptics;

impl HapticSink for NullHaptics {
    fn set_vibration(&mut self, _hand: Hand, _frequency: Scalar, _amplitude: Scalar) {}
}

/// Records every call; used by scenario tests to assert on emitted signals.
#[derive(Default)]
pub struct RecordingHaptics {
    pub calls: Vec<(Hand, Scalar, Scalar)>,
}

impl RecordingHaptics {
    pub fn new() -> Self { Self::default() }
    pub fn last_for(&self, hand: Hand) -> Option<(Scalar, Scalar)> {
        self.calls.iter().rev()
            .find(|(h, _, _)| *h == hand)
            .map(|(_, f, a)| (*f, *a))
    }
}

impl HapticSink for RecordingHaptics {
    fn set_vibration(&mut self, hand: Hand, frequency: Scalar, amplitude: Scalar) {
        self.calls.push((hand, frequency, amplitude));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn recording_keeps_latest_per_hand() {
        let mut sink = RecordingHaptics::new();
        sink.set_vibration(Hand::Left, 0.2, 0.2);
        sink.set_vibration(Hand::Right, 0.9, 0.9);
        sink.set_vibration(Hand::Left, 0.0, 0.0);
        assert_eq!(sink.last_for(Hand::Left), Some((0.0, 0.0)));
        assert_eq!(sink.last_for(Hand::Right), Some((0.9, 0.9)));
    }
}
