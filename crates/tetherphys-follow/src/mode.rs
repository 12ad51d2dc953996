use tetherphys_core::Scalar;

/// Reconciliation mode; exactly one active per evaluated step.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode { Free, Colliding, JoiningBack }

/// Mode evaluation order: (1) Colliding, (2) JoiningBack, (3) Free fallback.
/// Colliding requires an active grab, so a grab released mid-contact drops
/// straight through.
#[inline]
pub fn evaluate(colliding: bool, grabbed: bool, joining_back: bool) -> Mode {
    if colliding && grabbed {
        Mode::Colliding
    } else if joining_back {
        Mode::JoiningBack
    } else {
        Mode::Free
    }
}

/// Time-bounded return window. Armed when a collision episode ends; expired at
/// both the logic rate and the physics rate so a missed poll cannot stretch
/// it. While armed and collision resumes, it doubles as the urgent catch-up
/// window (4x gains).
#[derive(Copy, Clone, Debug)]
pub struct ReturnWindow {
    pub armed: bool,
    pub end: Scalar,
}

impl Default for ReturnWindow {
    fn default() -> Self { Self { armed: false, end: -1.0 } }
}

impl ReturnWindow {
    pub fn arm(&mut self, now: Scalar, duration: Scalar) {
        self.end = now + duration;
        self.armed = true;
    }

    /// Expiry is inclusive: at exactly `end` the window is over.
    pub fn expire(&mut self, now: Scalar) {
        if now >= self.end { self.armed = false; }
    }

    /// Blend fraction through the window, clamped to [0, 1].
    pub fn fraction(&self, now: Scalar, duration: Scalar) -> Scalar {
        if duration <= 0.0 { return 1.0; }
        ((now - (self.end - duration)) / duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test] fn exactly_one_mode_per_input() {
        for colliding in [false, true] {
            for grabbed in [false, true] {
                for joining in [false, true] {
                    let m = evaluate(colliding, grabbed, joining);
                    let expect = if colliding && grabbed { Mode::Colliding }
                        else if joining { Mode::JoiningBack }
                        else { Mode::Free };
                    assert_eq!(m, expect);
                }
            }
        }
    }

    #[test] fn colliding_wins_over_joining_back() {
        assert_eq!(evaluate(true, true, true), Mode::Colliding);
    }

    #[test] fn colliding_without_grab_is_not_colliding() {
        assert_eq!(evaluate(true, false, false), Mode::Free);
        assert_eq!(evaluate(true, false, true), Mode::JoiningBack);
    }

    #[test] fn window_timing() {
        let mut w = ReturnWindow::default();
        w.arm(10.0, 0.2);
        w.expire(10.1);
        assert!(w.armed);
        // f32 at this magnitude leaves ~3e-6 of rounding in the arm/subtract
        // chain; the tolerance must sit above it.
        assert!((w.fraction(10.1, 0.2) - 0.5).abs() < 1e-4);
        w.expire(10.2);
        assert!(!w.armed);
    }

    #[test] fn fraction_is_clamped() {
        let mut w = ReturnWindow::default();
        w.arm(0.0, 0.2);
        assert_eq!(w.fraction(-0.5, 0.2), 0.0);
        assert_eq!(w.fraction(0.5, 0.2), 1.0);
    }
}
