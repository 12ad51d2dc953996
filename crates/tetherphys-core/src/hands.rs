use crate::AvatarId;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Hand { Left, Right }

impl Hand {
    /// Resolve a hand from a grab-source identifier ("LeftHandAnchor",
    /// "RightTouch", ...). Neither substring present -> None; the grab is
    /// ignored until a source that matches comes along.
    pub fn from_source_name(name: &str) -> Option<Hand> {
        if name.contains("Left") { return Some(Hand::Left); }
        if name.contains("Right") { return Some(Hand::Right); }
        None
    }
}

/// Explicit per-hand registry: which avatar each physical hand currently holds.
/// Passed by reference to whoever needs "the avatar held by hand X" instead of
/// a pair of global singletons.
#[derive(Copy, Clone, Debug, Default)]
pub struct HandRegistry {
    left: Option<AvatarId>,
    right: Option<AvatarId>,
}

impl HandRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn assign(&mut self, hand: Hand, id: AvatarId) {
        match hand {
            Hand::Left => self.left = Some(id),
            Hand::Right => self.right = Some(id),
        }
    }

    /// Clears the slot only if it still holds `id`; a later grab by the same
    /// hand must not be wiped by a stale release.
    pub fn release(&mut self, hand: Hand, id: AvatarId) {
        let slot = match hand { Hand::Left => &mut self.left, Hand::Right => &mut self.right };
        if *slot == Some(id) { *slot = None; }
    }

    pub fn held_by(&self, hand: Hand) -> Option<AvatarId> {
        match hand { Hand::Left => self.left, Hand::Right => self.right }
    }
}
