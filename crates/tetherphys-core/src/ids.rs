use core::fmt;

/// One tracked/proxy pair. Also indexes the pair's body in `Bodies`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct AvatarId(pub u32);
impl fmt::Display for AvatarId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "AvatarId({})", self.0) } }
