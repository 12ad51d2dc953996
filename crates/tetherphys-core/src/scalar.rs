/// Single scalar type for the whole workspace. f32 matches the tracked-input
/// precision; keep every derived quantity in the same width so step hashes are
/// reproducible across crates.
pub type Scalar = f32;
