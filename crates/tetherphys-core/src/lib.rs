pub mod scalar;
pub mod types;
pub mod ids;
pub mod hands;
pub mod hash;
pub mod schedule;

pub use scalar::Scalar;
pub use ids::AvatarId;
pub use types::{Vec3, Isometry, Velocity, vec3, iso, quat_identity};
pub use hands::{Hand, HandRegistry};
pub use hash::{StepHasher, hash_pose, hash_velocity};
pub use schedule::{StepStage, schedule_digest};
pub use glam::Quat;
