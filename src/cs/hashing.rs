pub mod collision;
pub mod toyhash;

pub use collision::{avalanche, single_byte_sensitivity, Collision, CollisionSearch};
pub use toyhash::{toy_hash, toy_hash_hex, ToyBuildHasher, ToyHasher};
