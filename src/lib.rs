pub mod cli;
pub mod cs;
pub mod error;

pub use cs::hashing;
pub use cs::hashing::{toy_hash, toy_hash_hex, ToyBuildHasher, ToyHasher};
pub use error::{Error, Result};
