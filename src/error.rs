use thiserror::Error;

/// Errors produced by the collision-search tooling.
///
/// Hashing itself never fails; only searches with a bad configuration or an
/// exhausted budget do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no collision found after {attempts} attempts")]
    NotFound { attempts: u64 },

    #[error("alphabet must contain at least one byte")]
    EmptyAlphabet,

    #[error("invalid length range {min}..={max}")]
    InvalidLengthRange { min: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
