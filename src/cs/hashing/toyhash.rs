//! # ToyHash
//!
//! This module provides a deliberately **weak** 32-bit hash. It exists so that collisions are
//! cheap enough to find by hand: the whole state is a single `u32`, so a birthday search over
//! random short strings turns up a collision after roughly a hundred thousand attempts.
//!
//! **Note**: ToyHash is not cryptographically secure and never will be. Do not use it for
//! anything beyond demonstrations and tests.
//!
//! ## Algorithm
//! Starting from `h = 0x9747b28c`, each input byte `b` is mixed in with
//! ```text
//! h ^= b
//! h *= 0x45d9f3b      (mod 2^32)
//! h  = rotl(h, 13)
//! h ^= 0x27100001
//! ```
//! There is no finalization step, so the empty input hashes to the seed itself.
//!
//! ## Key Features
//! - One-shot function `toy_hash(data) -> u32`.
//! - A streaming `ToyHasher` implementing `std::hash::Hasher` (the 32-bit state is
//!   zero-extended in `finish()`).
//! - `ToyBuildHasher` so the hash can back a `HashMap` or `HashSet`.

use std::hash::{BuildHasher, Hasher};

/// Initial accumulator value.
pub const TOYHASH_SEED: u32 = 0x9747b28c;
/// Odd multiplier applied after each byte is XORed in.
pub const TOYHASH_MULTIPLIER: u32 = 0x45d9f3b;
/// Left rotation applied after the multiply.
pub const TOYHASH_ROTATION: u32 = 13;
/// Constant XORed into the state at the end of every round.
pub const TOYHASH_XOR: u32 = 0x27100001;

/// Mixes a single byte into the accumulator.
#[inline(always)]
fn mix(h: u32, b: u8) -> u32 {
    let h = (h ^ b as u32).wrapping_mul(TOYHASH_MULTIPLIER);
    h.rotate_left(TOYHASH_ROTATION) ^ TOYHASH_XOR
}

/// Returns the 32-bit ToyHash of `data`.
pub fn toy_hash(data: &[u8]) -> u32 {
    data.iter().fold(TOYHASH_SEED, |h, &b| mix(h, b))
}

/// Returns the ToyHash of `data` as 8 lowercase hex digits, most significant byte first.
pub fn toy_hash_hex(data: &[u8]) -> String {
    hex::encode(toy_hash(data).to_be_bytes())
}

/// Streaming ToyHash state implementing `std::hash::Hasher`.
///
/// Every byte passed to `write` goes through the same round as [`toy_hash`], so splitting
/// the input across several writes does not change the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToyHasher {
    state: u32,
}

impl ToyHasher {
    /// Creates a hasher holding the initial seed.
    pub fn new() -> Self {
        Self {
            state: TOYHASH_SEED,
        }
    }

    /// Returns the current 32-bit digest.
    pub fn digest(&self) -> u32 {
        self.state
    }
}

impl Default for ToyHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for ToyHasher {
    fn finish(&self) -> u64 {
        self.state as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        self.state = bytes.iter().fold(self.state, |h, &b| mix(h, b));
    }
}

/// The `BuildHasher` handing out fresh `ToyHasher`s for `HashMap`, `HashSet` and friends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToyBuildHasher;

impl BuildHasher for ToyBuildHasher {
    type Hasher = ToyHasher;

    fn build_hasher(&self) -> Self::Hasher {
        ToyHasher::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_is_seed() {
        assert_eq!(toy_hash(b""), 0x9747b28c);
        assert_eq!(toy_hash(&[]), TOYHASH_SEED);
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(toy_hash(b"a"), 0x2ae3e339);
        assert_eq!(toy_hash(b"ab"), 0x1a4f2e18);
        assert_eq!(toy_hash(b"ba"), 0x1d6231c3);
        assert_eq!(toy_hash(b"abc"), 0x847b2198);
        assert_eq!(toy_hash(b"hello"), 0xdf280ebe);
        assert_eq!(toy_hash(b"world"), 0x0dd04438);
        assert_eq!(toy_hash(b"toyhash"), 0x82d01000);
    }

    #[test]
    fn test_non_ascii_bytes() {
        assert_eq!(toy_hash(&[0xff]), 0x76a020a5);
        // "é" in UTF-8
        assert_eq!(toy_hash("\u{e9}".as_bytes()), 0xff31b9e6);
    }

    #[test]
    fn test_single_round_by_hand() {
        let mut h = TOYHASH_SEED ^ b'a' as u32;
        h = h.wrapping_mul(TOYHASH_MULTIPLIER);
        h = (h << 13) | (h >> 19);
        h ^= TOYHASH_XOR;
        assert_eq!(toy_hash(b"a"), h);
    }

    #[test]
    fn test_deterministic() {
        let input = b"the quick brown fox";
        let first = toy_hash(input);
        for _ in 0..10 {
            assert_eq!(toy_hash(input), first);
        }
    }

    #[test]
    fn test_hex_is_zero_padded() {
        assert_eq!(toy_hash_hex(b"world"), "0dd04438");
        assert_eq!(toy_hash_hex(b""), "9747b28c");
    }

    #[test]
    fn test_hasher_matches_one_shot() {
        let mut hasher = ToyHasher::new();
        hasher.write(b"toy");
        hasher.write(b"");
        hasher.write(b"hash");
        assert_eq!(hasher.digest(), toy_hash(b"toyhash"));
        assert_eq!(hasher.finish(), 0x82d01000u64);
    }

    #[test]
    fn test_default_hasher_is_seed() {
        assert_eq!(ToyHasher::default().finish(), TOYHASH_SEED as u64);
    }

    #[test]
    fn test_build_hasher_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::with_hasher(ToyBuildHasher);
        map.insert("foo", 1);
        map.insert("bar", 2);
        assert_eq!(map["foo"], 1);
        assert_eq!(map.get("baz"), None);
    }
}
