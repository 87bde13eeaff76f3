//! # Collision Search for ToyHash
//!
//! ToyHash keeps only 32 bits of state, so two distinct inputs with the same hash are easy to
//! come by. This module collects a few ways of finding them:
//!
//! - **Brute force**: enumerate every string over an alphabet, shortest first.
//! - **Birthday attack**: hash random strings from a seeded ChaCha20 stream until one repeats.
//!   Expect a hit after about `sqrt(2^32)` samples.
//! - **Short byte search**: every printable 1- and 2-byte string. For ToyHash this comes back
//!   empty (no two strings of length 2 or less collide), which is worth seeing once.
//! - **Neighbour search**: insert one printable byte at every position of a few base strings.
//! - **Advanced search**: the neighbour candidates followed by a birthday run, all sharing one
//!   table, so a random string may land on a neighbour's hash.
//!
//! It also has two small analysis helpers (`avalanche` and `single_byte_sensitivity`).
//!
//! # Usage Example
//! ```rust
//! use toyhash::cs::hashing::collision::CollisionSearch;
//! use toyhash::toy_hash;
//!
//! let found = CollisionSearch::new()
//!     .seed(Some(42))
//!     .birthday()
//!     .unwrap();
//! assert_ne!(found.first, found.second);
//! assert_eq!(toy_hash(&found.first), toy_hash(&found.second));
//! ```

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use super::toyhash::toy_hash;
use crate::error::{Error, Result};

/// ASCII letters followed by digits.
pub const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// First printable ASCII byte (space).
pub const PRINTABLE_FIRST: u8 = 0x20;
/// Last printable ASCII byte (`~`).
pub const PRINTABLE_LAST: u8 = 0x7e;

/// Default base strings for [`CollisionSearch::neighbour_search`].
pub const NEIGHBOUR_BASES: [&[u8]; 6] = [b"a", b"test", b"hello", b"123", b"abc", b"xyz"];

const BRUTE_FORCE_BATCH: usize = 1 << 16;
const PROGRESS_INTERVAL: u64 = 100_000;

/// Two distinct inputs sharing one ToyHash value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub hash: u32,
    /// The input seen first.
    pub first: Vec<u8>,
    pub second: Vec<u8>,
    /// Number of candidates hashed, including the colliding one.
    pub attempts: u64,
}

impl Collision {
    /// Re-hashes both inputs and checks they really collide.
    pub fn is_valid(&self) -> bool {
        self.first != self.second
            && toy_hash(&self.first) == self.hash
            && toy_hash(&self.second) == self.hash
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:08x}: \"{}\" / \"{}\" after {} attempts",
            self.hash,
            self.first.escape_ascii(),
            self.second.escape_ascii(),
            self.attempts
        )
    }
}

/// One line of an avalanche report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvalancheRow {
    pub input: Vec<u8>,
    pub hash: u32,
    /// `hash` XOR the hash of the base input.
    pub diff: u32,
}

/// Outcome of [`single_byte_sensitivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sensitivity {
    pub mutations: usize,
    pub changed: usize,
}

/// Tracks hashes seen so far and reports the first repeat with a different input.
#[derive(Debug, Default)]
struct SeenTable {
    seen: HashMap<u32, Vec<u8>>,
    attempts: u64,
}

impl SeenTable {
    fn offer(&mut self, candidate: Vec<u8>) -> Option<Collision> {
        let hash = toy_hash(&candidate);
        self.attempts += 1;
        match self.seen.get(&hash) {
            Some(previous) if *previous != candidate => Some(Collision {
                hash,
                first: previous.clone(),
                second: candidate,
                attempts: self.attempts,
            }),
            _ => {
                self.seen.insert(hash, candidate);
                None
            }
        }
    }
}

/// Configuration shared by the collision strategies.
#[derive(Debug, Clone)]
pub struct CollisionSearch {
    alphabet: Vec<u8>,
    min_len: usize,
    max_len: usize,
    max_attempts: u64,
    seed: Option<u64>,
}

impl Default for CollisionSearch {
    fn default() -> Self {
        Self {
            alphabet: ALPHANUMERIC.to_vec(),
            min_len: 3,
            max_len: 6,
            max_attempts: 1_000_000,
            seed: None,
        }
    }
}

impl CollisionSearch {
    /// Alphanumeric alphabet, lengths `3..=6`, one million attempts, random seed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes that candidate strings are built from.
    pub fn alphabet(mut self, alphabet: &[u8]) -> Self {
        self.alphabet = alphabet.to_vec();
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Upper bound on the number of candidates hashed.
    pub fn max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Seed for the birthday and advanced searches. `None` draws one from the thread RNG.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Checks the alphabet and length range.
    pub fn validate(&self) -> Result<()> {
        if self.alphabet.is_empty() {
            return Err(Error::EmptyAlphabet);
        }
        if self.min_len == 0 || self.min_len > self.max_len {
            return Err(Error::InvalidLengthRange {
                min: self.min_len,
                max: self.max_len,
            });
        }
        Ok(())
    }

    /// Enumerates every string of length `min_len..=max_len` over the alphabet, shortest first
    /// and in lexicographic alphabet order within a length.
    ///
    /// Candidates are hashed in parallel batches; the seen table is updated in enumeration
    /// order so the reported pair does not depend on thread scheduling.
    pub fn brute_force(&self) -> Result<Collision> {
        self.validate()?;
        info!(
            "brute force over {} symbols, lengths {}..={}",
            self.alphabet.len(),
            self.min_len,
            self.max_len
        );

        let radix = self.alphabet.len() as u64;
        // Stores (length, index) rather than the bytes themselves.
        let mut seen: HashMap<u32, (usize, u64)> = HashMap::new();
        let mut attempts = 0u64;

        for len in self.min_len..=self.max_len {
            let total = radix.checked_pow(len as u32).unwrap_or(u64::MAX);
            debug!("length {}: {} candidates", len, total);

            let mut start = 0u64;
            while start < total {
                let budget = self.max_attempts - attempts;
                if budget == 0 {
                    return Err(Error::NotFound { attempts });
                }
                let batch = (total - start)
                    .min(budget)
                    .min(BRUTE_FORCE_BATCH as u64) as usize;

                let hashes: Vec<u32> = (0..batch)
                    .into_par_iter()
                    .map(|offset| toy_hash(&self.candidate(len, start + offset as u64)))
                    .collect();

                for (offset, hash) in hashes.into_iter().enumerate() {
                    attempts += 1;
                    let index = start + offset as u64;
                    if let Some(&(prev_len, prev_index)) = seen.get(&hash) {
                        let first = self.candidate(prev_len, prev_index);
                        let second = self.candidate(len, index);
                        // Repeated alphabet bytes spell the same string twice.
                        if first == second {
                            continue;
                        }
                        let found = Collision {
                            hash,
                            first,
                            second,
                            attempts,
                        };
                        info!("brute force found {}", found);
                        return Ok(found);
                    }
                    seen.insert(hash, (len, index));
                }

                start += batch as u64;
                if attempts % PROGRESS_INTERVAL < batch as u64 {
                    debug!("{} candidates hashed", attempts);
                }
            }
        }

        Err(Error::NotFound { attempts })
    }

    /// Hashes random strings until two distinct ones collide.
    pub fn birthday(&self) -> Result<Collision> {
        self.validate()?;
        let seed = self.resolve_seed();
        info!(
            "birthday search with seed {}, lengths {}..={}, up to {} attempts",
            seed, self.min_len, self.max_len, self.max_attempts
        );

        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut table = SeenTable::default();

        match self.random_phase(&mut rng, &mut table, self.max_attempts) {
            Some(found) => {
                info!("birthday search found {}", found);
                Ok(found)
            }
            None => Err(Error::NotFound {
                attempts: table.attempts,
            }),
        }
    }

    /// Runs the neighbour candidates for `bases`, then up to `max_attempts` random strings,
    /// all against one seen table.
    ///
    /// The neighbour phase is not counted against `max_attempts`, but its candidates are
    /// included in the reported `attempts`.
    pub fn advanced(&self, bases: &[&[u8]]) -> Result<Collision> {
        self.validate()?;

        let mut table = SeenTable::default();
        if let Some(found) = self.neighbour_phase(bases, &mut table, u64::MAX) {
            info!("advanced search found {} among neighbours", found);
            return Ok(found);
        }
        debug!("{} neighbour candidates, no collision", table.attempts);

        let seed = self.resolve_seed();
        info!(
            "advanced search random phase with seed {}, lengths {}..={}, up to {} attempts",
            seed, self.min_len, self.max_len, self.max_attempts
        );
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let limit = table.attempts.saturating_add(self.max_attempts);

        match self.random_phase(&mut rng, &mut table, limit) {
            Some(found) => {
                info!("advanced search found {}", found);
                Ok(found)
            }
            None => Err(Error::NotFound {
                attempts: table.attempts,
            }),
        }
    }

    /// Tries every printable 1-byte string, then every printable 2-byte string.
    ///
    /// Ignores the configured alphabet and lengths.
    pub fn short_bytes_search(&self) -> Result<Collision> {
        let mut attempts = 0u64;

        let mut singles = SeenTable::default();
        for b in PRINTABLE_FIRST..=PRINTABLE_LAST {
            if let Some(found) = singles.offer(vec![b]) {
                return Ok(found);
            }
        }
        attempts += singles.attempts;
        debug!("no collision among {} single bytes", singles.attempts);

        let mut pairs = SeenTable::default();
        for a in PRINTABLE_FIRST..=PRINTABLE_LAST {
            for b in PRINTABLE_FIRST..=PRINTABLE_LAST {
                if let Some(mut found) = pairs.offer(vec![a, b]) {
                    found.attempts += attempts;
                    return Ok(found);
                }
            }
        }
        attempts += pairs.attempts;

        Err(Error::NotFound { attempts })
    }

    /// Inserts every printable byte at every position of each base string.
    pub fn neighbour_search(&self, bases: &[&[u8]]) -> Result<Collision> {
        let mut table = SeenTable::default();

        match self.neighbour_phase(bases, &mut table, self.max_attempts) {
            Some(found) => {
                info!("neighbour search found {}", found);
                Ok(found)
            }
            None => Err(Error::NotFound {
                attempts: table.attempts,
            }),
        }
    }

    fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }

    /// Offers neighbour candidates to `table` until one collides or `table.attempts`
    /// reaches `limit`.
    fn neighbour_phase(
        &self,
        bases: &[&[u8]],
        table: &mut SeenTable,
        limit: u64,
    ) -> Option<Collision> {
        for base in bases {
            for b in PRINTABLE_FIRST..=PRINTABLE_LAST {
                for pos in 0..=base.len() {
                    if table.attempts >= limit {
                        return None;
                    }
                    let mut candidate = Vec::with_capacity(base.len() + 1);
                    candidate.extend_from_slice(&base[..pos]);
                    candidate.push(b);
                    candidate.extend_from_slice(&base[pos..]);

                    if let Some(found) = table.offer(candidate) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// Offers random strings to `table` until one collides or `table.attempts` reaches `limit`.
    fn random_phase(
        &self,
        rng: &mut ChaCha20Rng,
        table: &mut SeenTable,
        limit: u64,
    ) -> Option<Collision> {
        while table.attempts < limit {
            let len = rng.gen_range(self.min_len..=self.max_len);
            let candidate: Vec<u8> = (0..len)
                .map(|_| self.alphabet[rng.gen_range(0..self.alphabet.len())])
                .collect();

            if let Some(found) = table.offer(candidate) {
                return Some(found);
            }
            if table.attempts % PROGRESS_INTERVAL == 0 {
                debug!("{} strings hashed", table.attempts);
            }
        }
        None
    }

    /// The `index`-th string of length `len` in enumeration order.
    fn candidate(&self, len: usize, mut index: u64) -> Vec<u8> {
        let radix = self.alphabet.len() as u64;
        let mut out = vec![0u8; len];
        for slot in out.iter_mut().rev() {
            *slot = self.alphabet[(index % radix) as usize];
            index /= radix;
        }
        out
    }
}

/// Hashes `base` followed by each suffix byte and XORs against the hash of `base`.
pub fn avalanche<I>(base: &[u8], suffixes: I) -> Vec<AvalancheRow>
where
    I: IntoIterator<Item = u8>,
{
    let base_hash = toy_hash(base);
    suffixes
        .into_iter()
        .map(|suffix| {
            let mut input = base.to_vec();
            input.push(suffix);
            let hash = toy_hash(&input);
            AvalancheRow {
                input,
                hash,
                diff: hash ^ base_hash,
            }
        })
        .collect()
}

/// Replaces each byte of `base` with every other byte value and counts how many of those
/// mutations change the hash.
pub fn single_byte_sensitivity(base: &[u8]) -> Sensitivity {
    let base_hash = toy_hash(base);
    let (mutations, changed) = (0..base.len())
        .into_par_iter()
        .map(|pos| {
            let mut input = base.to_vec();
            let mut changed = 0usize;
            for value in 0..=u8::MAX {
                if value == base[pos] {
                    continue;
                }
                input[pos] = value;
                if toy_hash(&input) != base_hash {
                    changed += 1;
                }
            }
            (u8::MAX as usize, changed)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    Sensitivity { mutations, changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_force_finds_known_pair() {
        let found = CollisionSearch::new()
            .min_len(1)
            .max_len(4)
            .max_attempts(5_000_000)
            .brute_force()
            .unwrap();
        assert_eq!(found.first, b"cIG8".to_vec());
        assert_eq!(found.second, b"kwfB".to_vec());
        assert_eq!(found.hash, 0x80d977a7);
        assert_eq!(found.attempts, 2_710_420);
        assert!(found.is_valid());
    }

    #[test]
    fn test_brute_force_respects_budget() {
        let err = CollisionSearch::new()
            .min_len(1)
            .max_len(4)
            .max_attempts(100_000)
            .brute_force()
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 100_000 });
    }

    #[test]
    fn test_brute_force_small_space_exhausts() {
        let err = CollisionSearch::new()
            .alphabet(b"ab")
            .min_len(1)
            .max_len(3)
            .brute_force()
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 2 + 4 + 8 });
    }

    #[test]
    fn test_brute_force_repeated_alphabet_bytes() {
        let err = CollisionSearch::new()
            .alphabet(b"aa")
            .min_len(1)
            .max_len(2)
            .brute_force()
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 2 + 4 });
    }

    #[test]
    fn test_birthday_finds_collision() {
        let found = CollisionSearch::new().seed(Some(42)).birthday().unwrap();
        assert!(found.is_valid());
        assert!(found.attempts <= 1_000_000);
        assert!((3..=6).contains(&found.first.len()));
        assert!(found.second.iter().all(|b| ALPHANUMERIC.contains(b)));
    }

    #[test]
    fn test_birthday_is_reproducible() {
        let search = CollisionSearch::new().seed(Some(7));
        assert_eq!(search.birthday().unwrap(), search.birthday().unwrap());
    }

    #[test]
    fn test_short_bytes_search_is_empty() {
        let err = CollisionSearch::new().short_bytes_search().unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 95 + 95 * 95 });
    }

    #[test]
    fn test_neighbour_search_budget() {
        let err = CollisionSearch::new()
            .max_attempts(10)
            .neighbour_search(&NEIGHBOUR_BASES)
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 10 });
    }

    #[test]
    fn test_neighbour_search_exhausts_default_bases() {
        // Inserting 'a' before or after "a" yields "aa" twice; that must not count.
        let err = CollisionSearch::new()
            .neighbour_search(&NEIGHBOUR_BASES)
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 95 * 25 });
    }

    #[test]
    fn test_advanced_counts_neighbour_candidates() {
        let found = CollisionSearch::new()
            .max_len(5)
            .seed(Some(42))
            .advanced(&NEIGHBOUR_BASES)
            .unwrap();
        assert!(found.is_valid());
        // No neighbour pair collides, so the hit comes from the random phase.
        assert!(found.attempts > 95 * 25);
        assert!(found.attempts <= 95 * 25 + 1_000_000);
        assert!((3..=5).contains(&found.second.len()));
    }

    #[test]
    fn test_advanced_is_reproducible() {
        let search = CollisionSearch::new().seed(Some(42));
        assert_eq!(
            search.advanced(&NEIGHBOUR_BASES).unwrap(),
            search.advanced(&NEIGHBOUR_BASES).unwrap()
        );
    }

    #[test]
    fn test_advanced_budget_excludes_neighbours() {
        let err = CollisionSearch::new()
            .seed(Some(1))
            .max_attempts(10)
            .advanced(&NEIGHBOUR_BASES)
            .unwrap_err();
        assert_eq!(err, Error::NotFound { attempts: 95 * 25 + 10 });
    }

    #[test]
    fn test_advanced_validates() {
        assert_eq!(
            CollisionSearch::new().alphabet(b"").advanced(&NEIGHBOUR_BASES),
            Err(Error::EmptyAlphabet)
        );
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            CollisionSearch::new().alphabet(b"").validate(),
            Err(Error::EmptyAlphabet)
        );
        assert_eq!(
            CollisionSearch::new().min_len(5).max_len(2).validate(),
            Err(Error::InvalidLengthRange { min: 5, max: 2 })
        );
        assert_eq!(
            CollisionSearch::new().min_len(0).validate(),
            Err(Error::InvalidLengthRange { min: 0, max: 6 })
        );
        assert!(CollisionSearch::new().validate().is_ok());
    }

    #[test]
    fn test_avalanche() {
        let rows = avalanche(b"hello", b'a'..b'z');
        assert_eq!(rows.len(), 25);
        assert_eq!(rows[24].input, b"helloy".to_vec());
        assert_eq!(rows[0].input, b"helloa".to_vec());
        for row in &rows {
            assert_eq!(row.hash, toy_hash(&row.input));
            assert_eq!(row.diff, row.hash ^ 0xdf280ebe);
            assert_ne!(row.diff, 0);
        }
    }

    #[test]
    fn test_single_byte_sensitivity() {
        let report = single_byte_sensitivity(b"hello");
        assert_eq!(report.mutations, 5 * 255);
        assert_eq!(report.changed, report.mutations);
        assert_eq!(single_byte_sensitivity(b""), Sensitivity { mutations: 0, changed: 0 });
    }

    #[test]
    fn test_collision_display() {
        let found = Collision {
            hash: 0x80d977a7,
            first: b"cIG8".to_vec(),
            second: b"kwfB".to_vec(),
            attempts: 3,
        };
        assert_eq!(
            found.to_string(),
            "0x80d977a7: \"cIG8\" / \"kwfB\" after 3 attempts"
        );
    }
}
