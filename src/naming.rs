//! Random fixture names
//!
//! Accounts get random numeric suffixes so that repeated or
//! concurrent runs against the same controller do not collide. The RNG is
//! seeded once per process and handed to whoever needs names, so a run can
//! be replayed by reusing its seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Suffixes are drawn from `0..SUFFIX_RANGE`
pub const SUFFIX_RANGE: u32 = 1000;

/// Seeded source of fixture names
#[derive(Debug, Clone)]
pub struct Namer {
    seed: u64,
    rng: StdRng,
}

impl Namer {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Decimal suffix in `[0, 1000)`
    pub fn random_suffix(&mut self) -> String {
        self.rng.random_range(0..SUFFIX_RANGE).to_string()
    }
}
