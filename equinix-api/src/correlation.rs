//! `X-CORRELATION-ID` generation.
//!
//! Every Fabric request carries a random correlation ID. The generator owns
//! its random source so tests can seed it.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of generated correlation IDs.
pub const CORRELATION_ID_LEN: usize = 25;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#$&@";

/// Produces correlation IDs from an owned RNG.
#[derive(Debug)]
pub struct CorrelationIdGenerator {
    rng: Mutex<StdRng>,
    len: usize,
}

impl CorrelationIdGenerator {
    /// Seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Deterministic sequence, for tests and reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            len: CORRELATION_ID_LEN,
        }
    }

    pub fn next_id(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        (0..self.len)
            .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
            .collect()
    }
}

impl Default for CorrelationIdGenerator {
    fn default() -> Self {
        Self::from_entropy()
    }
}
