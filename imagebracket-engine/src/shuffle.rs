//! Randomness sources for seeding round 1.

use imagebracket_types::Entrant;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;

/// Reorders entrants before they are paired.
pub trait Shuffler: Send + Sync {
    fn shuffle(&self, entrants: &mut [Entrant]);
}

/// Uniform shuffle using the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle(&self, entrants: &mut [Entrant]) {
        entrants.shuffle(&mut rand::thread_rng());
    }
}

/// Deterministic shuffle driven by a fixed seed.
///
/// Successive calls continue the same random stream, so two brackets built
/// from one `SeededShuffler` differ but are reproducible across runs.
#[derive(Debug)]
pub struct SeededShuffler {
    rng: Mutex<StdRng>,
}

impl SeededShuffler {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&self, entrants: &mut [Entrant]) {
        // A poisoned lock still holds a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        entrants.shuffle(&mut *rng);
    }
}

/// Leaves entrants in store order.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoShuffle;

impl Shuffler for NoShuffle {
    fn shuffle(&self, _entrants: &mut [Entrant]) {}
}
