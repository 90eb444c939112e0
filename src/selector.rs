use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses which card a request receives.
pub trait CardSelector: Send + Sync {
    /// Return an index in `0..deck_len`. `deck_len` is never zero.
    fn pick(&self, deck_len: usize) -> usize;
}

impl<F> CardSelector for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn pick(&self, deck_len: usize) -> usize {
        self(deck_len)
    }
}

/// Uniform selection, independent across requests.
pub struct RandomSelector {
    rng: Mutex<StdRng>,
}

impl RandomSelector {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSelector for RandomSelector {
    fn pick(&self, deck_len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen_range(0..deck_len)
    }
}
