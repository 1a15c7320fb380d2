//! `rand`-backed [`RandomSource`] for enemy decisions.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use battle_core::RandomSource;

/// Random source for the enemy side.
///
/// Seed it for reproducible battles; use [`SeededRandom::from_entropy`]
/// otherwise.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_picks_the_same_indices() {
        let mut a = SeededRandom::new(99);
        let mut b = SeededRandom::new(99);
        let picks_a: Vec<_> = (0..32).map(|_| a.pick(5)).collect();
        let picks_b: Vec<_> = (0..32).map(|_| b.pick(5)).collect();

        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&index| index < 5));
    }
}
