//! Injectable randomness for enemy decision-making.
//!
//! The rules never reach for a global generator. Callers hand the engine a
//! [`RandomSource`], which keeps AI turns reproducible under a fixed seed and
//! lets tests script exact choices.

/// Source of uniformly distributed random numbers.
pub trait RandomSource {
    /// Generate the next random u32 value.
    fn next_u32(&mut self) -> u32;

    /// Pick an index in `0..len` uniformly.
    ///
    /// Returns 0 when `len <= 1` without consuming randomness. Draws above
    /// the largest multiple of `len` are rejected so every index is equally
    /// likely.
    fn pick(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        let zone = u32::MAX - u32::MAX % bound;
        loop {
            let draw = self.next_u32();
            if draw < zone {
                return (draw % bound) as usize;
            }
        }
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Deterministic source for rule tests; the runtime injects its own
/// generator.
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Same seed, same
/// sequence, on every platform.
#[cfg(test)]
#[derive(Clone, Copy, Debug)]
pub(crate) struct PcgRandom {
    state: u64,
}

#[cfg(test)]
impl PcgRandom {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub(crate) const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

#[cfg(test)]
impl RandomSource for PcgRandom {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}
