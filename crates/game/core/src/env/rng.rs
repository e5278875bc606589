//! Injected random source for battle resolution.
//!
//! All randomness in a battle flows through a [`BattleRng`] owned by the
//! engine. There is no ambient generator: given the same seed and the same
//! submitted actions, a battle produces the same events.

/// Random number generator used by the engine.
///
/// Implementations must be deterministic: the same seed must produce the same
/// sequence.
pub trait BattleRng {
    /// Generate the next random u32.
    fn next_u32(&mut self) -> u32;

    /// Roll a d100 (1-100 inclusive).
    ///
    /// Used for accuracy and chance-based effects.
    fn roll_d100(&mut self) -> u32 {
        (self.next_u32() % 100) + 1
    }

    /// Generate a value in range [0, max). Returns 0 when `max` is 0.
    fn gen_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        (self.next_u32() as usize) % max
    }

    /// Generate a float in [0, 1).
    fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Returns true with the given probability (clamped to [0, 1]).
    fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.next_f64() < probability
    }

    /// Shuffle a slice using Fisher-Yates.
    fn shuffle<T>(&mut self, slice: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range(i + 1);
            slice.swap(i, j);
        }
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 64-bit state, 32-bit output.
///
/// - **Deterministic**: Same seed always produces same sequence
/// - **Fast**: Single multiply + xorshift + rotate
/// - **Small state**: Only 64 bits, cheap to clone for simulations
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Create a generator from a seed.
    ///
    /// The seed is mixed once so that small consecutive seeds diverge quickly.
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        rng.step();
        rng
    }

    #[inline]
    fn step(&mut self) {
        self.state = self
            .state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl BattleRng for PcgRng {
    fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.step();
        Self::output(old)
    }
}

/// Replays a fixed sequence of values, wrapping around at the end.
///
/// Useful in tests and tools that need to force specific rolls.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl BattleRng for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let mut a = PcgRng::seed_from_u64(12345);
        let mut b = PcgRng::seed_from_u64(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn pcg_different_seeds_diverge() {
        let mut a = PcgRng::seed_from_u64(1);
        let mut b = PcgRng::seed_from_u64(2);
        let left: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let right: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn d100_stays_in_range() {
        let mut rng = PcgRng::seed_from_u64(42);
        for _ in 0..1000 {
            let roll = rng.roll_d100();
            assert!((1..=100).contains(&roll));
        }
    }

    #[test]
    fn next_f64_is_half_open() {
        let mut rng = ScriptedRng::new(vec![0, u32::MAX]);
        assert_eq!(rng.next_f64(), 0.0);
        assert!(rng.next_f64() < 1.0);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut rng = PcgRng::seed_from_u64(7);
        let mut values = [1, 2, 3, 4, 5, 6];
        rng.shuffle(&mut values);
        let mut sorted = values;
        sorted.sort();
        assert_eq!(sorted, [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn scripted_rng_wraps() {
        let mut rng = ScriptedRng::new(vec![5, 9]);
        assert_eq!(rng.next_u32(), 5);
        assert_eq!(rng.next_u32(), 9);
        assert_eq!(rng.next_u32(), 5);
    }
}
