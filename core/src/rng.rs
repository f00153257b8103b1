//! Bit-exact replica of the game engine's random-number facility.
//!
//! RULE: Predictions are only correct if every draw here matches the live
//! engine bit-for-bit. The generator is PCG XSH-RR 64/32 with the engine's
//! fixed increment and its two-step seeding warm-up. Never substitute a
//! library generator — the streams would not line up — and never let a
//! floating-point operation into the integer path.

/// The PCG default multiplier.
const MULTIPLIER: u64 = 6364136223846793005;

/// The engine's stream increment. Must stay odd.
const INCREMENT: u64 = 105;

/// The game engine's generator.
///
/// One instance per prediction call: constructed from the cycle seed,
/// exhausted in slot order, then discarded. Reconstructing with the same
/// seed always reproduces the same stream, on every platform.
#[derive(Debug, Clone)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Seed exactly the way the engine does: start from zero state,
    /// advance once, fold the seed into the state mod 2^64, advance
    /// again. A single-step seeding produces a different, incompatible
    /// stream.
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: 0 };
        rng.next_u32();
        rng.state = rng.state.wrapping_add(seed);
        rng.next_u32();
        rng
    }

    /// One raw 32-bit output. The output permutation reads the
    /// pre-advance state: xorshift of the high bits, rotated right by the
    /// top five bits.
    #[allow(clippy::should_implement_trait)]
    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = old.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform fraction in [0, 1): two 32-bit draws composed low word
    /// first, divided by 2^64. The low-then-high order is part of the
    /// stream contract.
    pub fn next_fraction(&mut self) -> f64 {
        let low = u64::from(self.next_u32());
        let high = u64::from(self.next_u32());
        let composed = (high << 32) | low;
        composed as f64 / 18_446_744_073_709_551_616.0
    }

    /// Uniform value in [min, max).
    pub fn next_number(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_fraction() * (max - min)
    }

    /// Uniform integer in [min, max], argument order insensitive.
    /// One 32-bit draw, scaled in 128-bit arithmetic so large ranges lose
    /// no precision.
    pub fn next_integer(&mut self, min: i64, max: i64) -> i64 {
        let lo = min.min(max);
        let hi = min.max(max);
        let range = (i128::from(hi) - i128::from(lo) + 1) as u128;
        let raw = u128::from(self.next_u32());
        (((range * raw) >> 32) as i128 + i128::from(lo)) as i64
    }

    /// Uniform integer in [1, n].
    pub fn next_integer_upto(&mut self, n: i64) -> i64 {
        let raw = u128::from(self.next_u32());
        ((n.max(1) as u128 * raw) >> 32) as i64 + 1
    }
}

impl rand::RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        GameRng::next_u32(self)
    }

    // Low word first, consistent with next_fraction().
    fn next_u64(&mut self) -> u64 {
        let low = u64::from(GameRng::next_u32(self));
        let high = u64::from(GameRng::next_u32(self));
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = GameRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
