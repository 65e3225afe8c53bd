//! RNG module - deterministic scenery placement
//!
//! Clouds and trees are scattered once at startup. A small LCG keeps the
//! layout reproducible for a given seed (handy for tests and for bug reports
//! that include `ROCKET_SEED`).

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // Fold the high half in so clock-derived seeds still differ.
        let folded = (seed ^ (seed >> 32)) as u32;
        // Avoid 0 seed which would produce all zeros
        let state = if folded == 0 { 1 } else { folded };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Random `i32` in `[0, max)`; 0 when `max <= 0`.
    pub fn next_below(&mut self, max: i32) -> i32 {
        if max <= 0 {
            return 0;
        }
        self.next_range(max as u32) as i32
    }
}
