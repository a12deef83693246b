//! Nullable random: a scripted `RngCore`.

use rand::{Error, RngCore};

/// Replays a fixed list of unit floats, cycling when it runs out.
///
/// Each scripted value `u` in `[0, 1)` is encoded so that
/// `rng.gen::<f64>()` yields `u` again, which lets tests steer a weighted
/// choice to a known branch.
#[derive(Clone, Debug)]
pub struct NullRandom {
    script: Vec<f64>,
    next: usize,
}

impl NullRandom {
    /// An empty script behaves like `constant(0.0)`.
    pub fn new(script: Vec<f64>) -> Self {
        let script = if script.is_empty() { vec![0.0] } else { script };
        Self { script, next: 0 }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// How many values have been drawn so far.
    pub fn draws(&self) -> usize {
        self.next
    }

    fn next_unit(&mut self) -> f64 {
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

impl RngCore for NullRandom {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        // `Standard` builds an f64 from the top 53 bits.
        ((self.next_unit() * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
