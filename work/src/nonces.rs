//! Bounded, lazy nonce sequence.

/// Yields `0, 1, 2, …` and stops at the ceiling (exclusive).
#[derive(Clone, Debug)]
pub struct Nonces {
    next: u64,
    ceiling: u64,
}

impl Nonces {
    pub fn new(ceiling: u64) -> Self {
        Self { next: 0, ceiling }
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }
}

impl Iterator for Nonces {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.ceiling {
            return None;
        }
        let nonce = self.next;
        self.next += 1;
        Some(nonce)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.ceiling.saturating_sub(self.next);
        let n = usize::try_from(remaining).unwrap_or(usize::MAX);
        (n, usize::try_from(remaining).ok())
    }
}
