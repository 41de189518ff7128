/// Xorshift32 generator so a session is reproducible from its seed alone.
#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xB00D_CAFE } else { seed },
        }
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }

    /// Uniform pick in 0..max.
    pub fn next_int(&mut self, max: u32) -> u32 {
        self.next() % max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut rng = SeededRng::new(0);
        assert_ne!(rng.next(), 0);
    }

    #[test]
    fn next_int_stays_below_max() {
        let mut rng = SeededRng::new(7);
        for _ in 0..256 {
            assert!(rng.next_int(3) < 3);
        }
    }
}
