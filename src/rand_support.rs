use rand::{RngCore, SeedableRng};

use crate::Rng;

/// Lets a draw stream drive `rand`'s distributions and adapters.
impl RngCore for &Rng {
    fn next_u32(&mut self) -> u32 {
        (self.u64() >> 32) as _
    }

    fn next_u64(&mut self) -> u64 {
        self.u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.fill(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The seed is a little-endian stream seed, so `Rng::from_seed(seed.to_le_bytes())` is the same
/// stream as `Rng::with_seed(seed)`.
impl SeedableRng for Rng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Rng::with_seed(i64::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use rand::{seq::SliceRandom, Rng as _, RngCore, SeedableRng};

    use crate::Rng;

    #[test]
    fn seeding_matches_stream_seed() {
        let a = Rng::from_seed(1234_i64.to_le_bytes());
        let b = Rng::with_seed(1234);
        assert_eq!(a.random::<u64>(), b.random::<u64>());
    }

    #[test]
    fn fill_bytes_matches_fill() {
        let mut rng = &Rng::from_seed([0; 8]);
        let mut buffer = [0; 32];
        rng.fill_bytes(&mut buffer);
        assert_ne!(buffer, [0; 32]);

        let mut expected = [0; 32];
        Rng::with_seed(0).fill(&mut expected);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn drives_rand_adapters() {
        let rng = Rng::with_seed(9);
        let mut values: Vec<u32> = (0..100).collect();
        values.shuffle(&mut &rng);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<_>>());

        let x: f64 = (&rng).gen();
        assert!((0.0..1.0).contains(&x));
    }
}
