use std::{
    cell::Cell,
    ops::{Bound, RangeBounds},
};

/// The increment used to update the state of the RNG. This value was selected so that it is
/// coprime to 2^64, and `INCREMENT / 2^64` is approximately `phi - 1`, where `phi` is the
/// golden ratio. This produces a low discrepancy sequence with a period of 2^64.
pub(crate) const INCREMENT: u64 = 0x9E3779B97F4A7FFF;

// These constants, like the `INCREMENT` constant, are coprime to 2^64.
const ALPHA: u128 = 0x11F9ADBB8F8DA6FFF;
const BETA: u128 = 0x1E3DF208C6781EFFF;

#[derive(Debug, Clone)]
/// A draw stream: a seeded pseudorandom number generator whose sequential draws are consumed in
/// order by generators and jitter decisions.
///
/// The state lives in a `Cell`, so draws only need a shared reference. The type is `Send` but
/// not `Sync`; streams that are shared between threads are kept behind the owner's lock.
///
/// The implementation is based on hashing the Weyl sequence with `wyhash`, adapted from
/// https://github.com/lemire/testingRNG/blob/master/source/wyhash.h.
pub struct Rng {
    /// The current state of the RNG.
    pub(crate) state: Cell<u64>,
}

impl Rng {
    /// Returns a draw stream for the given stream seed. Two streams created from the same seed
    /// produce the same sequence of draws.
    ///
    /// # Example
    /// ```
    /// # use randstream::Rng;
    /// let a = Rng::with_seed(1234);
    /// let b = Rng::with_seed(1234);
    /// assert_eq!(a.random::<u64>(), b.random::<u64>());
    /// ```
    pub fn with_seed(seed: i64) -> Self {
        Self {
            state: Cell::new((seed as u64).wrapping_add(INCREMENT)),
        }
    }

    /// Returns a random value of type `T` in the given range.
    ///
    /// # Example
    /// ```
    /// # use randstream::Rng;
    /// let rng = Rng::with_seed(7);
    /// let value: usize = rng.bounded(1..=16);
    /// assert!((1..=16).contains(&value));
    /// ```
    pub fn bounded<T, R>(&self, range: R) -> T
    where
        T: RandomRange<Self>,
        R: RangeBounds<T>,
    {
        T::random_range(self, range)
    }

    /// Fills the slice `data` with random bytes.
    ///
    /// Every full 8-byte word consumes one draw and the trailing partial word, if any, consumes
    /// one more. Filling a shorter slice therefore yields a prefix of what a longer slice would
    /// have received from the same state.
    pub fn fill(&self, data: &mut [u8]) {
        let mut chunks = data.chunks_exact_mut(std::mem::size_of::<u64>());
        for chunk in chunks.by_ref() {
            chunk.copy_from_slice(&self.u64().to_le_bytes());
        }
        let tail = chunks.into_remainder();
        if !tail.is_empty() {
            let bytes = self.u64().to_le_bytes();
            tail.copy_from_slice(&bytes[..tail.len()]);
        }
    }

    /// Returns a random value of type `T`. For integers, the value is in the range `[T::MIN,
    /// T::MAX]`.
    pub fn random<T>(&self) -> T
    where
        T: Random<Self>,
    {
        T::random(self)
    }

    /// Reseeds the stream as if it had just been created by [`Rng::with_seed`].
    pub fn reseed(&self, seed: i64) {
        self.state.set((seed as u64).wrapping_add(INCREMENT));
    }

    /// Returns the next `u64` value from the pseudorandom sequence.
    pub(crate) fn u64(&self) -> u64 {
        // Read the current state and increment it
        let old_state = self.state.get();
        self.state.set(old_state.wrapping_add(INCREMENT));

        // Hash the old state to produce the next value
        wyhash(old_state)
    }
}

#[inline]
pub(crate) fn wyhash(value: u64) -> u64 {
    let mut tmp = (value as u128).wrapping_mul(ALPHA);
    tmp ^= tmp >> 64;
    tmp = tmp.wrapping_mul(BETA);
    ((tmp >> 64) ^ tmp) as _
}

/// A source of uniformly distributed `u64` draws.
pub trait Source {
    /// Returns the next draw.
    fn next_u64(&self) -> u64;
}

impl Source for Rng {
    fn next_u64(&self) -> u64 {
        self.u64()
    }
}

pub trait Random<G> {
    fn random(generator: &G) -> Self;
}

pub trait RandomRange<G> {
    fn random_range<R>(generator: &G, range: R) -> Self
    where
        R: RangeBounds<Self>;
}

impl<G> Random<G> for usize
where
    G: Source,
{
    fn random(generator: &G) -> Self {
        generator.next_u64() as _
    }
}

impl<G> RandomRange<G> for usize
where
    G: Source,
{
    fn random_range<R>(generator: &G, range: R) -> Self
    where
        R: RangeBounds<Self>,
    {
        let start = range.start_bound().map(|&low| low as u64);
        let end = range.end_bound().map(|&high| high as u64);
        u64::random_range(generator, (start, end)) as usize
    }
}

macro_rules! impl_int_random {
    ($($int:ty),+) => {
        $(
            impl<G> Random<G> for $int
            where
                G: Source,
            {
                fn random(generator: &G) -> Self {
                    generator.next_u64() as _
                }
            }
        )+
    };
}

macro_rules! impl_unsigned_random_range {
    ($($int:ty, $dbl:ty),+) => {
        $(impl<G> RandomRange<G> for $int
        where
            G: Source,
            Self: Random<G>,
        {
            fn random_range<R>(generator: &G, range: R) -> Self
            where
                R: RangeBounds<Self>,
            {
                let low = match range.start_bound() {
                    Bound::Included(&low) => low,
                    Bound::Excluded(&low) => low.saturating_add(1),
                    Bound::Unbounded => 0,
                };

                assert!(
                    range.contains(&low),
                    "cannot generate a value from an empty range"
                );
                let width = match range.end_bound() {
                    Bound::Included(&high) => match (high - low).checked_add(1) {
                        Some(width) => width,
                        None => return Self::random(generator),
                    },
                    Bound::Excluded(&high) => high - low,
                    Bound::Unbounded if low > 0 => <$int>::MAX - low + 1,
                    _ => return Self::random(generator),
                };

                // Lemire's nearly divisionless method.
                let mut x = Self::random(generator);
                let mut m = (x as $dbl) * (width as $dbl);
                let mut l = m as $int;
                if l < width {
                    let t = width.wrapping_neg() % width;
                    while l < t {
                        x = Self::random(generator);
                        m = (x as $dbl) * (width as $dbl);
                        l = m as $int;
                    }
                }
                (m >> <$int>::BITS) as $int + low
            }
        })+
    };
}

impl_int_random!(u8, u16, u32, u64);
impl_unsigned_random_range!(u8, u16, u16, u32, u32, u64, u64, u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let a = Rng::with_seed(-42);
        let b = Rng::with_seed(-42);
        for _ in 0..1000 {
            assert_eq!(a.random::<u64>(), b.random::<u64>());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = Rng::with_seed(1);
        let b = Rng::with_seed(2);
        let xs: Vec<u64> = (0..8).map(|_| a.random()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.random()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn reseed_restarts_sequence() {
        let rng = Rng::with_seed(99);
        let first: [u64; 4] = std::array::from_fn(|_| rng.random());
        rng.reseed(99);
        let again: [u64; 4] = std::array::from_fn(|_| rng.random());
        assert_eq!(first, again);
    }

    #[test]
    fn shorter_fill_is_prefix_of_longer_fill() {
        for (short, long) in [(0, 8), (3, 16), (192, 202), (255, 256)] {
            let mut a = vec![0; short];
            let mut b = vec![0; long];
            Rng::with_seed(777).fill(&mut a);
            Rng::with_seed(777).fill(&mut b);
            assert_eq!(a[..], b[..short]);
        }
    }

    #[test]
    fn fill_draws_one_word_per_eight_bytes() {
        let rng = Rng::with_seed(5);
        let mut buffer = [0; 17];
        rng.fill(&mut buffer);

        let reference = Rng::with_seed(5);
        let words: Vec<u64> = (0..3).map(|_| reference.random()).collect();
        assert_eq!(buffer[..8], words[0].to_le_bytes());
        assert_eq!(buffer[8..16], words[1].to_le_bytes());
        assert_eq!(buffer[16], words[2].to_le_bytes()[0]);
        // Both streams are now at the same state.
        assert_eq!(rng.random::<u64>(), reference.random::<u64>());
    }

    #[test]
    fn bounded_respects_inclusive_and_exclusive_ends() {
        let rng = Rng::with_seed(3);
        for _ in 0..10_000 {
            let x: usize = rng.bounded(1..=4);
            assert!((1..=4).contains(&x));
            let y: u8 = rng.bounded(0..26);
            assert!(y < 26);
            let z: u64 = rng.bounded(10..11);
            assert_eq!(z, 10);
        }
    }

    #[test]
    fn bounded_covers_whole_range() {
        let rng = Rng::with_seed(11);
        let mut seen = [false; 26];
        for _ in 0..10_000 {
            let letter: u8 = rng.bounded(0..26);
            seen[letter as usize] = true;
        }
        assert!(seen.iter().all(|&hit| hit));
    }

    #[test]
    fn bounded_full_range_does_not_overflow() {
        let rng = Rng::with_seed(0);
        let _: u64 = rng.bounded(0..=u64::MAX);
        let _: u8 = rng.bounded(..);
    }

    #[test]
    #[should_panic(expected = "cannot generate a value from an empty range")]
    fn bounded_rejects_empty_range() {
        let rng = Rng::with_seed(0);
        let _: u32 = rng.bounded(5..5);
    }
}
