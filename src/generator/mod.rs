//! Deterministic content generators.
//!
//! A [`Generator`] maps a draw stream and a stream position to the next chunk of content. It
//! holds no state of its own: everything that evolves (the draw stream, the position, the
//! number of bytes left) is passed in by the caller, so a producer and a consumer that call it
//! with the same positions in the same order regenerate the same bytes.

use std::fmt;

use crate::{GenerateError, Rng};

mod binary;
mod text;
mod zero;

pub use binary::BinaryGenerator;
pub use text::TextGenerator;
pub use zero::ZeroGenerator;

/// Produces a stream's content one chunk at a time.
///
/// `generate` is called with `pos == 0` first, and every following call receives a `pos` that
/// has grown by exactly the length of the previous chunk. `rem` is the number of bytes the
/// caller still needs. A chunk may be longer than `rem`: callers keep the surplus for their
/// next request instead of dropping it. Chunk boundaries and content must depend only on the
/// draws taken from `rng` and on the arguments.
///
/// # Example
/// ```
/// # use std::sync::Arc;
/// # use randstream::{Consumer, GenerateError, Generator, Producer, Rng};
/// #[derive(Debug)]
/// struct Counter;
///
/// impl Generator for Counter {
///     fn generate(&self, _rng: &Rng, pos: u64, rem: u64) -> Result<Vec<u8>, GenerateError> {
///         Ok((pos..pos + rem.min(16)).map(|i| i as u8).collect())
///     }
/// }
///
/// let generator: Arc<dyn Generator> = Arc::new(Counter);
/// let producer = Producer::with_generator(generator.clone(), 1, 1000);
/// let consumer = Consumer::with_generator(generator, 1, 1000);
/// producer.write_to(&mut &consumer).unwrap();
/// consumer.close().unwrap();
/// ```
pub trait Generator: Send + Sync + fmt::Debug {
    /// Returns the chunk that starts at `pos`.
    fn generate(&self, rng: &Rng, pos: u64, rem: u64) -> Result<Vec<u8>, GenerateError>;
}

/// Length of a fixed-size block capped by the bytes remaining.
pub(crate) fn block_len(block_size: usize, rem: u64) -> usize {
    usize::try_from(rem).map_or(block_size, |rem| rem.min(block_size))
}
