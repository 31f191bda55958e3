//! Tunables for producers and consumers.

/// Bounds on how many bytes a [`Producer`](crate::Producer) exposes per read.
///
/// With jitter active, every read whose buffer is larger than `min` copies a pseudo-random
/// number of bytes in `min..=min(buf.len(), max)`, simulating the short reads a real
/// [`Read`](std::io::Read) implementation is allowed to return. The lengths are drawn from a
/// stream of their own, so the content of the stream does not depend on these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jitter {
    /// Smallest number of bytes returned by a jittered read.
    pub min: usize,
    /// Largest number of bytes returned by a jittered read.
    pub max: usize,
}

impl Jitter {
    /// Jitter bounds that never shorten a read.
    pub const fn disabled() -> Self {
        Self { min: 1, max: 1 }
    }

    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whether a read into a buffer of `capacity` bytes draws its length.
    pub(crate) fn applies_to(&self, capacity: usize) -> bool {
        self.min < capacity && self.min < self.max
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self {
            min: 1,
            max: i32::MAX as usize,
        }
    }
}

/// What a [`Consumer`](crate::Consumer) does with writes after a mismatch or overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AfterFailure {
    /// Reject every later write with [`VerifyError::Terminated`](crate::VerifyError).
    #[default]
    Reject,

    /// Keep comparing later writes at their true offsets.
    ///
    /// A mismatching write still moves the verified position past itself, and an overflowing
    /// write moves it to the end of the stream.
    Continue,
}
