use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    pending::Pending, AfterFailure, ByteCount, DataType, Generator, Result, Rng, VerifyError,
};

/// Size of the intermediate buffer used by [`Consumer::read_from`].
const COPY_BUF_SIZE: usize = 8192;

/// Longest byte window reported by a mismatch.
const MISMATCH_WINDOW: usize = 8;

/// Verifies that written bytes are exactly the stream a matching [`Producer`] yields.
///
/// The expected content is regenerated on the fly, so streams of any length are verified in
/// bounded memory, and the writes may be chunked in any way. Call [`Consumer::close`] at the
/// end to detect a stream that was cut short.
///
/// All methods take `&self`. Concurrent calls are serialized by an internal lock.
///
/// [`Producer`]: crate::Producer
///
/// # Example
/// ```
/// # use randstream::{Consumer, DataType, Producer, VerifyError};
/// let producer = Producer::new(DataType::Binary, 777, 3_000_000)?;
/// let consumer = Consumer::new(DataType::Binary, 777, 3_000_010)?;
///
/// producer.write_to(&mut &consumer)?;
/// let err = consumer.close().unwrap_err();
/// assert_eq!(err.to_string(), "not enough bytes: 10 B short");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Consumer {
    data_type: DataType,
    seed: i64,
    size: u64,
    generator: Arc<dyn Generator>,
    policy: AfterFailure,
    state: Mutex<ConsumerState>,
}

#[derive(Debug)]
struct ConsumerState {
    /// Number of bytes accepted so far.
    verified: u64,
    pending: Pending,
    rng: Rng,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    /// A mismatch or overflow has been reported.
    Failed,
    /// The generator failed; nothing more can be compared.
    Aborted,
    Closed,
}

impl Consumer {
    /// Creates a consumer expecting `size` bytes of `data_type` content.
    ///
    /// Fails with [`Error::UnsupportedType`](crate::Error::UnsupportedType) for types without
    /// a built-in generator.
    pub fn new(data_type: DataType, seed: i64, size: u64) -> Result<Self> {
        let generator = data_type.generator()?;
        Ok(Self::from_parts(data_type, generator, seed, size))
    }

    /// Creates a consumer expecting content from a custom generator.
    pub fn with_generator(generator: Arc<dyn Generator>, seed: i64, size: u64) -> Self {
        Self::from_parts(DataType::Custom, generator, seed, size)
    }

    pub(crate) fn from_parts(
        data_type: DataType,
        generator: Arc<dyn Generator>,
        seed: i64,
        size: u64,
    ) -> Self {
        let state = ConsumerState {
            verified: 0,
            pending: Pending::default(),
            rng: Rng::with_seed(seed),
            phase: Phase::Open,
        };
        Self {
            data_type,
            seed,
            size,
            generator,
            policy: AfterFailure::default(),
            state: Mutex::new(state),
        }
    }

    /// Sets what happens to writes after a mismatch or overflow.
    pub fn with_policy(mut self, policy: AfterFailure) -> Self {
        self.policy = policy;
        self
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Declared length of the stream.
    pub fn size(&self) -> ByteCount {
        ByteCount::new(self.size)
    }

    /// Number of bytes accepted so far.
    pub fn total_verified(&self) -> ByteCount {
        ByteCount::new(self.state().verified)
    }

    /// Compares `bytes` with the next part of the stream and returns their length on success.
    pub fn verify(&self, bytes: &[u8]) -> std::result::Result<usize, VerifyError> {
        let mut guard = self.state();
        let state = &mut *guard;

        match state.phase {
            Phase::Closed => return Err(VerifyError::Closed),
            Phase::Aborted => return Err(VerifyError::Terminated),
            Phase::Failed if self.policy == AfterFailure::Reject => {
                return Err(VerifyError::Terminated)
            }
            _ => {}
        }
        if bytes.is_empty() {
            return Ok(0);
        }

        let start = state.verified;
        let in_range = usize::try_from(self.size - start)
            .map_or(bytes.len(), |remaining| remaining.min(bytes.len()));
        let (inside, extra) = bytes.split_at(in_range);

        let mismatch = match self.compare(state, inside) {
            Ok(mismatch) => mismatch,
            Err(err) => {
                log::warn!(
                    "verification of {} stream aborted at offset {start}: {err}",
                    self.data_type
                );
                state.phase = Phase::Aborted;
                return Err(err);
            }
        };

        if let Some(err) = mismatch {
            log::warn!("{} stream: {err}", self.data_type);
            state.phase = Phase::Failed;
            if self.policy == AfterFailure::Continue {
                state.verified += inside.len() as u64;
            }
            return Err(err);
        }

        state.verified += inside.len() as u64;
        if !extra.is_empty() {
            log::warn!(
                "{} stream: {} bytes written past the end of {}",
                self.data_type,
                extra.len(),
                ByteCount::new(self.size)
            );
            state.phase = Phase::Failed;
            return Err(VerifyError::Overflow {
                expected_len: ByteCount::new(self.size),
                written_len: ByteCount::new(start + bytes.len() as u64),
                accepted: inside.to_vec(),
                extra: extra.to_vec(),
            });
        }
        Ok(bytes.len())
    }

    /// Walks `data` through the expected content starting at the verified position, returning
    /// the first difference.
    ///
    /// The expected content for all of `data` is consumed even after a difference is found, so
    /// the pending chunk stays aligned with `verified + data.len()`.
    fn compare(
        &self,
        state: &mut ConsumerState,
        data: &[u8],
    ) -> std::result::Result<Option<VerifyError>, VerifyError> {
        let start = state.verified;
        // Index of the first divergent byte and the expected bytes collected from there on.
        let mut divergence: Option<(usize, Vec<u8>)> = None;
        let mut offset = 0;

        while offset < data.len() {
            if state.pending.is_empty() {
                let pos = start + offset as u64;
                state
                    .pending
                    .refill(&*self.generator, &state.rng, pos, self.size - pos)
                    .map_err(VerifyError::Generate)?;
            }
            let available = state.pending.remaining();
            let n = available.len().min(data.len() - offset);
            let expected = &available[..n];
            let actual = &data[offset..offset + n];

            match &mut divergence {
                None => {
                    if let Some(i) = expected.iter().zip(actual).position(|(e, a)| e != a) {
                        let end = (i + MISMATCH_WINDOW).min(n);
                        divergence = Some((offset + i, expected[i..end].to_vec()));
                    }
                }
                Some((index, window)) => {
                    let window_end = (*index + MISMATCH_WINDOW).min(data.len());
                    if offset < window_end {
                        let take = (window_end - offset).min(n);
                        window.extend_from_slice(&expected[..take]);
                    }
                }
            }

            state.pending.consume(n);
            offset += n;
        }

        Ok(divergence.map(|(index, expected)| {
            let end = (index + MISMATCH_WINDOW).min(data.len());
            VerifyError::Mismatch {
                offset: start + index as u64,
                expected,
                actual: data[index..end].to_vec(),
            }
        }))
    }

    /// Finishes verification, failing if fewer bytes than declared were written.
    ///
    /// Later writes fail with [`VerifyError::Closed`].
    pub fn close(&self) -> std::result::Result<(), VerifyError> {
        let mut state = self.state();
        state.phase = Phase::Closed;
        if state.verified < self.size {
            log::warn!(
                "{} stream closed after {} of {}",
                self.data_type,
                ByteCount::new(state.verified),
                ByteCount::new(self.size)
            );
            return Err(VerifyError::Shortfall {
                expected_len: ByteCount::new(self.size),
                written_len: ByteCount::new(state.verified),
            });
        }
        log::debug!("{} stream of {} verified", self.data_type, ByteCount::new(self.size));
        Ok(())
    }

    /// Verifies everything `reader` yields until its end, returning the number of bytes read.
    ///
    /// Stops at the first error of either the reader or the verification. The error does not
    /// carry a byte count: [`Consumer::total_verified`] then tells how far the stream was
    /// accepted, and a [`VerifyError::Mismatch`] or [`VerifyError::Overflow`] locates the
    /// failing bytes. The consumer is not closed.
    pub fn read_from<R: Read + ?Sized>(
        &self,
        reader: &mut R,
    ) -> std::result::Result<u64, VerifyError> {
        let mut buf = vec![0; COPY_BUF_SIZE];
        let mut total = 0;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(VerifyError::Io(err)),
            };
            self.verify(&buf[..n])?;
            total += n as u64;
        }
    }

    /// Verifies the contents of the file at `path`. The consumer is not closed.
    pub fn read_from_file<P: AsRef<Path>>(&self, path: P) -> std::result::Result<u64, VerifyError> {
        let mut file = File::open(path)?;
        self.read_from(&mut file)
    }

    /// Locks the state. A lock poisoned by a panicking generator ends verification, since the
    /// expected content can no longer be regenerated.
    fn state(&self) -> MutexGuard<'_, ConsumerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            let mut state = poisoned.into_inner();
            if matches!(state.phase, Phase::Open | Phase::Failed) {
                log::warn!(
                    "verification of {} stream aborted at offset {} by a panic",
                    self.data_type,
                    state.verified
                );
                state.phase = Phase::Aborted;
            }
            state
        })
    }
}

impl Write for Consumer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.verify(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Write for &Consumer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.verify(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
