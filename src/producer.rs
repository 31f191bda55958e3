use std::{
    io::{self, Read, Write},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    pending::Pending, ByteCount, Consumer, DataType, Error, GenerateError, Generator, Jitter,
    Result, Rng,
};

/// Size of the intermediate buffer used by [`Producer::write_to`].
const COPY_BUF_SIZE: usize = 8192;

/// A reproducible pseudo-random byte stream.
///
/// A producer built from a data type, a seed and a size always yields the same bytes, and a
/// [`Consumer`] built from the same parameters verifies them. Reads intentionally return fewer
/// bytes than requested (see [`Jitter`]) to exercise callers' handling of short reads; code
/// that cannot cope should wrap the producer in a [`std::io::BufReader`].
///
/// All methods take `&self`. Concurrent calls are serialized by an internal lock.
///
/// # Example
/// ```
/// # use randstream::{DataType, Producer};
/// let producer = Producer::new(DataType::Binary, 123, 5_000_000)?;
/// let consumer = producer.verifier();
///
/// let mut buf = [0; 256];
/// loop {
///     let n = producer.read(&mut buf)?;
///     if n == 0 {
///         break;
///     }
///     consumer.verify(&buf[..n])?;
/// }
/// consumer.close()?;
///
/// assert_eq!(producer.total_read().to_string(), "5.0 MB");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Producer {
    data_type: DataType,
    seed: i64,
    size: u64,
    generator: Arc<dyn Generator>,
    state: Mutex<ProducerState>,
}

#[derive(Debug)]
struct ProducerState {
    /// Number of bytes handed out so far.
    read: u64,
    pending: Pending,
    jitter: Jitter,
    /// Draws read lengths.
    len_rng: Rng,
    /// Draws content.
    data_rng: Rng,
    /// Set once the generator has failed.
    aborted: bool,
    /// Generator failure not yet reported because the failing read had already copied bytes.
    deferred: Option<GenerateError>,
}

impl Producer {
    /// Creates a producer of `size` bytes of `data_type` content.
    ///
    /// Fails with [`Error::UnsupportedType`] for types without a built-in generator.
    pub fn new(data_type: DataType, seed: i64, size: u64) -> Result<Self> {
        let generator = data_type.generator()?;
        Ok(Self::from_parts(data_type, generator, seed, size))
    }

    /// Creates a producer whose content comes from a custom generator.
    pub fn with_generator(generator: Arc<dyn Generator>, seed: i64, size: u64) -> Self {
        Self::from_parts(DataType::Custom, generator, seed, size)
    }

    fn from_parts(data_type: DataType, generator: Arc<dyn Generator>, seed: i64, size: u64) -> Self {
        let state = ProducerState {
            read: 0,
            pending: Pending::default(),
            jitter: Jitter::default(),
            len_rng: Rng::with_seed(seed),
            data_rng: Rng::with_seed(seed),
            aborted: false,
            deferred: None,
        };
        Self {
            data_type,
            seed,
            size,
            generator,
            state: Mutex::new(state),
        }
    }

    /// Replaces the read-length bounds.
    pub fn with_jitter(mut self, jitter: Jitter) -> Self {
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .jitter = jitter;
        self
    }

    /// Replaces the read-length bounds for subsequent reads.
    pub fn set_jitter(&self, jitter: Jitter) {
        self.state().jitter = jitter;
    }

    /// Returns a consumer that verifies the bytes of this stream.
    pub fn verifier(&self) -> Consumer {
        Consumer::from_parts(self.data_type, self.generator.clone(), self.seed, self.size)
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

    /// Total number of bytes read so far.
    pub fn total_read(&self) -> ByteCount {
        ByteCount::new(self.state().read)
    }

    /// Whether every byte of the stream has been read.
    pub fn is_eof(&self) -> bool {
        self.state().read >= self.size
    }

    /// Reads the next bytes of the stream into `buf`, returning how many were copied.
    ///
    /// Returns `Ok(0)` at the end of the stream. With jitter active the count is often smaller
    /// than `buf.len()` even when more data is left.
    pub fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_chunk(buf)?)
    }

    /// Reads a single byte, or `None` at the end of the stream.
    pub fn read_byte(&self) -> io::Result<Option<u8>> {
        let mut byte = [0];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Copies the rest of the stream into `writer`, returning the number of bytes written.
    ///
    /// Stops at the first error of either the writer or the generator.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<u64> {
        let mut buf = vec![0; COPY_BUF_SIZE];
        let mut written = 0;
        loop {
            let n = self.read(&mut buf)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buf[..n])?;
            written += n as u64;
        }
        log::debug!("copied {} of {} stream", ByteCount::new(written), self.data_type);
        Ok(written)
    }

    fn read_chunk(&self, buf: &mut [u8]) -> Result<usize> {
        let mut guard = self.state();
        let state = &mut *guard;

        if state.aborted {
            return Err(state
                .deferred
                .take()
                .map_or(Error::StreamAborted, Error::Generate));
        }
        if state.read >= self.size || buf.is_empty() {
            return Ok(0);
        }

        let mut len = buf.len();
        if state.jitter.applies_to(len) {
            let max = len.min(state.jitter.max);
            // A zero-length read would look like the end of the stream.
            len = state.len_rng.bounded(state.jitter.min.max(1)..=max);
        }
        let remaining = self.size - state.read;
        len = usize::try_from(remaining).map_or(len, |remaining| len.min(remaining));

        let mut copied = 0;
        while copied < len {
            if state.pending.is_empty() {
                let refill = state.pending.refill(
                    &*self.generator,
                    &state.data_rng,
                    state.read,
                    self.size - state.read,
                );
                if let Err(err) = refill {
                    log::warn!("{} stream aborted at offset {}: {err}", self.data_type, state.read);
                    state.aborted = true;
                    if copied == 0 {
                        return Err(Error::Generate(err));
                    }
                    state.deferred = Some(err);
                    break;
                }
            }
            let available = state.pending.remaining();
            let n = available.len().min(len - copied);
            buf[copied..copied + n].copy_from_slice(&available[..n]);
            state.pending.consume(n);
            state.read += n as u64;
            copied += n;
        }

        if state.read == self.size {
            log::debug!("{} stream of {} exhausted", self.data_type, ByteCount::new(self.size));
        }
        Ok(copied)
    }

    /// Locks the state. A lock poisoned by a panicking generator ends the stream, since the
    /// draws taken before the panic can not be replayed.
    fn state(&self) -> MutexGuard<'_, ProducerState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            let mut state = poisoned.into_inner();
            if !state.aborted {
                log::warn!("{} stream aborted at offset {} by a panic", self.data_type, state.read);
                state.aborted = true;
            }
            state
        })
    }
}

impl Read for Producer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Producer::read(self, buf)
    }
}

impl Read for &Producer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Producer::read(*self, buf)
    }
}
