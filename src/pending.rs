use crate::{error::EmptyChunk, GenerateError, Generator, Rng};

/// The generated chunk a stream is currently working through.
///
/// Producers and consumers refill it only once it is fully consumed, always asking the
/// generator for the chunk at the current stream position. That keeps the sequence of
/// generator calls independent of how callers size their reads and writes.
#[derive(Debug, Default)]
pub(crate) struct Pending {
    chunk: Vec<u8>,
    cursor: usize,
}

impl Pending {
    pub(crate) fn is_empty(&self) -> bool {
        self.cursor == self.chunk.len()
    }

    pub(crate) fn remaining(&self) -> &[u8] {
        &self.chunk[self.cursor..]
    }

    pub(crate) fn consume(&mut self, len: usize) {
        debug_assert!(len <= self.chunk.len() - self.cursor);
        self.cursor += len;
    }

    /// Replaces the exhausted chunk with the one starting at `pos`.
    pub(crate) fn refill(
        &mut self,
        generator: &dyn Generator,
        rng: &Rng,
        pos: u64,
        rem: u64,
    ) -> Result<(), GenerateError> {
        let chunk = generator.generate(rng, pos, rem)?;
        if chunk.is_empty() {
            return Err(EmptyChunk { pos }.into());
        }
        log::trace!("generated {} bytes at offset {pos}", chunk.len());
        self.chunk = chunk;
        self.cursor = 0;
        Ok(())
    }
}
