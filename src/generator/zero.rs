use crate::{GenerateError, Generator, Rng};

use super::block_len;

/// Emits zero bytes in fixed-size blocks without touching the draw stream.
#[derive(Debug, Clone, Copy)]
pub struct ZeroGenerator {
    block_size: usize,
}

impl Default for ZeroGenerator {
    fn default() -> Self {
        Self { block_size: 256 }
    }
}

impl Generator for ZeroGenerator {
    fn generate(&self, _rng: &Rng, _pos: u64, rem: u64) -> Result<Vec<u8>, GenerateError> {
        Ok(vec![0; block_len(self.block_size, rem)])
    }
}
