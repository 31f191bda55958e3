use crate::{GenerateError, Generator, Rng};

use super::block_len;

/// Emits uniformly distributed bytes in fixed-size blocks.
#[derive(Debug, Clone, Copy)]
pub struct BinaryGenerator {
    block_size: usize,
}

impl Default for BinaryGenerator {
    fn default() -> Self {
        Self { block_size: 256 }
    }
}

impl Generator for BinaryGenerator {
    fn generate(&self, rng: &Rng, _pos: u64, rem: u64) -> Result<Vec<u8>, GenerateError> {
        let mut block = vec![0; block_len(self.block_size, rem)];
        rng.fill(&mut block);
        Ok(block)
    }
}
