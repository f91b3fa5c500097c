//! MSB-first bit packer writing 32-bit big-endian words into a caller buffer.

use crate::image_pipeline::nef::error::{NefEncodeError, Result};

const WORD_BITS: u32 = u32::BITS;

pub struct BitWriter<'a> {
    output: &'a mut [u8],
    /// Bytes reported as written. Physical words may extend past this after `flush`.
    bytes_stored: usize,
    word: u32,
    valid_bits: u32,
}

impl<'a> BitWriter<'a> {
    pub fn new(output: &'a mut [u8]) -> Self {
        Self {
            output,
            bytes_stored: 0,
            word: 0,
            valid_bits: 0,
        }
    }

    pub fn bytes_stored(&self) -> usize {
        self.bytes_stored
    }

    pub fn capacity(&self) -> usize {
        self.output.len()
    }

    /// Appends the low `count` bits of `value`, most significant first.
    ///
    /// Bits that straddle a word boundary are split: the full word is
    /// stored and the remainder starts the next one.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 32 or more.
    pub fn append_bits(&mut self, count: u32, value: u32) -> Result<()> {
        assert!(count < WORD_BITS, "append of {count} bits");

        let mut remaining = count;
        while remaining > 0 {
            let take = remaining.min(WORD_BITS - self.valid_bits);
            let mask = (1u32 << take) - 1;

            self.word = (self.word << take) | ((value >> (remaining - take)) & mask);
            self.valid_bits += take;

            if self.valid_bits == WORD_BITS {
                self.store_word()?;
            }

            remaining -= take;
        }
        Ok(())
    }

    /// Zero-pads a partial word and stores it.
    ///
    /// Whole padding bytes stay in the buffer but are dropped from the count.
    pub fn flush(&mut self) -> Result<()> {
        if self.valid_bits > 0 {
            let pad_bits = WORD_BITS - self.valid_bits;
            self.append_bits(pad_bits, 0)?;
            self.bytes_stored -= (pad_bits / 8) as usize;
        }
        Ok(())
    }

    fn store_word(&mut self) -> Result<()> {
        let start = self.bytes_stored;
        let capacity = self.output.len();
        let slot = self
            .output
            .get_mut(start..start + 4)
            .ok_or(NefEncodeError::OutputBufferTooSmall {
                required: start + 4,
                capacity,
            })?;
        slot.copy_from_slice(&self.word.to_be_bytes());

        self.bytes_stored += 4;
        self.word = 0;
        self.valid_bits = 0;
        Ok(())
    }
}
