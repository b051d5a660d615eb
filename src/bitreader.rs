//! Sequential bit reader for packed code data.
//!
//! Bits are read LSB-first within each byte, mirroring
//! [`BitWriter`](crate::bitwriter::BitWriter):
//! - Bit position 0 in the stream is bit 0 (LSB) of the first byte
//! - Bit position 7 in the stream is bit 7 (MSB) of the first byte
//!
//! The reader knows how many bytes belong to the packed data and how many
//! high bits of the last byte are padding, so it reports end of data exactly
//! where the meaningful bits end.

use std::io::Read;

use crate::error::{HuffError, Result};

/// Sequential LSB-first bit reader over a bounded byte stream.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Source data.
    inner: R,
    /// Bytes of packed data not yet pulled from `inner`.
    bytes_left: u64,
    /// Unused high bits of the last byte.
    padding_bits: u8,
    /// Byte currently being consumed, already shifted.
    current: u8,
    /// Meaningful bits left in `current`.
    bits_in_current: u8,
    /// Current bit position.
    bit_pos: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new bit reader.
    ///
    /// # Arguments
    /// * `inner` - Source positioned at the first packed byte
    /// * `data_size` - Number of packed bytes
    /// * `padding_bits` - Unused high bits of the last byte (0-7)
    pub fn new(inner: R, data_size: u64, padding_bits: u8) -> Self {
        debug_assert!(padding_bits < 8);
        Self {
            inner,
            bytes_left: data_size,
            padding_bits,
            current: 0,
            bits_in_current: 0,
            bit_pos: 0,
        }
    }

    /// Get current bit position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.bit_pos
    }

    /// Number of meaningful bits not yet read.
    pub fn remaining(&self) -> u64 {
        let pending = if self.bytes_left == 0 {
            0
        } else {
            (self.bytes_left - 1) * 8 + u64::from(8 - self.padding_bits)
        };
        u64::from(self.bits_in_current) + pending
    }

    /// Check if there are more meaningful bits to read.
    #[inline]
    pub fn has_bits(&self) -> bool {
        self.bits_in_current > 0 || self.bytes_left > 0
    }

    /// Read a single bit.
    ///
    /// # Returns
    /// `Some(bit)`, or `None` once every meaningful bit has been read. The
    /// padding bits of the last byte are never returned.
    #[inline]
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_in_current == 0 {
            if self.bytes_left == 0 {
                return Ok(None);
            }

            let mut byte = [0u8; 1];
            self.inner
                .read_exact(&mut byte)
                .map_err(|e| HuffError::from_read(e, "packed data"))?;
            self.bytes_left -= 1;
            self.current = byte[0];
            self.bits_in_current = if self.bytes_left == 0 {
                8 - self.padding_bits
            } else {
                8
            };
        }

        let bit = self.current & 1 == 1;
        self.current >>= 1;
        self.bits_in_current -= 1;
        self.bit_pos += 1;

        Ok(Some(bit))
    }

    /// Give back the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}
