//! Bit packer for compressed output.
//!
//! Bits are appended LSB-first within each byte:
//! - First bit appended goes to bit position 0
//! - Second bit goes to position 1, etc.
//!
//! Complete bytes are flushed to the underlying writer as soon as they fill,
//! so at most 7 bits are held between calls. When the stream is finished a
//! partial last byte is flushed and the number of unused high bits is
//! reported as `padding_bits`.

#![allow(clippy::cast_possible_truncation)]

use std::io::{self, Write};

use crate::codes::Code;

/// Largest run accepted by [`BitWriter::write_bits`].
const MAX_RUN_BITS: usize = 56;

/// Code bits are fed to the accumulator in runs of this size.
const CODE_RUN_BITS: usize = 32;

/// Totals reported when a [`BitWriter`] is finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackedBits {
    /// Bytes flushed to the underlying writer.
    pub data_size: u64,
    /// Unused high bits of the last byte (0-7).
    pub padding_bits: u8,
    /// Meaningful bits written.
    pub bit_count: u64,
}

/// LSB-first bit packer over any writer.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// Pending bits, right-justified.
    acc: u64,
    /// Number of bits in the accumulator.
    acc_len: usize,
    /// Total number of bits written.
    num_bits: u64,
    /// Bytes flushed to `inner`.
    bytes_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            acc: 0,
            acc_len: 0,
            num_bits: 0,
            bytes_written: 0,
        }
    }

    /// Total number of bits written so far.
    #[inline]
    pub fn len(&self) -> u64 {
        self.num_bits
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Flush complete bytes from the accumulator.
    fn flush_acc(&mut self) -> io::Result<()> {
        let mut bytes = [0u8; 8];
        let mut n = 0;
        while self.acc_len >= 8 {
            bytes[n] = (self.acc & 0xFF) as u8;
            n += 1;
            self.acc >>= 8;
            self.acc_len -= 8;
        }
        if n > 0 {
            self.inner.write_all(&bytes[..n])?;
            self.bytes_written += n as u64;
        }
        Ok(())
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.write_bits(u64::from(bit), 1)
    }

    /// Append the low `count` bits of `value`, least significant first.
    ///
    /// # Arguments
    /// * `value` - Bits to append (right-justified)
    /// * `count` - Number of bits to append (0-56)
    pub fn write_bits(&mut self, value: u64, count: usize) -> io::Result<()> {
        debug_assert!(count <= MAX_RUN_BITS);
        if count == 0 {
            return Ok(());
        }

        let mask = (1u64 << count) - 1;
        self.acc |= (value & mask) << self.acc_len;
        self.acc_len += count;
        self.num_bits += count as u64;

        self.flush_acc()
    }

    /// Append every bit of `code` in root-to-leaf order. A zero-length code
    /// appends nothing.
    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        let mut offset = 0;
        while offset < code.len() {
            let run = (code.len() - offset).min(CODE_RUN_BITS);
            self.write_bits(code.chunk(offset, run), run)?;
            offset += run;
        }
        Ok(())
    }

    /// Flush the partial last byte, if any, and report totals.
    pub fn finish(mut self) -> io::Result<PackedBits> {
        let mut padding_bits = 0;
        if self.acc_len > 0 {
            padding_bits = (8 - self.acc_len) as u8;
            self.inner.write_all(&[(self.acc & 0xFF) as u8])?;
            self.bytes_written += 1;
            self.acc = 0;
            self.acc_len = 0;
        }

        Ok(PackedBits {
            data_size: self.bytes_written,
            padding_bits,
            bit_count: self.num_bits,
        })
    }
}
