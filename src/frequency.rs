//! Symbol frequency counting.
//!
//! A single pass over the input produces one count per byte value. The table
//! is immutable once built; symbols with a zero count contribute no leaf to
//! the prefix tree.

use std::io::{self, Read};

/// Number of distinct symbols (one byte each).
pub const ALPHABET_SIZE: usize = 256;

const READ_CHUNK: usize = 8192;

/// Occurrence count per symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        for &byte in data {
            counts[usize::from(byte)] += 1;
        }
        Self { counts }
    }

    /// Drain `reader` to end of input, counting every byte.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut counts = [0u64; ALPHABET_SIZE];
        let mut buf = [0u8; READ_CHUNK];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            for &byte in &buf[..n] {
                counts[usize::from(byte)] += 1;
            }
        }

        Ok(Self { counts })
    }

    /// Occurrences of `symbol`.
    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[usize::from(symbol)]
    }

    /// Total number of symbols counted, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |total, &count| total.saturating_add(count))
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// True when no symbol was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// `(symbol, count)` pairs with a nonzero count, in ascending symbol order.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }
}

impl From<[u64; ALPHABET_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_from_bytes() {
        let table = FrequencyTable::from_bytes(b"aaab");
        assert_eq!(table.count(b'a'), 3);
        assert_eq!(table.count(b'b'), 1);
        assert_eq!(table.count(b'c'), 0);
        assert_eq!(table.total(), 4);
        assert_eq!(table.distinct(), 2);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.distinct(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_from_reader_drains_input() {
        // Larger than one read chunk.
        let data: Vec<u8> = (0..20_000u32).map(|i| (i % 7) as u8).collect();
        let mut cursor = Cursor::new(&data);

        let table = FrequencyTable::from_reader(&mut cursor).unwrap();
        assert_eq!(table, FrequencyTable::from_bytes(&data));
        assert_eq!(cursor.position(), data.len() as u64);
        assert_eq!(table.distinct(), 7);
    }

    #[test]
    fn test_iter_nonzero_ordered() {
        let table = FrequencyTable::from_bytes(&[0xFF, 0x00, 0x10, 0x10]);
        let pairs: Vec<(u8, u64)> = table.iter_nonzero().collect();
        assert_eq!(pairs, vec![(0x00, 1), (0x10, 2), (0xFF, 1)]);
    }

    #[test]
    fn test_total_saturates() {
        let mut counts = [0u64; ALPHABET_SIZE];
        counts[3] = u64::MAX;
        counts[4] = 10;
        assert_eq!(FrequencyTable::from(counts).total(), u64::MAX);
    }
}
