//! Symbol encoding loop.
//!
//! Each input byte is replaced by its code from the [`CodeTable`], packed
//! LSB-first by a [`BitWriter`]. Symbols whose code has length 0 (the lone
//! leaf case) consume no output bits.

use std::io::{self, Read, Write};

use crate::bitwriter::{BitWriter, PackedBits};
use crate::codes::CodeTable;
use crate::error::{HuffError, Result};

const READ_CHUNK: usize = 8192;

/// Outcome of [`encode_symbols`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Symbols consumed from the source.
    pub symbol_count: u64,
    /// Packed output totals.
    pub packed: PackedBits,
}

/// Encode every byte of `src` into `dst`.
///
/// # Errors
/// [`HuffError::InputChanged`] if `src` yields a symbol absent from `table`.
pub fn encode_symbols<R: Read, W: Write>(
    mut src: R,
    dst: &mut W,
    table: &CodeTable,
) -> Result<EncodeSummary> {
    let mut writer = BitWriter::new(dst);
    let mut buf = [0u8; READ_CHUNK];
    let mut symbol_count = 0u64;

    loop {
        let n = match src.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &symbol in &buf[..n] {
            let code = table.get(symbol).ok_or(HuffError::InputChanged)?;
            writer.write_code(code)?;
        }
        symbol_count += n as u64;
    }

    let packed = writer.finish()?;
    Ok(EncodeSummary {
        symbol_count,
        packed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::FrequencyTable;
    use crate::tree::HuffmanTree;

    fn table_for(data: &[u8]) -> CodeTable {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data));
        CodeTable::from_tree(tree.as_ref())
    }

    #[test]
    fn test_encode_aaab() {
        let data = b"aaab";
        let mut out = Vec::new();
        let summary = encode_symbols(&data[..], &mut out, &table_for(data)).unwrap();

        // a = 1, b = 0 -> bits 1,1,1,0 -> 0x07
        assert_eq!(out, vec![0x07]);
        assert_eq!(summary.symbol_count, 4);
        assert_eq!(summary.packed.data_size, 1);
        assert_eq!(summary.packed.padding_bits, 4);
    }

    #[test]
    fn test_encode_empty() {
        let mut out = Vec::new();
        let summary = encode_symbols(&[0u8; 0][..], &mut out, &CodeTable::from_tree(None)).unwrap();
        assert!(out.is_empty());
        assert_eq!(summary, EncodeSummary::default());
    }

    #[test]
    fn test_encode_single_symbol_emits_nothing() {
        let data = vec![b'x'; 1000];
        let mut out = Vec::new();
        let summary = encode_symbols(&data[..], &mut out, &table_for(&data)).unwrap();
        assert!(out.is_empty());
        assert_eq!(summary.symbol_count, 1000);
        assert_eq!(summary.packed.padding_bits, 0);
    }

    #[test]
    fn test_encode_bit_count_matches_code_lengths() {
        let data = b"abracadabra alakazam";
        let table = table_for(data);
        let expected: u64 = data
            .iter()
            .map(|&b| table.get(b).unwrap().len() as u64)
            .sum();

        let mut out = Vec::new();
        let summary = encode_symbols(&data[..], &mut out, &table).unwrap();
        assert_eq!(summary.packed.bit_count, expected);
        assert_eq!(out.len() as u64, (expected + 7) / 8);
        assert_eq!(
            u64::from(summary.packed.padding_bits),
            (8 - expected % 8) % 8
        );
    }

    #[test]
    fn test_unknown_symbol_is_input_changed() {
        let table = table_for(b"aaaa");
        let mut out = Vec::new();
        let result = encode_symbols(&b"ab"[..], &mut out, &table);
        assert!(matches!(result, Err(HuffError::InputChanged)));
    }
}
