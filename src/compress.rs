//! Huffman sub-stream compression.
//!
//! Full encode pipeline for one payload:
//! 1. Count symbol frequencies (first pass over the source)
//! 2. Build the prefix tree and derive the code table
//! 3. Write a placeholder sub-header and the tree records
//! 4. Encode the source (second pass) into packed code bits
//! 5. Backpatch the sub-header with `data_size` and `padding_bits`

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use tracing::debug;

use crate::codes::CodeTable;
use crate::encode::encode_symbols;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;
use crate::header::StreamHeader;
use crate::records::serialize_tree;
use crate::tree::HuffmanTree;

/// Compress `src` from its current position to end of input, writing one
/// sub-stream to `dst` at its current position.
///
/// `src` is read twice, so it must be seekable. `dst` is left positioned at
/// the end of the sub-stream.
///
/// # Returns
/// The sub-header as written.
pub fn compress_stream<R, W>(src: &mut R, dst: &mut W) -> Result<StreamHeader>
where
    R: Read + Seek,
    W: Write + Seek,
{
    let src_start = src.stream_position()?;
    let frequencies = FrequencyTable::from_reader(&mut *src)?;
    src.seek(SeekFrom::Start(src_start))?;

    let tree = HuffmanTree::from_frequencies(&frequencies);
    let table = CodeTable::from_tree(tree.as_ref());
    let records = tree.as_ref().map(serialize_tree).unwrap_or_default();

    let mut header = StreamHeader {
        padding_bits: 0,
        // At most 256 leaves.
        records_size: u16::try_from(records.len()).map_err(|_| {
            HuffError::CorruptTree(format!("{} leaves in one tree", records.len()))
        })?,
        data_size: 0,
        symbol_count: frequencies.total(),
    };

    let header_pos = dst.stream_position()?;
    header.write_to(dst)?;
    for record in &records {
        record.write_to(dst)?;
    }

    let summary = encode_symbols(src.by_ref().take(header.symbol_count), dst, &table)?;
    if summary.symbol_count != header.symbol_count {
        return Err(HuffError::InputChanged);
    }

    header.data_size = summary.packed.data_size;
    header.padding_bits = summary.packed.padding_bits;

    let end_pos = dst.stream_position()?;
    dst.seek(SeekFrom::Start(header_pos))?;
    header.write_to(dst)?;
    dst.seek(SeekFrom::Start(end_pos))?;

    debug!(
        symbols = header.symbol_count,
        distinct = header.records_size,
        data_size = header.data_size,
        padding_bits = header.padding_bits,
        "compressed sub-stream"
    );

    Ok(header)
}

/// Compress an in-memory buffer into a single sub-stream.
///
/// # Arguments
///
/// * `data` - Bytes to compress (may be empty)
///
/// # Returns
///
/// The sub-header, tree records and packed data as one byte vector.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut src = Cursor::new(data);
    let mut dst = Cursor::new(Vec::new());
    compress_stream(&mut src, &mut dst)?;
    Ok(dst.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::STREAM_HEADER_LEN;

    #[test]
    fn test_compress_aaab_layout() {
        let out = compress(b"aaab").unwrap();

        let mut expected = vec![0x14, 0x00];
        expected.extend_from_slice(&1u64.to_le_bytes());
        expected.extend_from_slice(&4u64.to_le_bytes());
        expected.extend_from_slice(&[1, b'b', 1, b'a']);
        expected.push(0x07);

        assert_eq!(out, expected);
    }

    #[test]
    fn test_compress_empty() {
        let out = compress(&[]).unwrap();
        assert_eq!(out, vec![0u8; STREAM_HEADER_LEN]);
    }

    #[test]
    fn test_compress_single_symbol() {
        let out = compress(&[b'z'; 100]).unwrap();
        assert_eq!(out.len(), STREAM_HEADER_LEN + 2);

        let header = StreamHeader::from_bytes(&out[..STREAM_HEADER_LEN].try_into().unwrap())
            .unwrap();
        assert_eq!(header.records_size, 1);
        assert_eq!(header.data_size, 0);
        assert_eq!(header.padding_bits, 0);
        assert_eq!(header.symbol_count, 100);
        assert_eq!(&out[STREAM_HEADER_LEN..], &[0, b'z']);
    }

    #[test]
    fn test_compress_stream_from_offset() {
        // Only the bytes after the source position are compressed, and the
        // sub-stream is written at the destination position.
        let mut src = Cursor::new(b"skip:aaab".to_vec());
        src.set_position(5);
        let mut dst = Cursor::new(vec![0xEE; 3]);
        dst.set_position(3);

        let header = compress_stream(&mut src, &mut dst).unwrap();
        assert_eq!(header.symbol_count, 4);

        let out = dst.into_inner();
        assert_eq!(&out[..3], &[0xEE; 3]);
        assert_eq!(&out[3..], &compress(b"aaab").unwrap()[..]);
    }

    #[test]
    fn test_compression_shrinks_skewed_input() {
        let mut data = vec![b'a'; 10_000];
        data.extend_from_slice(b"bcdefg");
        let out = compress(&data).unwrap();
        assert!(out.len() < data.len() / 4);
    }
}
