//! Huffman sub-stream decompression.
//!
//! Reads the sub-header, validates it before touching the records, rebuilds
//! the tree from the records and decodes exactly `data_size` packed bytes.
//!
//! Output size is bounded by `symbol_count`, not by the input size. A lone
//! leaf tree has a zero-length code, so a 20-byte sub-stream may legally
//! declare any number of repeats of its symbol. Callers extracting untrusted
//! data should check [`StreamHeader::symbol_count`] or cap the writer.

use std::io::{Read, Write};

use tracing::debug;

use crate::bitreader::BitReader;
use crate::decode::decode_symbols;
use crate::error::{HuffError, Result};
use crate::header::StreamHeader;
use crate::records::{reconstruct_tree, TreeRecord};

/// Decompress one sub-stream from `src` into `dst`.
///
/// On success `src` is positioned just past the sub-stream.
///
/// # Errors
///
/// Returns `HuffError` if:
/// - the sub-header is out of range (e.g. more than 256 records)
/// - the records do not form a single tree
/// - the packed bits do not decode to exactly `symbol_count` symbols
pub fn decompress_stream<R: Read, W: Write>(src: &mut R, dst: &mut W) -> Result<StreamHeader> {
    let header = StreamHeader::read_from(src)?;

    let mut records = Vec::with_capacity(usize::from(header.records_size));
    for _ in 0..header.records_size {
        records.push(TreeRecord::read_from(src)?);
    }

    let Some(tree) = reconstruct_tree(&records)? else {
        // validate() guarantees an empty payload here.
        return Ok(header);
    };

    let mut reader = BitReader::new(&mut *src, header.data_size, header.padding_bits);
    decode_symbols(&mut reader, dst, &tree, header.symbol_count)?;

    debug!(
        symbols = header.symbol_count,
        distinct = header.records_size,
        data_size = header.data_size,
        "decompressed sub-stream"
    );

    Ok(header)
}

/// Decompress an in-memory sub-stream.
///
/// # Arguments
///
/// * `data` - One complete sub-stream as produced by [`compress()`](fn@crate::compress)
///
/// # Returns
///
/// The original bytes. Bytes after the sub-stream are rejected.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut src = data;
    let mut out = Vec::new();
    let header = decompress_stream(&mut src, &mut out)?;

    if !src.is_empty() {
        return Err(HuffError::CorruptData(format!(
            "{} trailing bytes after a {}-byte payload",
            src.len(),
            header.data_size
        )));
    }

    Ok(out)
}
