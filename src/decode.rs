//! Tree-walk decoding loop.
//!
//! Starting at the root, a 0 bit steps to the left child and a 1 bit to the
//! right child; reaching a leaf emits its symbol and restarts at the root.
//! Decoding stops after `symbol_count` symbols and then requires that no
//! meaningful bit is left, so padding bits are never decoded.

use std::io::{Read, Write};

use crate::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::tree::{HuffNode, HuffmanTree};

const WRITE_CHUNK: usize = 8192;

/// Decode `symbol_count` symbols from `reader` into `dst`.
///
/// A lone-leaf tree repeats its symbol `symbol_count` times without reading
/// any bits, so the output is not bounded by the bits available.
///
/// # Errors
/// [`HuffError::CorruptData`] if the bits run out inside a code or bits are
/// left over after the last symbol.
pub fn decode_symbols<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    dst: &mut W,
    tree: &HuffmanTree,
    symbol_count: u64,
) -> Result<()> {
    let mut out = Vec::with_capacity(WRITE_CHUNK);
    let root = tree.root();

    for _ in 0..symbol_count {
        let mut node = root;
        let symbol = loop {
            match node {
                HuffNode::Leaf { symbol } => break *symbol,
                HuffNode::Internal { left, right } => {
                    node = match reader.read_bit()? {
                        Some(false) => &**left,
                        Some(true) => &**right,
                        None => {
                            return Err(HuffError::CorruptData(format!(
                                "bitstream ended inside a code after {} bits",
                                reader.position()
                            )))
                        }
                    };
                }
            }
        };

        out.push(symbol);
        if out.len() == WRITE_CHUNK {
            dst.write_all(&out)?;
            out.clear();
        }
    }
    dst.write_all(&out)?;

    if reader.has_bits() {
        return Err(HuffError::CorruptData(format!(
            "{} bits left after the last symbol",
            reader.remaining()
        )));
    }

    Ok(())
}
