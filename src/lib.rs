//! # huffpack
//!
//! Static Huffman compression of byte streams, plus a recursive archive
//! container that packs a whole directory tree into one file.
//!
//! ## Design
//!
//! - **Safe Rust** - `#![forbid(unsafe_code)]`
//! - **Explicit byte formats** - every header is packed by hand, little-endian
//! - **Deterministic output** - ties in the tree builder break by insertion
//!   order, so the same input always produces the same bytes
//! - **Owned trees** - `Leaf | Internal(left, right)` values, one owner per node
//!
//! ## API Overview
//!
//! ### High-Level Functions
//!
//! - [`compress()`] / [`decompress()`] - One in-memory Huffman sub-stream
//! - [`compress_stream`] / [`decompress_stream`] - The same over readers and
//!   writers
//! - [`compress_path`] / [`decompress_archive`] - Archive a file or directory
//!   tree and restore it
//! - [`compress_to_file`] / [`decompress_file`] - Path-to-path conveniences
//!
//! ### Building Blocks
//!
//! - [`FrequencyTable`] - Per-symbol occurrence counts
//! - [`HuffmanTree`] - Greedy prefix tree construction
//! - [`CodeTable`] - Symbol to code bits
//! - [`serialize_tree`] / [`reconstruct_tree`] - Preorder `(depth, symbol)` records
//! - [`BitWriter`] / [`BitReader`] - LSB-first bit packing with padding tracking
//! - [`StreamHeader`] / [`EntryHeader`] - Byte codecs of the two header kinds
//!
//! ## Sub-stream layout
//!
//! ```text
//! +-------------------+----------------------------+------------------+
//! | sub-header (18 B) | records_size x (depth, sym) | data_size bytes  |
//! +-------------------+----------------------------+------------------+
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use huffpack::{compress, decompress};
//!
//! let data = b"she sells sea shells by the sea shore";
//! let compressed = compress(data).unwrap();
//! let restored = decompress(&compressed).unwrap();
//!
//! assert_eq!(restored, data);
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod archive;
mod bitreader;
mod bitwriter;
mod codes;
mod compress;
mod decode;
mod decompress;
mod encode;
mod error;
mod frequency;
mod header;
mod records;
mod tree;

pub use archive::{
    compress_path, compress_to_file, decompress_archive, decompress_file, ArchiveSummary,
};
pub use bitreader::BitReader;
pub use bitwriter::{BitWriter, PackedBits};
pub use codes::{Code, CodeTable};
pub use compress::{compress, compress_stream};
pub use decode::decode_symbols;
pub use decompress::{decompress, decompress_stream};
pub use encode::{encode_symbols, EncodeSummary};
pub use error::{ErrorCategory, HuffError, Result};
pub use frequency::{FrequencyTable, ALPHABET_SIZE};
pub use header::{
    validate_name, EntryHeader, EntryKind, StreamHeader, ENTRY_HEADER_LEN, MAX_NAME_LEN,
    STREAM_HEADER_LEN,
};
pub use records::{reconstruct_tree, serialize_tree, TreeRecord, RECORD_LEN};
pub use tree::{HuffNode, HuffmanTree};
