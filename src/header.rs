//! Fixed-size headers of the sub-stream and container formats.
//!
//! All fields are packed by hand into little-endian integers; no struct
//! layout is relied on.
//!
//! ## Huffman sub-header (18 bytes)
//! ```text
//! offset 0   u16  bits 0-2 padding_bits, bits 3-15 records_size
//! offset 2   u64  data_size     packed code bytes after the records
//! offset 10  u64  symbol_count  bytes the payload decodes to
//! ```
//!
//! ## Entry header (10 bytes + name)
//! ```text
//! offset 0   u16  bit 0 kind (0 = file, 1 = directory), bits 1-15 name_len
//! offset 2   u64  size  file: sub-stream byte length, directory: child count
//! offset 10  name_len bytes of UTF-8 name, no terminator
//! ```

#![allow(clippy::cast_possible_truncation)]

use std::io::{Read, Write};

use crate::error::{HuffError, Result};
use crate::frequency::ALPHABET_SIZE;

/// Encoded size of [`StreamHeader`].
pub const STREAM_HEADER_LEN: usize = 18;

/// Encoded size of the fixed part of [`EntryHeader`].
pub const ENTRY_HEADER_LEN: usize = 10;

/// Longest entry name accepted, in bytes.
pub const MAX_NAME_LEN: usize = 255;

const PADDING_MASK: u16 = 0b111;
const RECORDS_SHIFT: u16 = 3;
const NAME_LEN_SHIFT: u16 = 1;

fn read_array<R: Read, const N: usize>(reader: &mut R, what: &'static str) -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    reader
        .read_exact(&mut bytes)
        .map_err(|e| HuffError::from_read(e, what))?;
    Ok(bytes)
}

fn u64_at(bytes: &[u8], offset: usize) -> u64 {
    let mut field = [0u8; 8];
    field.copy_from_slice(&bytes[offset..offset + 8]);
    u64::from_le_bytes(field)
}

/// Header of one Huffman-compressed payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamHeader {
    /// Unused high bits of the last data byte (0-7).
    pub padding_bits: u8,
    /// Number of tree records that follow (0-256).
    pub records_size: u16,
    /// Number of packed data bytes after the records.
    pub data_size: u64,
    /// Number of symbols the payload decodes to.
    pub symbol_count: u64,
}

impl StreamHeader {
    pub fn to_bytes(&self) -> [u8; STREAM_HEADER_LEN] {
        let packed = (u16::from(self.padding_bits) & PADDING_MASK)
            | (self.records_size << RECORDS_SHIFT);

        let mut bytes = [0u8; STREAM_HEADER_LEN];
        bytes[0..2].copy_from_slice(&packed.to_le_bytes());
        bytes[2..10].copy_from_slice(&self.data_size.to_le_bytes());
        bytes[10..18].copy_from_slice(&self.symbol_count.to_le_bytes());
        bytes
    }

    /// Decode and validate a sub-header.
    pub fn from_bytes(bytes: &[u8; STREAM_HEADER_LEN]) -> Result<Self> {
        let packed = u16::from_le_bytes([bytes[0], bytes[1]]);
        let header = Self {
            padding_bits: (packed & PADDING_MASK) as u8,
            records_size: packed >> RECORDS_SHIFT,
            data_size: u64_at(bytes, 2),
            symbol_count: u64_at(bytes, 10),
        };
        header.validate()?;
        Ok(header)
    }

    /// Check field ranges and cross-field consistency.
    pub fn validate(&self) -> Result<()> {
        if usize::from(self.records_size) > ALPHABET_SIZE {
            return Err(HuffError::CorruptHeader(format!(
                "records_size {} exceeds the {ALPHABET_SIZE}-symbol alphabet",
                self.records_size
            )));
        }
        if self.padding_bits > 7 {
            return Err(HuffError::CorruptHeader(format!(
                "padding_bits {} out of range",
                self.padding_bits
            )));
        }
        if self.data_size == 0 && self.padding_bits != 0 {
            return Err(HuffError::CorruptHeader(
                "padding declared without data".to_string(),
            ));
        }
        if self.records_size == 0 && (self.data_size != 0 || self.symbol_count != 0) {
            return Err(HuffError::CorruptHeader(
                "data declared without a tree".to_string(),
            ));
        }
        if self.records_size == 1 && self.data_size != 0 {
            return Err(HuffError::CorruptHeader(
                "single-symbol payload carries packed data".to_string(),
            ));
        }
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let bytes = read_array::<R, STREAM_HEADER_LEN>(reader, "sub-header")?;
        Self::from_bytes(&bytes)
    }
}

/// Kind tag of a container entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    RegularFile,
    Directory,
}

impl EntryKind {
    fn tag(self) -> u16 {
        match self {
            EntryKind::RegularFile => 0,
            EntryKind::Directory => 1,
        }
    }

    fn from_tag(tag: u16) -> Self {
        if tag & 1 == 0 {
            EntryKind::RegularFile
        } else {
            EntryKind::Directory
        }
    }
}

/// Check that `name` is a single, non-empty path component that fits the
/// header's length field.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(HuffError::InvalidName(name.to_string()))
    }
}

/// Header of one container entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryHeader {
    pub kind: EntryKind,
    pub name: String,
    /// File: byte length of the sub-stream. Directory: child count.
    pub size: u64,
}

impl EntryHeader {
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            kind: EntryKind::RegularFile,
            name: name.into(),
            size,
        }
    }

    pub fn directory(name: impl Into<String>, children: u64) -> Self {
        Self {
            kind: EntryKind::Directory,
            name: name.into(),
            size: children,
        }
    }

    /// Encoded length including the name.
    pub fn encoded_len(&self) -> usize {
        ENTRY_HEADER_LEN + self.name.len()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        validate_name(&self.name)?;
        // MAX_NAME_LEN keeps the length within 15 bits.
        let name_len = u16::try_from(self.name.len())
            .map_err(|_| HuffError::InvalidName(self.name.clone()))?;
        let packed = self.kind.tag() | (name_len << NAME_LEN_SHIFT);

        let mut fixed = [0u8; ENTRY_HEADER_LEN];
        fixed[0..2].copy_from_slice(&packed.to_le_bytes());
        fixed[2..10].copy_from_slice(&self.size.to_le_bytes());

        writer.write_all(&fixed)?;
        writer.write_all(self.name.as_bytes())?;
        Ok(())
    }

    /// Read and validate an entry header. The name length is checked before
    /// any name byte is read.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let fixed = read_array::<R, ENTRY_HEADER_LEN>(reader, "entry header")?;
        let packed = u16::from_le_bytes([fixed[0], fixed[1]]);
        let kind = EntryKind::from_tag(packed);
        let name_len = usize::from(packed >> NAME_LEN_SHIFT);
        let size = u64_at(&fixed, 2);

        if name_len == 0 || name_len > MAX_NAME_LEN {
            return Err(HuffError::CorruptHeader(format!(
                "entry name length {name_len} out of range 1-{MAX_NAME_LEN}"
            )));
        }

        let mut raw = vec![0u8; name_len];
        reader
            .read_exact(&mut raw)
            .map_err(|e| HuffError::from_read(e, "entry name"))?;
        let name = String::from_utf8(raw).map_err(|e| {
            HuffError::InvalidName(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;
        validate_name(&name)?;

        Ok(Self { kind, name, size })
    }
}
