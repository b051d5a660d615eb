//! Error types for Huffman compression, decompression and archiving.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Broad classification of a [`HuffError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A source could not be read or a destination could not be written.
    Io,
    /// The path is neither a regular file nor a directory.
    InvalidPathType,
    /// A sub-header or entry header holds out-of-range values.
    CorruptHeader,
    /// The tree record sequence does not reduce to a single root.
    CorruptTree,
    /// The packed bitstream does not decode cleanly.
    CorruptData,
}

/// Errors that can occur while compressing or decompressing.
#[derive(Debug, Error)]
pub enum HuffError {
    /// Opening or creating a path failed.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source produced different bytes on the encode pass than on the
    /// frequency pass.
    #[error("input changed between frequency and encoding passes")]
    InputChanged,

    /// The path is neither a regular file nor a directory.
    #[error("{} is not a regular file or directory", .0.display())]
    InvalidPathType(PathBuf),

    /// Sub-header or entry header values out of bounds.
    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    /// Entry name is empty, too long, or not a single path component.
    #[error("invalid entry name: {0:?}")]
    InvalidName(String),

    /// Tree records do not describe exactly one full binary tree.
    #[error("corrupt tree: {0}")]
    CorruptTree(String),

    /// Packed bits do not resolve to the declared symbols.
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// Input ended in the middle of a structure.
    #[error("unexpected end of input while reading {0}")]
    Truncated(&'static str),
}

impl HuffError {
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Self::Open {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Map `UnexpectedEof` to [`HuffError::Truncated`], anything else to `Io`.
    pub(crate) fn from_read(err: io::Error, what: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::Truncated(what)
        } else {
            Self::Io(err)
        }
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Open { .. } | Self::Io(_) | Self::InputChanged => ErrorCategory::Io,
            Self::InvalidPathType(_) => ErrorCategory::InvalidPathType,
            Self::CorruptHeader(_) | Self::InvalidName(_) => ErrorCategory::CorruptHeader,
            Self::CorruptTree(_) => ErrorCategory::CorruptTree,
            Self::CorruptData(_) | Self::Truncated(_) => ErrorCategory::CorruptData,
        }
    }

    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Io => 2,
            ErrorCategory::InvalidPathType => 5,
            ErrorCategory::CorruptHeader => 6,
            ErrorCategory::CorruptTree => 7,
            ErrorCategory::CorruptData => 8,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffError>;
