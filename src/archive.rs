//! Recursive archive container.
//!
//! An archive holds exactly one root entry. A regular file entry is an
//! [`EntryHeader`] followed by one Huffman sub-stream; a directory entry is an
//! [`EntryHeader`] followed by `size` child entries, each laid out the same
//! way. Size fields are written as placeholders and backpatched once the
//! payload has been produced, so the archive writer must be seekable.
//!
//! ```text
//! dir "docs", 2 children
//! ├── file "a.txt", <sub-stream length>
//! │   └── sub-header | tree records | packed bits
//! └── dir "img", 0 children
//! ```

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::compress::compress_stream;
use crate::decompress::decompress_stream;
use crate::error::{HuffError, Result};
use crate::header::{EntryHeader, EntryKind};

/// Totals for one archive operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Name of the root entry.
    pub root: String,
    /// Regular files written or extracted.
    pub files: u64,
    /// Directories written or extracted, including the root if it is one.
    pub directories: u64,
    /// Sum of the uncompressed file sizes.
    pub original_bytes: u64,
    /// Archive bytes produced or consumed.
    pub packed_bytes: u64,
}

/// Archive `path` (a regular file or a directory tree) into `dst`.
///
/// Directory children are stored in byte-wise name order. Symbolic links are
/// followed.
///
/// # Errors
/// - [`HuffError::Open`] if a path cannot be read
/// - [`HuffError::InvalidPathType`] for anything that is not a regular file
///   or directory
/// - [`HuffError::InvalidName`] for names that are not valid UTF-8 or do not
///   fit an entry header
pub fn compress_path<W: Write + Seek>(path: &Path, dst: &mut W) -> Result<ArchiveSummary> {
    let mut summary = ArchiveSummary {
        root: root_name(path)?,
        ..ArchiveSummary::default()
    };

    let start = dst.stream_position()?;
    let name = summary.root.clone();
    encode_entry(path, name, dst, &mut summary)?;
    summary.packed_bytes = dst.stream_position()? - start;

    info!(
        root = %summary.root,
        files = summary.files,
        directories = summary.directories,
        original_bytes = summary.original_bytes,
        packed_bytes = summary.packed_bytes,
        "archive written"
    );

    Ok(summary)
}

/// Extract the archive in `src` under the directory `prefix`.
///
/// `prefix` must already exist. The whole of `src` must be one archive:
/// bytes after the root entry are rejected.
pub fn decompress_archive<R: Read>(src: &mut R, prefix: &Path) -> Result<ArchiveSummary> {
    let mut summary = ArchiveSummary::default();
    summary.root = decode_entry(src, prefix, &mut summary)?;

    if has_trailing_bytes(src)? {
        return Err(HuffError::CorruptData(format!(
            "trailing bytes after root entry {:?}",
            summary.root
        )));
    }

    info!(
        root = %summary.root,
        files = summary.files,
        directories = summary.directories,
        original_bytes = summary.original_bytes,
        packed_bytes = summary.packed_bytes,
        "archive extracted"
    );

    Ok(summary)
}

/// Archive `src` into a newly created file at `dst`.
pub fn compress_to_file(src: &Path, dst: &Path) -> Result<ArchiveSummary> {
    let file = File::create(dst).map_err(|e| HuffError::open(dst, e))?;
    let mut out = BufWriter::new(file);
    let summary = compress_path(src, &mut out)?;
    out.flush()?;
    Ok(summary)
}

/// Extract the archive file `src` under `prefix`, creating `prefix` first if
/// needed.
pub fn decompress_file(src: &Path, prefix: &Path) -> Result<ArchiveSummary> {
    let file = File::open(src).map_err(|e| HuffError::open(src, e))?;
    fs::create_dir_all(prefix).map_err(|e| HuffError::open(prefix, e))?;
    decompress_archive(&mut BufReader::new(file), prefix)
}

/// Entry name for the root path. Falls back to the canonical path for
/// inputs such as `.` that have no final component.
fn root_name(path: &Path) -> Result<String> {
    let name = match path.file_name() {
        Some(name) => name.to_os_string(),
        None => fs::canonicalize(path)
            .map_err(|e| HuffError::open(path, e))?
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| HuffError::InvalidName(path.display().to_string()))?,
    };
    utf8_name(name)
}

fn utf8_name(name: OsString) -> Result<String> {
    name.into_string()
        .map_err(|raw| HuffError::InvalidName(raw.to_string_lossy().into_owned()))
}

/// Rewrite `header` at `pos`, then return to the current end of output.
fn backpatch<W: Write + Seek>(dst: &mut W, pos: u64, header: &EntryHeader) -> Result<()> {
    let end = dst.stream_position()?;
    dst.seek(SeekFrom::Start(pos))?;
    header.write_to(dst)?;
    dst.seek(SeekFrom::Start(end))?;
    Ok(())
}

fn encode_entry<W: Write + Seek>(
    path: &Path,
    name: String,
    dst: &mut W,
    summary: &mut ArchiveSummary,
) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| HuffError::open(path, e))?;

    if metadata.is_file() {
        let file = File::open(path).map_err(|e| HuffError::open(path, e))?;
        let mut src = BufReader::new(file);

        let mut header = EntryHeader::file(name, 0);
        let header_pos = dst.stream_position()?;
        header.write_to(dst)?;

        let payload_start = dst.stream_position()?;
        let stream = compress_stream(&mut src, dst)?;
        header.size = dst.stream_position()? - payload_start;
        backpatch(dst, header_pos, &header)?;

        debug!(
            name = %header.name,
            original = stream.symbol_count,
            packed = header.size,
            "file entry"
        );
        summary.files += 1;
        summary.original_bytes += stream.symbol_count;
    } else if metadata.is_dir() {
        let mut children = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| HuffError::open(path, e))? {
            let entry = entry.map_err(|e| HuffError::open(path, e))?;
            children.push(entry.file_name());
        }
        children.sort();

        let mut header = EntryHeader::directory(name, 0);
        let header_pos = dst.stream_position()?;
        header.write_to(dst)?;

        for child in children {
            let child_path = path.join(&child);
            encode_entry(&child_path, utf8_name(child)?, dst, summary)?;
            header.size += 1;
        }
        backpatch(dst, header_pos, &header)?;

        debug!(name = %header.name, children = header.size, "directory entry");
        summary.directories += 1;
    } else {
        return Err(HuffError::InvalidPathType(path.to_path_buf()));
    }

    Ok(())
}

/// Decode one entry (recursively) under `parent` and return its name.
fn decode_entry<R: Read>(
    src: &mut R,
    parent: &Path,
    summary: &mut ArchiveSummary,
) -> Result<String> {
    let header = EntryHeader::read_from(src)?;
    let path = parent.join(&header.name);
    summary.packed_bytes += header.encoded_len() as u64;

    match header.kind {
        EntryKind::RegularFile => {
            let file = File::create(&path).map_err(|e| HuffError::open(&path, e))?;
            let mut out = BufWriter::new(file);

            let mut payload = src.by_ref().take(header.size);
            let stream = decompress_stream(&mut payload, &mut out)?;
            if payload.limit() != 0 {
                return Err(HuffError::CorruptData(format!(
                    "file entry {:?} declares {} bytes but its payload ends {} bytes early",
                    header.name,
                    header.size,
                    payload.limit()
                )));
            }
            out.flush()?;

            debug!(
                name = %header.name,
                original = stream.symbol_count,
                packed = header.size,
                "extracted file"
            );
            summary.files += 1;
            summary.original_bytes += stream.symbol_count;
            summary.packed_bytes += header.size;
        }
        EntryKind::Directory => {
            fs::create_dir_all(&path).map_err(|e| HuffError::open(&path, e))?;
            for _ in 0..header.size {
                decode_entry(src, &path, summary)?;
            }

            debug!(name = %header.name, children = header.size, "extracted directory");
            summary.directories += 1;
        }
    }

    Ok(header.name)
}

fn has_trailing_bytes<R: Read>(src: &mut R) -> Result<bool> {
    let mut probe = [0u8; 1];
    loop {
        match src.read(&mut probe) {
            Ok(n) => return Ok(n > 0),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
