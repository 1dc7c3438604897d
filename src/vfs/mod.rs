//! File abstraction for the disk tree.
//!
//! The disk tree does not talk to the filesystem directly. It consumes any
//! byte-addressable random-access file through the [`DbFile`] capability:
//! seekable reads and writes plus `truncate` and `len`. An OS file
//! implements it, and so does [`MemFile`], a growable in-memory buffer.
//! The memory backend is what makes the disk tree deterministically
//! testable without touching a real disk.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// A byte-addressable random-access file.
///
/// Everything the disk tree needs from its backing store: the standard
/// [`Read`]/[`Write`]/[`Seek`] trio, truncation, and the current size.
/// Durability (fsync) is deliberately not part of the contract.
pub trait DbFile: Read + Write + Seek {
    /// Resize the file to `size` bytes, zero-filling when growing.
    fn truncate(&mut self, size: u64) -> io::Result<()>;

    /// Current size of the file in bytes.
    fn len(&mut self) -> io::Result<u64>;
}

impl DbFile for File {
    fn truncate(&mut self, size: u64) -> io::Result<()> {
        self.set_len(size)
    }

    fn len(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

// ---------------------------------------------------------------------------
// In-memory file
// ---------------------------------------------------------------------------

/// An in-memory [`DbFile`].
///
/// Behaves like a sparse regular file: seeking past the end is allowed, and
/// a write there zero-fills the gap. The cursor is independent of the
/// buffer length, as with an OS file.
#[derive(Debug, Default, Clone)]
pub struct MemFile {
    buf: Vec<u8>,
    pos: u64,
}

impl MemFile {
    /// Create an empty in-memory file with the cursor at offset 0.
    pub fn new() -> Self {
        MemFile::default()
    }
}

impl Read for MemFile {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.buf.len() as u64 {
            return Ok(0);
        }

        let start = self.pos as usize;
        let n = out.len().min(self.buf.len() - start);
        out[..n].copy_from_slice(&self.buf[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }
}

impl Write for MemFile {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let start = self.pos as usize;
        let end = start + data.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }

        self.buf[start..end].copy_from_slice(data);
        self.pos = end as u64;
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(off) => off as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(delta) => self.buf.len() as i64 + delta,
        };

        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of file",
            ));
        }

        self.pos = target as u64;
        Ok(self.pos)
    }
}

impl DbFile for MemFile {
    fn truncate(&mut self, size: u64) -> io::Result<()> {
        self.buf.resize(size as usize, 0);
        Ok(())
    }

    fn len(&mut self) -> io::Result<u64> {
        Ok(self.buf.len() as u64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
