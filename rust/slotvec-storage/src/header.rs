//! The header written by [`MmapVector::persist`](crate::MmapVector::persist).
//!
//! Fixed 16-byte little-endian record:
//!
//! | offset | field | type |
//! |---|---|---|
//! | 0 | bits | u32 |
//! | 4 | file_sequence | u32 |
//! | 8 | len | u64 |
//!
//! The payload is not part of the header; it stays in the backing file
//! `mmap.<file_sequence>` next to the other arrays of the same directory.
//!
//! An 8-byte record of `bits` and `file_sequence` alone is rejected with an
//! `UnexpectedEof` error: without `len` the size of a packed array is ambiguous.

use std::io::{Read, Write};

use byteorder::{LE, ReadBytesExt, WriteBytesExt};

/// Identifies a backing file and how to reinterpret its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackingFileMeta {
    /// Width of each value in bits.
    pub bits: u32,
    /// Sequence number of the backing file, `mmap.<file_sequence>`.
    ///
    /// An empty array has no backing file. Under probe naming its sequence is
    /// the next free name at allocation time and is not reserved, so a later
    /// allocation may claim the same `mmap.<n>`. Restoring an empty array never
    /// opens the file.
    pub file_sequence: u32,
    /// Number of values. A packed file's length alone does not determine it,
    /// since the last word may carry padding.
    pub len: u64,
}

impl BackingFileMeta {
    pub const ENCODED_SIZE: u64 = 16;

    pub fn write_to<W>(&self, writer: &mut W) -> std::io::Result<u64>
    where
        W: Write + ?Sized,
    {
        writer.write_u32::<LE>(self.bits)?;
        writer.write_u32::<LE>(self.file_sequence)?;
        writer.write_u64::<LE>(self.len)?;
        Ok(Self::ENCODED_SIZE)
    }

    pub fn read_from<R>(reader: &mut R) -> std::io::Result<BackingFileMeta>
    where
        R: Read + ?Sized,
    {
        let bits = reader.read_u32::<LE>()?;
        let file_sequence = reader.read_u32::<LE>()?;
        let len = reader.read_u64::<LE>()?;
        Ok(BackingFileMeta {
            bits,
            file_sequence,
            len,
        })
    }
}
