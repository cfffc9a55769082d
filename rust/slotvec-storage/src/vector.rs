//! The file-backed value array and its lifecycle.
//!
//! ```text
//! new ──► (closed) ──restore──► (open) ──close──► (closed)
//! allocate ───────────────────► (open) ──restore──► (open, new mapping)
//! ```
//!
//! An open vector owns a `MappedWords` mapping of the backing file, which holds
//! the file handle; the [`WordArray`] over the mapping is the only path to the
//! mapped words, so the view goes away together with the mapping on `close`,
//! `restore` or drop.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use slotvec_bits::{
    BYTES_PER_WORD, ValueArray, WordArray, check_bits, reserved_mask, storage_words,
};
use slotvec_common::{Result, error::Error};
use slotvec_mmap::MappedWords;

use crate::{
    config::MmapConfig,
    header::BackingFileMeta,
    naming::{NamingPolicy, backing_file_path},
};

/// A value array whose words live in a memory-mapped file.
///
/// Not synchronized: a vector and its backing file assume a single writer.
#[derive(Debug)]
pub struct MmapVector {
    dir: PathBuf,
    bit_packed: bool,
    meta: BackingFileMeta,
    state: State,
}

#[derive(Debug)]
enum State {
    Open {
        array: WordArray<MappedWords>,
        /// `None` for an empty array, which has no backing file.
        path: Option<PathBuf>,
    },
    Closed,
}

impl MmapVector {
    /// Creates a closed vector over `config.dir`, ready for [`restore`](ValueArray::restore).
    pub fn new(config: &MmapConfig) -> MmapVector {
        MmapVector {
            dir: config.dir.clone(),
            bit_packed: config.bit_packed,
            meta: BackingFileMeta::default(),
            state: State::Closed,
        }
    }

    /// Allocates a zeroed array of `len` values of `bits` bits in a new backing
    /// file named by `naming`.
    ///
    /// The file is sized to `words_required(bits, len)` words (or `len` words when
    /// not bit-packed) and mapped read-write. A zero-length array gets no file and
    /// no mapping.
    ///
    /// # Errors
    ///
    /// - `UnsupportedWidth` if `bits` is not in `1..=64`; nothing is created.
    /// - `Io` if creating, sizing or mapping the file fails. A file that was
    ///   created but could not be sized or mapped is removed again.
    pub fn allocate(
        config: &MmapConfig,
        naming: &mut NamingPolicy,
        bits: u32,
        len: u64,
    ) -> Result<MmapVector> {
        check_bits(bits)?;
        let dir = config.dir();
        let packed = config.bit_packed;
        let byte_len = byte_len(bits, len, packed)?;

        if len == 0 {
            let file_sequence = naming
                .next_sequence(dir)
                .map_err(|e| Error::io(format!("probing {}", dir.display()), e))?;
            log::debug!("allocated empty array: bits={bits} sequence={file_sequence}");
            let array = WordArray::new(bits, 0, packed, MappedWords::empty())?;
            return Ok(MmapVector {
                dir: dir.to_path_buf(),
                bit_packed: packed,
                meta: BackingFileMeta {
                    bits,
                    file_sequence,
                    len,
                },
                state: State::Open { array, path: None },
            });
        }

        let claimed = naming
            .claim(dir)
            .map_err(|e| Error::io(format!("creating backing file in {}", dir.display()), e))?;
        let path = claimed.path;
        let words = match size_and_map(claimed.file, &path, byte_len) {
            Ok(words) => words,
            Err(e) => {
                let removed = std::fs::remove_file(&path);
                log::debug!("removed {} after failed allocation: {removed:?}", path.display());
                return Err(e);
            }
        };
        let array = WordArray::new(bits, len, packed, words)?;

        log::debug!(
            "allocated {}: bits={bits} len={len} packed={packed} bytes={byte_len}",
            path.display()
        );
        Ok(MmapVector {
            dir: dir.to_path_buf(),
            bit_packed: packed,
            meta: BackingFileMeta {
                bits,
                file_sequence: claimed.sequence,
                len,
            },
            state: State::Open {
                array,
                path: Some(path),
            },
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_bit_packed(&self) -> bool {
        self.bit_packed
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// The header that [`persist`](ValueArray::persist) writes for this vector.
    pub fn meta(&self) -> BackingFileMeta {
        self.meta
    }

    /// Sequence number of the backing file.
    pub fn sequence(&self) -> u32 {
        self.meta.file_sequence
    }

    /// Path of the backing file, if the vector is open and has one.
    pub fn path(&self) -> Option<&Path> {
        match &self.state {
            State::Open { path: Some(path), .. } => Some(path.as_path()),
            _ => None,
        }
    }

    pub fn reserved_mask(&self) -> u64 {
        reserved_mask(self.meta.bits)
    }

    /// The mapped words, including padding past the last value.
    pub fn words(&self) -> Result<&[u64]> {
        Ok(self.array()?.words())
    }

    /// Synchronously writes the mapped words back to the backing file.
    pub fn flush(&self) -> Result<()> {
        let State::Open { array, path } = &self.state else {
            return Err(Error::closed());
        };
        if let Some(path) = path {
            flush_words(array, path)?;
        }
        Ok(())
    }

    /// Unmaps and closes the backing file. Closing a closed vector is a no-op.
    ///
    /// Every access after `close` fails with a `Closed` error until the vector is
    /// restored. Modified pages still reach the file once unmapped; call
    /// [`flush`](MmapVector::flush) first to write them synchronously.
    pub fn close(&mut self) -> Result<()> {
        let State::Open { array, path } = std::mem::replace(&mut self.state, State::Closed) else {
            return Ok(());
        };
        let words = array.into_inner();
        match path {
            Some(path) => {
                words
                    .unmap()
                    .map_err(|e| Error::io(format!("unmapping {}", path.display()), e))?;
                log::debug!("closed {}", path.display());
            }
            None => words.unmap()?,
        }
        Ok(())
    }

    fn array(&self) -> Result<&WordArray<MappedWords>> {
        match &self.state {
            State::Open { array, .. } => Ok(array),
            State::Closed => Err(Error::closed()),
        }
    }

    fn array_mut(&mut self) -> Result<&mut WordArray<MappedWords>> {
        match &mut self.state {
            State::Open { array, .. } => Ok(array),
            State::Closed => Err(Error::closed()),
        }
    }

    fn reopen(&self, meta: &BackingFileMeta) -> Result<State> {
        check_bits(meta.bits)?;
        let packed = self.bit_packed;
        if meta.len == 0 {
            let array = WordArray::new(meta.bits, 0, packed, MappedWords::empty())?;
            return Ok(State::Open { array, path: None });
        }

        let path = backing_file_path(&self.dir, meta.file_sequence);
        let file = match OpenOptions::new().read(true).write(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::backing_file(path, "not found"));
            }
            Err(e) => return Err(Error::io(format!("opening {}", path.display()), e)),
        };
        let file_len = file
            .metadata()
            .map_err(|e| Error::io(format!("reading metadata of {}", path.display()), e))?
            .len();
        let byte_len = byte_len(meta.bits, meta.len, packed)?;
        if file_len != byte_len as u64 {
            return Err(Error::backing_file(
                path,
                format!(
                    "length {file_len} does not match the {byte_len} bytes of {} {}-bit values ({})",
                    meta.len,
                    meta.bits,
                    if packed { "packed" } else { "unpacked" }
                ),
            ));
        }

        let words = MappedWords::map(&file, byte_len)
            .map_err(|e| Error::io(format!("mapping {}", path.display()), e))?;
        let array = WordArray::new(meta.bits, meta.len, packed, words)?;
        Ok(State::Open {
            array,
            path: Some(path),
        })
    }
}

impl ValueArray for MmapVector {
    fn bits(&self) -> u32 {
        self.meta.bits
    }

    /// Zero while closed.
    fn len(&self) -> u64 {
        match &self.state {
            State::Open { array, .. } => array.len(),
            State::Closed => 0,
        }
    }

    fn get(&self, index: u64) -> Result<u64> {
        self.array()?.get(index)
    }

    fn set(&mut self, index: u64, value: u64) -> Result<()> {
        self.array_mut()?.set(index, value)
    }

    /// Flushes the mapping to the backing file, then writes the
    /// [`BackingFileMeta`] header. The payload itself is not written to `writer`.
    fn persist(&self, writer: &mut dyn Write) -> Result<u64> {
        self.flush()?;
        let written = self
            .meta
            .write_to(writer)
            .map_err(|e| Error::io("writing backing file header", e))?;
        log::debug!(
            "persisted header: bits={} sequence={} len={}",
            self.meta.bits,
            self.meta.file_sequence,
            self.meta.len
        );
        Ok(written)
    }

    /// Releases the current mapping, reads a [`BackingFileMeta`] header and remaps
    /// the backing file it names from this vector's directory.
    ///
    /// # Errors
    ///
    /// - `Io` if the header cannot be read.
    /// - `UnsupportedWidth` if the header carries an invalid width.
    /// - `BackingFile` if the named file is missing or its length does not match
    ///   the header under this vector's layout.
    ///
    /// On error the vector is left closed.
    fn restore(&mut self, reader: &mut dyn Read) -> Result<u64> {
        self.close()?;
        let meta = BackingFileMeta::read_from(reader)
            .map_err(|e| Error::io("reading backing file header", e))?;
        self.state = self.reopen(&meta)?;
        self.meta = meta;
        log::debug!(
            "restored {}: bits={} len={}",
            backing_file_path(&self.dir, meta.file_sequence).display(),
            meta.bits,
            meta.len
        );
        Ok(BackingFileMeta::ENCODED_SIZE)
    }

    fn values(&self) -> Result<Vec<u64>> {
        let array = self.array()?;
        (0..array.len()).map(|i| array.get(i)).collect()
    }
}

fn byte_len(bits: u32, len: u64, packed: bool) -> Result<usize> {
    storage_words(bits, len, packed)
        .checked_mul(BYTES_PER_WORD as u64)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or_else(|| {
            Error::invalid_arg("len", format!("{len} values of {bits} bits are too large to map"))
        })
}

/// Sizes a freshly claimed file to `byte_len` bytes and maps it.
fn size_and_map(file: File, path: &Path, byte_len: usize) -> Result<MappedWords> {
    file.set_len(byte_len as u64)
        .map_err(|e| Error::io(format!("truncating {}", path.display()), e))?;
    MappedWords::map(&file, byte_len)
        .map_err(|e| Error::io(format!("mapping {}", path.display()), e))
}

fn flush_words(array: &WordArray<MappedWords>, path: &Path) -> Result<()> {
    array
        .storage()
        .flush()
        .map_err(|e| Error::io(format!("flushing {}", path.display()), e))
}
