//! File-backed memory mapping exposed as a fixed-length run of 64-bit words.
//!
//! `MappedWords` exclusively owns one shared, read-write mapping of a file. The
//! word view it hands out through [`AsRef<[u64]>`] / [`AsMut<[u64]>`] is tied to
//! the lifetime of the value, so an array built over a `MappedWords` (which takes
//! it by value) can never observe a released mapping.
//!
//! # Safety
//!
//! The mapping is shared with the file: other processes (or other mappings in
//! this process) writing to the same file are visible through the view. The
//! owning storage layer assumes a single writer per file.

use std::fs::File;

use crate::mmap;

/// An owned, shared read-write mapping of a file region starting at offset 0.
///
/// A zero-length `MappedWords` holds no mapping at all; it is what an empty
/// array is built over.
pub struct MappedWords {
    /// Start of the mapped region, null for an empty value.
    ptr: *mut u8,
    /// Length of the mapped region in bytes, always a multiple of 8.
    len: usize,
    /// Handle to the mapped file, used to make flushed pages durable.
    file: Option<File>,
}

impl MappedWords {
    const WORD_SIZE: usize = std::mem::size_of::<u64>();

    /// Returns a value holding no mapping.
    pub fn empty() -> MappedWords {
        MappedWords {
            ptr: std::ptr::null_mut(),
            len: 0,
            file: None,
        }
    }

    /// Maps the first `len` bytes of `file`.
    ///
    /// # Arguments
    ///
    /// * `file` - An open file with read and write access. The mapping keeps a
    ///   duplicate of the handle for [`flush`](MappedWords::flush).
    /// * `len` - The number of bytes to map. Must be a multiple of 8. A zero
    ///   length yields [`MappedWords::empty`] without touching the file.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidInput` error if `len` is not a whole number of words or
    /// exceeds the file's current length (pages past the end of a file cannot be
    /// accessed), and the operating system error if the mapping fails.
    pub fn map(file: &File, len: usize) -> std::io::Result<MappedWords> {
        if !len.is_multiple_of(Self::WORD_SIZE) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("mapping length {len} is not a multiple of the word size"),
            ));
        }
        if len == 0 {
            return Ok(MappedWords::empty());
        }
        let file_len = file.metadata()?.len();
        if file_len < len as u64 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("mapping length {len} exceeds file length {file_len}"),
            ));
        }

        let handle = file.try_clone()?;
        // Mappings start on a page boundary, so the word view is aligned.
        let ptr = mmap::map_file(file, len)?;
        assert!((ptr as usize).is_multiple_of(Self::WORD_SIZE));
        Ok(MappedWords {
            ptr: ptr as _,
            len,
            file: Some(handle),
        })
    }

    /// Returns the length of the mapping in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of 64-bit words in the mapping.
    #[inline]
    pub fn word_count(&self) -> usize {
        self.len / Self::WORD_SIZE
    }

    /// Synchronously writes modified pages back to the file and waits for them
    /// to reach the storage device. A no-op for an empty value.
    pub fn flush(&self) -> std::io::Result<()> {
        match &self.file {
            Some(file) if !self.ptr.is_null() => mmap::flush(file, self.ptr as _, self.len),
            _ => Ok(()),
        }
    }

    /// Releases the mapping, reporting the operating system error if that fails.
    ///
    /// Dropping a `MappedWords` releases the mapping as well but discards the
    /// error.
    pub fn unmap(mut self) -> std::io::Result<()> {
        let ptr = std::mem::replace(&mut self.ptr, std::ptr::null_mut());
        if ptr.is_null() {
            return Ok(());
        }
        unsafe { mmap::unmap(ptr as _, self.len) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        if self.ptr.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        if self.ptr.is_null() {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }
    }

    /// Returns the mapped bytes reinterpreted as a slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the mapping length is not a multiple of `size_of::<T>()`.
    #[inline]
    pub fn as_slice<T>(&self) -> &[T]
    where
        T: bytemuck::AnyBitPattern,
    {
        if self.ptr.is_null() {
            return &[];
        }
        bytemuck::cast_slice(self.as_bytes())
    }

    /// Returns the mapped bytes reinterpreted as a mutable slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the mapping length is not a multiple of `size_of::<T>()`.
    #[inline]
    pub fn as_mut_slice<T>(&mut self) -> &mut [T]
    where
        T: bytemuck::AnyBitPattern + bytemuck::NoUninit,
    {
        if self.ptr.is_null() {
            return &mut [];
        }
        bytemuck::cast_slice_mut(self.as_bytes_mut())
    }
}

impl AsRef<[u64]> for MappedWords {
    #[inline]
    fn as_ref(&self) -> &[u64] {
        self.as_slice()
    }
}

impl AsMut<[u64]> for MappedWords {
    #[inline]
    fn as_mut(&mut self) -> &mut [u64] {
        self.as_mut_slice()
    }
}

impl Drop for MappedWords {
    fn drop(&mut self) {
        if !self.ptr.is_null() {
            let _ = unsafe { mmap::unmap(self.ptr as _, self.len) };
        }
    }
}

// SAFETY: MappedWords owns its mapping and releases it on drop; moving it to
// another thread moves that ownership.
unsafe impl Send for MappedWords {}

// SAFETY: shared references only hand out immutable views of the mapping.
unsafe impl Sync for MappedWords {}

impl std::fmt::Debug for MappedWords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MappedWords")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("file", &self.file)
            .finish()
    }
}
