//! # slotvec: persistent fixed-width bit-packed arrays
//!
//! Storage primitive for slot-based probabilistic structures such as quotient
//! filters: millions of sub-word integers addressable by index, optionally kept
//! in memory-mapped files so they survive restarts and may exceed RAM.
//!
//! * [`bits`]: packed and unpacked layouts over 64-bit words, the
//!   [`ValueArray`] / [`ArrayAllocator`] seams and the heap allocator
//! * [`storage`]: file-backed [`MmapVector`]s, their header format and the
//!   `mmap.<n>` naming policy
//! * [`mmap`]: the owning word view over a file mapping
//! * [`common`]: error and result types
//!
//! ```
//! use std::io::Cursor;
//! use slotvec::{ArrayAllocator, MmapAllocator, MmapConfig, MmapVector, ValueArray};
//!
//! # fn main() -> slotvec::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let config = MmapConfig::new(dir.path());
//! let mut slots = MmapAllocator::new(config.clone()).allocate(5, 20)?;
//! slots.set(12, 27)?;
//!
//! let mut header = Vec::new();
//! slots.persist(&mut header)?;
//! slots.close()?;
//!
//! let mut reopened = MmapVector::new(&config);
//! reopened.restore(&mut Cursor::new(header))?;
//! assert_eq!(reopened.get(12)?, 27);
//! # Ok(())
//! # }
//! ```

pub use slotvec_bits as bits;
pub use slotvec_common as common;
pub use slotvec_mmap as mmap;
pub use slotvec_storage as storage;

pub use slotvec_bits::{
    ArrayAllocator, MemoryAllocator, MemoryArray, PackedArray, UnpackedArray, ValueArray,
    WordArray,
};
pub use slotvec_common::{
    Result,
    error::{Error, ErrorKind},
};
pub use slotvec_storage::{MmapAllocator, MmapConfig, MmapVector, NamingPolicy, NamingStrategy};
