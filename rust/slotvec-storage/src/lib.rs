//! File-backed value arrays.
//!
//! An [`MmapVector`] keeps its payload in a file named `mmap.<sequence>` inside a
//! configured directory and maps it read-write, so the array survives restarts
//! and may exceed available RAM. Persisting a vector writes only a small
//! [`BackingFileMeta`] header to the caller's stream; restoring reads it back,
//! reopens the named file and remaps it.
//!
//! [`MmapAllocator`] is the factory handed to the filter layer: it fixes the
//! directory, layout and [`NamingPolicy`] once and then produces fresh vectors
//! for `(bits, len)` requests.

pub mod allocator;
pub mod config;
pub mod header;
pub mod naming;
pub mod vector;

pub use allocator::MmapAllocator;
pub use config::MmapConfig;
pub use header::BackingFileMeta;
pub use naming::{NamingPolicy, NamingStrategy, backing_file_path};
pub use vector::MmapVector;
