//! Fixed-width integer arrays laid out over 64-bit word buffers.
//!
//! The crate provides the two in-memory layouts used by slot-based probabilistic
//! structures (quotient filters and the like):
//!
//! - [`PackedArray`]: `bits`-wide values stored back to back, straddling word
//!   boundaries where necessary.
//! - [`UnpackedArray`]: one value per word.
//!
//! Both are generic over their word storage (`B: AsRef<[u64]>`), so the same code
//! serves a heap `Vec<u64>` and a file-backed mapping owned elsewhere.
//! [`WordArray`] is the tagged union over the two layouts, and [`ValueArray`] /
//! [`ArrayAllocator`] are the seams consumed by the filter layer.

pub mod bits;
pub mod memory;
pub mod packed;
pub mod unpacked;
pub mod value_array;
pub mod word_array;

pub use bits::{
    BYTES_PER_WORD, WORD_BITS, check_bits, low_mask, reserved_mask, storage_words,
    words_required,
};
pub use memory::{MemoryAllocator, MemoryArray};
pub use packed::PackedArray;
pub use unpacked::UnpackedArray;
pub use value_array::{ArrayAllocator, ValueArray};
pub use word_array::WordArray;
