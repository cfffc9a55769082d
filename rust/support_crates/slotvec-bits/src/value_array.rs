use std::io::{Read, Write};

use slotvec_common::Result;

/// The capability set the filter layer programs against: indexed access to
/// fixed-width values plus persistence.
///
/// Implemented by heap arrays ([`MemoryArray`](crate::memory::MemoryArray)) and by
/// file-backed arrays in `slotvec-storage`.
pub trait ValueArray {
    /// Width of every value, in bits.
    fn bits(&self) -> u32;

    /// Number of values.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: u64) -> Result<u64>;

    fn set(&mut self, index: u64, value: u64) -> Result<()>;

    /// Writes enough state to `writer` for [`restore`](ValueArray::restore) to
    /// reconstruct the array. Returns the number of bytes written.
    fn persist(&self, writer: &mut dyn Write) -> Result<u64>;

    /// Replaces the array with the state read from `reader`. Returns the number
    /// of bytes consumed.
    fn restore(&mut self, reader: &mut dyn Read) -> Result<u64>;

    /// Collects every value in index order.
    fn values(&self) -> Result<Vec<u64>> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// A factory producing fresh, zeroed value arrays.
///
/// The storage policy (heap or file-backed, packed or unpacked) is fixed when the
/// allocator is set up; callers only pick the width and length.
pub trait ArrayAllocator {
    type Array: ValueArray;

    fn allocate(&mut self, bits: u32, len: u64) -> Result<Self::Array>;
}
