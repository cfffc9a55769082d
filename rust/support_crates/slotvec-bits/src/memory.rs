//! Heap-backed value arrays and their inline persistence format.
//!
//! Layout written by [`ValueArray::persist`] for a [`MemoryArray`], all fields
//! little-endian:
//!
//! | field | width |
//! |---|---|
//! | bits | u32 |
//! | flags (bit 0: packed) | u32 |
//! | len | u64 |
//! | words | `storage_words(bits, len, packed)` x u64 |

use std::io::{Read, Write};

use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use slotvec_common::{Result, error::Error, verify_data};

use crate::{
    bits::{BYTES_PER_WORD, check_bits, storage_words},
    value_array::{ArrayAllocator, ValueArray},
    word_array::WordArray,
};

/// A value array owning its words on the heap.
pub type MemoryArray = WordArray<Vec<u64>>;

const FLAG_PACKED: u32 = 1;
const HEADER_SIZE: u64 = 16;

/// Allocates zeroed [`MemoryArray`]s in a fixed layout.
#[derive(Debug, Clone, Copy)]
pub struct MemoryAllocator {
    bit_packed: bool,
}

impl MemoryAllocator {
    pub fn new(bit_packed: bool) -> MemoryAllocator {
        MemoryAllocator { bit_packed }
    }

    pub fn bit_packed(&self) -> bool {
        self.bit_packed
    }
}

impl Default for MemoryAllocator {
    fn default() -> Self {
        MemoryAllocator::new(true)
    }
}

impl ArrayAllocator for MemoryAllocator {
    type Array = MemoryArray;

    fn allocate(&mut self, bits: u32, len: u64) -> Result<MemoryArray> {
        log::debug!(
            "allocating in-memory array: bits={bits} len={len} packed={}",
            self.bit_packed
        );
        WordArray::zeroed(bits, len, self.bit_packed)
    }
}

impl ValueArray for MemoryArray {
    fn bits(&self) -> u32 {
        WordArray::bits(self)
    }

    fn len(&self) -> u64 {
        WordArray::len(self)
    }

    fn get(&self, index: u64) -> Result<u64> {
        WordArray::get(self, index)
    }

    fn set(&mut self, index: u64, value: u64) -> Result<()> {
        WordArray::set(self, index, value)
    }

    fn persist(&self, writer: &mut dyn Write) -> Result<u64> {
        let packed = self.is_packed();
        let len = WordArray::len(self);
        let bits = WordArray::bits(self);
        let word_count = storage_words(bits, len, packed) as usize;
        let flags = if packed { FLAG_PACKED } else { 0 };

        writer.write_u32::<LE>(bits)?;
        writer.write_u32::<LE>(flags)?;
        writer.write_u64::<LE>(len)?;
        for &word in &self.words()[..word_count] {
            writer.write_u64::<LE>(word)?;
        }
        Ok(HEADER_SIZE + (word_count * BYTES_PER_WORD) as u64)
    }

    fn restore(&mut self, reader: &mut dyn Read) -> Result<u64> {
        let bits = reader.read_u32::<LE>()?;
        check_bits(bits)?;
        let flags = reader.read_u32::<LE>()?;
        verify_data!(flags, flags & !FLAG_PACKED == 0);
        let packed = flags & FLAG_PACKED != 0;
        let len = reader.read_u64::<LE>()?;

        let word_count = storage_words(bits, len, packed);
        let total_size = word_count
            .checked_mul(BYTES_PER_WORD as u64)
            .and_then(|size| size.checked_add(HEADER_SIZE))
            .ok_or_else(|| Error::invalid_format("len"))?;
        let word_count = usize::try_from(word_count).map_err(|_| Error::invalid_format("len"))?;
        let words = read_words(reader, word_count)?;

        *self = WordArray::new(bits, len, packed, words)?;
        log::debug!("restored in-memory array: bits={bits} len={len} packed={packed}");
        Ok(total_size)
    }
}

/// Reads `count` words, growing the buffer only as far as the input goes.
fn read_words(reader: &mut dyn Read, count: usize) -> Result<Vec<u64>> {
    const CHUNK_WORDS: usize = 8192;

    let mut words = Vec::new();
    while words.len() < count {
        let start = words.len();
        let chunk = CHUNK_WORDS.min(count - start);
        words
            .try_reserve_exact(chunk)
            .map_err(|_| Error::invalid_format("len"))?;
        words.resize(start + chunk, 0);
        reader.read_u64_into::<LE>(&mut words[start..])?;
    }
    Ok(words)
}
