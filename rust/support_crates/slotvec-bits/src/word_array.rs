use slotvec_common::Result;

use crate::{packed::PackedArray, unpacked::UnpackedArray};

/// A value array in either layout, dispatched explicitly.
#[derive(Debug, Clone)]
pub enum WordArray<B> {
    Packed(PackedArray<B>),
    Unpacked(UnpackedArray<B>),
}

impl WordArray<Vec<u64>> {
    /// Creates a heap-backed array of `len` zero values in the requested layout.
    pub fn zeroed(bits: u32, len: u64, packed: bool) -> Result<WordArray<Vec<u64>>> {
        if packed {
            PackedArray::zeroed(bits, len).map(WordArray::Packed)
        } else {
            UnpackedArray::zeroed(bits, len).map(WordArray::Unpacked)
        }
    }
}

impl<B: AsRef<[u64]>> WordArray<B> {
    /// Wraps `words` in the requested layout, validating the width and the
    /// buffer length (see [`storage_words`](crate::bits::storage_words)).
    pub fn new(bits: u32, len: u64, packed: bool, words: B) -> Result<WordArray<B>> {
        if packed {
            PackedArray::new(bits, len, words).map(WordArray::Packed)
        } else {
            UnpackedArray::new(bits, len, words).map(WordArray::Unpacked)
        }
    }

    #[inline]
    pub fn is_packed(&self) -> bool {
        matches!(self, WordArray::Packed(_))
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        match self {
            WordArray::Packed(a) => a.bits(),
            WordArray::Unpacked(a) => a.bits(),
        }
    }

    #[inline]
    pub fn len(&self) -> u64 {
        match self {
            WordArray::Packed(a) => a.len(),
            WordArray::Unpacked(a) => a.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn reserved_mask(&self) -> u64 {
        match self {
            WordArray::Packed(a) => a.reserved_mask(),
            WordArray::Unpacked(a) => a.reserved_mask(),
        }
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        match self {
            WordArray::Packed(a) => a.words(),
            WordArray::Unpacked(a) => a.words(),
        }
    }

    #[inline]
    pub fn get(&self, index: u64) -> Result<u64> {
        match self {
            WordArray::Packed(a) => a.get(index),
            WordArray::Unpacked(a) => a.get(index),
        }
    }

    #[inline]
    pub fn storage(&self) -> &B {
        match self {
            WordArray::Packed(a) => a.storage(),
            WordArray::Unpacked(a) => a.storage(),
        }
    }

    pub fn into_inner(self) -> B {
        match self {
            WordArray::Packed(a) => a.into_inner(),
            WordArray::Unpacked(a) => a.into_inner(),
        }
    }
}

impl<B: AsRef<[u64]> + AsMut<[u64]>> WordArray<B> {
    #[inline]
    pub fn set(&mut self, index: u64, value: u64) -> Result<()> {
        match self {
            WordArray::Packed(a) => a.set(index, value),
            WordArray::Unpacked(a) => a.set(index, value),
        }
    }

    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        match self {
            WordArray::Packed(a) => a.words_mut(),
            WordArray::Unpacked(a) => a.words_mut(),
        }
    }
}
