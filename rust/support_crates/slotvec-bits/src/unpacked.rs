//! One value per 64-bit word.

use slotvec_common::{Result, error::Error};

use crate::bits::{check_bits, reserved_mask};

/// An array storing value `i` in word `i`.
///
/// Used when `bits == 64` (where packing degenerates to the same layout) or when
/// the consumer prefers word-granular access over density.
#[derive(Debug, Clone)]
pub struct UnpackedArray<B> {
    words: B,
    bits: u32,
    len: u64,
    reserved_mask: u64,
}

impl UnpackedArray<Vec<u64>> {
    pub fn zeroed(bits: u32, len: u64) -> Result<UnpackedArray<Vec<u64>>> {
        check_bits(bits)?;
        let words = usize::try_from(len)
            .map_err(|_| Error::invalid_arg("len", format!("{len} values do not fit in memory")))?;
        UnpackedArray::new(bits, len, vec![0u64; words])
    }
}

impl<B: AsRef<[u64]>> UnpackedArray<B> {
    pub fn new(bits: u32, len: u64, words: B) -> Result<UnpackedArray<B>> {
        check_bits(bits)?;
        let available = words.as_ref().len() as u64;
        if available < len {
            return Err(Error::invalid_arg(
                "words",
                format!("{len} unpacked values need {len} words, got {available}"),
            ));
        }
        Ok(UnpackedArray {
            words,
            bits,
            len,
            reserved_mask: reserved_mask(bits),
        })
    }

    #[inline]
    pub fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn reserved_mask(&self) -> u64 {
        self.reserved_mask
    }

    #[inline]
    pub fn words(&self) -> &[u64] {
        self.words.as_ref()
    }

    /// The word storage itself, e.g. to flush a mapped buffer.
    #[inline]
    pub fn storage(&self) -> &B {
        &self.words
    }

    pub fn into_inner(self) -> B {
        self.words
    }

    #[inline]
    pub fn get(&self, index: u64) -> Result<u64> {
        if index < self.len {
            Ok(self.words.as_ref()[index as usize])
        } else {
            Err(Error::index_out_of_range(index, self.len))
        }
    }
}

impl<B: AsRef<[u64]> + AsMut<[u64]>> UnpackedArray<B> {
    #[inline]
    pub fn set(&mut self, index: u64, value: u64) -> Result<()> {
        if index >= self.len {
            return Err(Error::index_out_of_range(index, self.len));
        }
        if value & self.reserved_mask != 0 {
            return Err(Error::value_out_of_range(value, self.bits));
        }
        self.words.as_mut()[index as usize] = value;
        Ok(())
    }

    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        self.words.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::UnpackedArray;
    use crate::bits::words_required;

    #[test]
    fn test_full_width_scenario() {
        assert_eq!(words_required(64, 4), 4);
        let mut arr = UnpackedArray::zeroed(64, 4).unwrap();
        arr.set(0, u64::MAX).unwrap();
        arr.set(3, 0x8000_0000_0000_0001).unwrap();
        assert_eq!(arr.get(0).unwrap(), u64::MAX);
        assert_eq!(arr.get(1).unwrap(), 0);
        assert_eq!(arr.get(3).unwrap(), 0x8000_0000_0000_0001);
        assert_eq!(arr.words(), &[u64::MAX, 0, 0, 0x8000_0000_0000_0001]);
        assert!(arr.get(4).is_err());
    }

    #[test]
    fn test_narrow_width_rejects_wide_values() {
        let mut arr = UnpackedArray::zeroed(9, 3).unwrap();
        arr.set(2, 511).unwrap();
        assert!(arr.set(2, 512).is_err());
        assert_eq!(arr.get(2).unwrap(), 511);
    }

    #[test]
    fn test_new_validates_buffer() {
        assert!(UnpackedArray::new(64, 4, vec![0u64; 3]).is_err());
        assert!(UnpackedArray::new(64, 4, vec![0u64; 4]).is_ok());
        assert!(UnpackedArray::new(65, 1, vec![0u64; 1]).is_err());
    }
}
