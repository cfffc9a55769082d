//! Bit-packed fixed-width integer array.
//!
//! Value `i` occupies bits `[i * bits, (i + 1) * bits)` of the word buffer,
//! counting from the least significant bit of word 0. A value whose span crosses
//! a word edge keeps its low part in the high bits of the first word and its high
//! part in the low bits of the next one.

use slotvec_common::{Result, error::Error};

use crate::bits::{WORD_BITS, check_bits, low_mask, reserved_mask, words_required};

/// A fixed-length sequence of `bits`-wide unsigned integers packed contiguously
/// over a word buffer `B`.
///
/// The array does not allocate its buffer: `B` is a `Vec<u64>`, a borrowed slice,
/// or a mapped region owned by a storage wrapper.
#[derive(Debug, Clone)]
pub struct PackedArray<B> {
    words: B,
    bits: u32,
    len: u64,
    reserved_mask: u64,
}

impl PackedArray<Vec<u64>> {
    /// Creates a heap-backed array of `len` zero values.
    pub fn zeroed(bits: u32, len: u64) -> Result<PackedArray<Vec<u64>>> {
        check_bits(bits)?;
        let words = usize::try_from(words_required(bits, len))
            .map_err(|_| Error::invalid_arg("len", format!("{len} values do not fit in memory")))?;
        PackedArray::new(bits, len, vec![0u64; words])
    }
}

impl<B: AsRef<[u64]>> PackedArray<B> {
    /// Wraps `words` as an array of `len` values of `bits` bits each.
    ///
    /// # Errors
    ///
    /// - `UnsupportedWidth` if `bits` is not in `1..=64`.
    /// - `InvalidArgument` if `words` is shorter than
    ///   [`words_required(bits, len)`](crate::bits::words_required).
    pub fn new(bits: u32, len: u64, words: B) -> Result<PackedArray<B>> {
        check_bits(bits)?;
        let required = words_required(bits, len);
        let available = words.as_ref().len() as u64;
        if available < required {
            return Err(Error::invalid_arg(
                "words",
                format!("{len} values of {bits} bits need {required} words, got {available}"),
            ));
        }
        Ok(PackedArray {
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

    /// The precomputed reserved-value mask for this array's width.
    #[inline]
    pub fn reserved_mask(&self) -> u64 {
        self.reserved_mask
    }

    /// The raw word buffer, including padding bits past the last value.
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

    /// Reads the value at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfRange` if `index >= len`.
    #[inline]
    pub fn get(&self, index: u64) -> Result<u64> {
        self.check_index(index)?;
        Ok(self.read_value(index))
    }

    #[inline]
    fn check_index(&self, index: u64) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::index_out_of_range(index, self.len))
        }
    }

    #[inline]
    fn read_value(&self, index: u64) -> u64 {
        let words = self.words.as_ref();
        let (word_index, shift) = self.locate(index);
        if shift + self.bits <= WORD_BITS {
            (words[word_index] >> shift) & low_mask(self.bits)
        } else {
            let low_bits = WORD_BITS - shift;
            let low = words[word_index] >> shift;
            let high = words[word_index + 1] & low_mask(self.bits - low_bits);
            low | (high << low_bits)
        }
    }

    /// Returns the word holding the first bit of value `index` and the bit
    /// position of that bit within the word.
    #[inline]
    fn locate(&self, index: u64) -> (usize, u32) {
        let bit_offset = index * self.bits as u64;
        let word_index = (bit_offset / WORD_BITS as u64) as usize;
        let shift = (bit_offset % WORD_BITS as u64) as u32;
        (word_index, shift)
    }
}

impl<B: AsRef<[u64]> + AsMut<[u64]>> PackedArray<B> {
    /// Writes `value` at `index`, preserving every bit outside the value's span.
    ///
    /// # Errors
    ///
    /// - `IndexOutOfRange` if `index >= len`.
    /// - `ValueOutOfRange` if `value` has bits set under the reserved mask,
    ///   i.e. does not fit in `bits` bits. Values are never truncated.
    #[inline]
    pub fn set(&mut self, index: u64, value: u64) -> Result<()> {
        self.check_index(index)?;
        if value & self.reserved_mask != 0 {
            return Err(Error::value_out_of_range(value, self.bits));
        }
        self.write_value(index, value);
        Ok(())
    }

    #[inline]
    pub fn words_mut(&mut self) -> &mut [u64] {
        self.words.as_mut()
    }

    #[inline]
    fn write_value(&mut self, index: u64, value: u64) {
        let bits = self.bits;
        let (word_index, shift) = self.locate(index);
        let words = self.words.as_mut();
        if shift + bits <= WORD_BITS {
            let mask = low_mask(bits) << shift;
            words[word_index] = (words[word_index] & !mask) | (value << shift);
        } else {
            let low_bits = WORD_BITS - shift;
            let high_bits = bits - low_bits;
            words[word_index] = (words[word_index] & low_mask(shift)) | (value << shift);
            words[word_index + 1] =
                (words[word_index + 1] & !low_mask(high_bits)) | (value >> low_bits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PackedArray;
    use crate::bits::{WORD_BITS, low_mask};
    use slotvec_common::error::ErrorKind;

    #[test]
    fn test_straddling_value_scenario() {
        let mut arr = PackedArray::zeroed(5, 20).unwrap();
        assert_eq!(arr.words().len(), 2);

        arr.set(11, 0b10101).unwrap();
        arr.set(13, 0b01110).unwrap();
        arr.set(12, 27).unwrap();

        assert_eq!(arr.get(12).unwrap(), 27);
        assert_eq!(arr.get(11).unwrap(), 0b10101);
        assert_eq!(arr.get(13).unwrap(), 0b01110);

        // 27 = 0b11011: low 4 bits land in bits 60..64 of word 0,
        // the top bit in bit 0 of word 1.
        assert_eq!(arr.words()[0] >> 60, 0b1011);
        assert_eq!(arr.words()[1] & 1, 1);
    }

    #[test]
    fn test_straddle_preserves_neighbours_in_both_words() {
        for bits in [3u32, 5, 7, 13, 33, 63] {
            let len = 200u64;
            let mut arr = PackedArray::zeroed(bits, len).unwrap();
            let max = low_mask(bits);
            for i in 0..len {
                arr.set(i, max).unwrap();
            }
            for i in 0..len {
                arr.set(i, 0).unwrap();
                for j in 0..len {
                    let expected = if j == i { 0 } else { max };
                    assert_eq!(arr.get(j).unwrap(), expected, "bits={bits} i={i} j={j}");
                }
                arr.set(i, max).unwrap();
            }
        }
    }

    #[test]
    fn test_value_at_word_edge() {
        // 16 divides 64: value 3 ends exactly at the end of word 0.
        let mut arr = PackedArray::zeroed(16, 8).unwrap();
        arr.set(3, 0xffff).unwrap();
        arr.set(4, 0x1234).unwrap();
        assert_eq!(arr.words()[0], 0xffff << 48);
        assert_eq!(arr.words()[1], 0x1234);
        assert_eq!(arr.get(3).unwrap(), 0xffff);
        assert_eq!(arr.get(4).unwrap(), 0x1234);
    }

    #[test]
    fn test_random_patterns_all_widths() {
        let mut rng = fastrand::Rng::with_seed(0x5107);
        for bits in 1..=WORD_BITS {
            let len = 257u64;
            let mut arr = PackedArray::zeroed(bits, len).unwrap();
            let mut reference = vec![0u64; len as usize];
            for _ in 0..1000 {
                let i = rng.u64(0..len);
                let v = rng.u64(..) & low_mask(bits);
                arr.set(i, v).unwrap();
                reference[i as usize] = v;
            }
            for (i, &v) in reference.iter().enumerate() {
                assert_eq!(arr.get(i as u64).unwrap(), v, "bits={bits} index={i}");
            }
        }
    }

    #[test]
    fn test_full_width_packed() {
        let mut arr = PackedArray::zeroed(64, 3).unwrap();
        arr.set(1, u64::MAX).unwrap();
        arr.set(2, 42).unwrap();
        assert_eq!(arr.words(), &[0, u64::MAX, 42]);
        assert_eq!(arr.reserved_mask(), 0);
    }

    #[test]
    fn test_out_of_range() {
        let mut arr = PackedArray::zeroed(5, 20).unwrap();
        let err = arr.get(20).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::IndexOutOfRange { index: 20, len: 20 }
        ));
        assert!(arr.set(20, 1).is_err());

        let err = arr.set(0, 32).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::ValueOutOfRange { value: 32, bits: 5 }
        ));
        assert_eq!(arr.get(0).unwrap(), 0);
    }

    #[test]
    fn test_empty() {
        let arr = PackedArray::zeroed(7, 0).unwrap();
        assert!(arr.is_empty());
        assert!(arr.words().is_empty());
        assert!(arr.get(0).is_err());
    }

    #[test]
    fn test_new_validates_buffer() {
        assert!(PackedArray::new(5, 20, vec![0u64; 1]).is_err());
        assert!(PackedArray::new(5, 20, vec![0u64; 2]).is_ok());
        assert!(PackedArray::new(0, 1, vec![0u64; 1]).is_err());
        assert!(PackedArray::new(65, 1, vec![0u64; 2]).is_err());
    }

    #[test]
    fn test_borrowed_buffer() {
        let mut buf = [0u64; 2];
        {
            let mut arr = PackedArray::new(10, 12, &mut buf[..]).unwrap();
            arr.set(6, 0x3ff).unwrap();
        }
        // Value 6 spans bits 60..70.
        assert_eq!(buf[0] >> 60, 0xf);
        assert_eq!(buf[1], 0x3f);
    }
}
