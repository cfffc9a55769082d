//! Word arithmetic shared by the array layouts.

use slotvec_common::{Result, error::Error};

/// Width of the storage word in bits.
pub const WORD_BITS: u32 = u64::BITS;

/// Size of the storage word in bytes.
pub const BYTES_PER_WORD: usize = std::mem::size_of::<u64>();

/// Validates a value width, returning `UnsupportedWidth` unless `1 <= bits <= 64`.
///
/// A value may never span more than a single storage word, so wider values are
/// a configuration error rather than something the arrays can degrade gracefully on.
#[inline]
pub fn check_bits(bits: u32) -> Result<()> {
    if bits == 0 || bits > WORD_BITS {
        Err(Error::unsupported_width(bits))
    } else {
        Ok(())
    }
}

/// Returns the minimum number of words holding `size` values of `bits` bits each,
/// packed with no padding between values: `ceil(bits * size / 64)`.
#[inline]
pub fn words_required(bits: u32, size: u64) -> u64 {
    let total_bits = bits as u128 * size as u128;
    total_bits.div_ceil(WORD_BITS as u128) as u64
}

/// Returns the number of words backing `size` values in the given layout.
#[inline]
pub fn storage_words(bits: u32, size: u64, packed: bool) -> u64 {
    if packed {
        words_required(bits, size)
    } else {
        size
    }
}

/// Returns a mask with the low `bits` bits set.
#[inline]
pub fn low_mask(bits: u32) -> u64 {
    if bits >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Returns the reserved-value mask for the given width: every bit of the word
/// that lies outside a `bits`-wide value.
///
/// Arrays precompute this once and reject writes intersecting it. It is zero
/// for 64-bit values.
#[inline]
pub fn reserved_mask(bits: u32) -> u64 {
    !low_mask(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_required_matches_ceil() {
        for bits in 1..=WORD_BITS {
            for size in [0u64, 1, 2, 3, 7, 63, 64, 65, 100, 1000, 4097] {
                let expected = (bits as u64 * size).div_ceil(64);
                assert_eq!(words_required(bits, size), expected, "bits={bits} size={size}");
            }
        }
    }

    #[test]
    fn test_words_required_scenarios() {
        assert_eq!(words_required(5, 20), 2);
        assert_eq!(words_required(64, 4), 4);
        assert_eq!(words_required(1, 64), 1);
        assert_eq!(words_required(1, 65), 2);
        assert_eq!(words_required(13, 0), 0);
    }

    #[test]
    fn test_words_required_no_overflow() {
        assert_eq!(words_required(64, u64::MAX), u64::MAX);
        assert_eq!(words_required(32, u64::MAX), u64::MAX / 2 + 1);
    }

    #[test]
    fn test_storage_words() {
        assert_eq!(storage_words(5, 20, true), 2);
        assert_eq!(storage_words(5, 20, false), 20);
    }

    #[test]
    fn test_masks() {
        assert_eq!(low_mask(1), 1);
        assert_eq!(low_mask(5), 0b11111);
        assert_eq!(low_mask(63), u64::MAX >> 1);
        assert_eq!(low_mask(64), u64::MAX);

        assert_eq!(reserved_mask(5), !0b11111u64);
        assert_eq!(reserved_mask(63), 1u64 << 63);
        assert_eq!(reserved_mask(64), 0);
        for bits in 1..=WORD_BITS {
            assert_eq!(low_mask(bits) & reserved_mask(bits), 0);
            assert_eq!(low_mask(bits) | reserved_mask(bits), u64::MAX);
        }
    }

    #[test]
    fn test_check_bits() {
        assert!(check_bits(1).is_ok());
        assert!(check_bits(64).is_ok());
        assert!(check_bits(0).is_err());
        let err = check_bits(65).unwrap_err();
        assert!(matches!(
            err.kind(),
            slotvec_common::error::ErrorKind::UnsupportedWidth { bits: 65 }
        ));
    }
}
