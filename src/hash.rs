// MIT License
//
// Copyright (c) 2020 Gregory Meyer
//
// Permission is hereby granted, free of charge, to any person
// obtaining a copy of this software and associated documentation files
// (the "Software"), to deal in the Software without restriction,
// including without limitation the rights to use, copy, modify, merge,
// publish, distribute, sublicense, and/or sell copies of the Software,
// and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS
// BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN
// ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! Hashing and index derivation for 64-bit keys.
//!
//! Every key is hashed exactly once per operation with [`mix`]. The
//! most-significant bits of the result select a segment and
//! [`sign_safe_mod`] of the whole hash against the segment's capacity selects
//! a bucket, so the two levels draw on disjoint bit ranges as long as
//! `log2(segments) + log2(capacity) <= 32`.

const HASH_MIXER: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Scrambles a 64-bit key into a well-dispersed 32-bit hash.
///
/// This is the 64-bit MurmurHash2 finalizer followed by a xor-fold of the
/// upper half into the lower half. The result is frequently negative.
#[inline]
pub fn mix(key: i64) -> i32 {
    let mut hash = (key as u64).wrapping_mul(HASH_MIXER);
    hash ^= hash >> R;
    hash = hash.wrapping_mul(HASH_MIXER);

    (hash ^ (hash >> 32)) as u32 as i32
}

/// Returns `hash mod n`, always in `[0, n)`.
///
/// # Panics
///
/// Panics if `n <= 0`.
#[inline]
pub fn sign_safe_mod(hash: i32, n: i32) -> i32 {
    assert!(n > 0, "modulus must be positive, got {}", n);

    let remainder = hash % n;

    if remainder < 0 {
        remainder + n
    } else {
        remainder
    }
}

/// Returns the right shift that turns a hash into a segment index for a map
/// with `num_segments` segments, or `None` if there is only one segment.
pub(crate) fn segment_shift(num_segments: usize) -> Option<u32> {
    debug_assert!(num_segments.is_power_of_two());

    match num_segments.trailing_zeros() {
        0 => None,
        bits => Some(32 - bits),
    }
}

#[inline]
pub(crate) fn segment_index(hash: i32, shift: Option<u32>) -> usize {
    match shift {
        Some(shift) => ((hash as u32) >> shift) as usize,
        None => 0,
    }
}

#[inline]
pub(crate) fn bucket_index(hash: i32, capacity: usize) -> usize {
    sign_safe_mod(hash, capacity as i32) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_is_deterministic() {
        for key in [i64::MIN, -1, 0, 1, 27, i64::MAX] {
            assert_eq!(mix(key), mix(key));
        }
    }

    #[test]
    fn mix_disperses_sequential_keys() {
        let buckets: std::collections::HashSet<_> = (0..1024)
            .map(|key| sign_safe_mod(mix(key), 1024))
            .collect();

        assert!(buckets.len() > 512);
    }

    #[test]
    fn mix_produces_negative_hashes() {
        assert!((0..64).map(mix).any(|hash| hash < 0));
    }

    #[test]
    fn sign_safe_mod_is_never_negative() {
        assert_eq!(sign_safe_mod(-1, 16), 15);
        assert_eq!(sign_safe_mod(-16, 16), 0);
        assert_eq!(sign_safe_mod(-17, 16), 15);
        assert_eq!(sign_safe_mod(i32::MIN, 16), 0);
        assert_eq!(sign_safe_mod(i32::MIN, 7), 5);
        assert_eq!(sign_safe_mod(17, 16), 1);
        assert_eq!(sign_safe_mod(0, 1), 0);

        for key in -1000..1000 {
            let bucket = sign_safe_mod(mix(key), 13);

            assert!((0..13).contains(&bucket));
        }
    }

    #[test]
    #[should_panic]
    fn sign_safe_mod_rejects_zero_modulus() {
        sign_safe_mod(5, 0);
    }

    #[test]
    fn single_segment_always_selects_zero() {
        let shift = segment_shift(1);

        assert_eq!(shift, None);

        for key in -100..100 {
            assert_eq!(segment_index(mix(key), shift), 0);
        }
    }

    #[test]
    fn segment_index_uses_high_bits() {
        let shift = segment_shift(16);

        assert_eq!(shift, Some(28));
        assert_eq!(segment_index(-1, shift), 15);
        assert_eq!(segment_index(i32::MIN, shift), 8);
        assert_eq!(segment_index(0x0fff_ffff, shift), 0);

        for key in -100..100 {
            assert!(segment_index(mix(key), shift) < 16);
        }
    }
}
