//! AES-NI fast path for x86-64
//!
//! Runs the per-round AES instructions over the portably expanded key
//! schedule: one XOR for round zero, `_mm_aesenc_si128` for the middle
//! rounds, `_mm_aesenclast_si128` for the last. The per-round form carries
//! no round-count ceiling, so the same sequence serves every key width
//! including the 22-round 512-bit schedule. Key expansion stays scalar;
//! `aeskeygenassist` cannot express the wide schedule.

#![allow(unsafe_code)]

use core::arch::x86_64::{
    __m128i, _mm_aesenc_si128, _mm_aesenclast_si128, _mm_loadu_si128, _mm_storeu_si128,
    _mm_xor_si128,
};

use super::AES_BLOCK_SIZE;

/// Whether the executing CPU reports the AES extension
#[inline]
pub(super) fn is_available() -> bool {
    std::is_x86_feature_detected!("aes")
}

/// Encrypt one block over `nr` rounds
///
/// The caller must have confirmed `is_available()`.
#[inline]
pub(super) fn encrypt_block(round_keys: &[u8], nr: usize, block: &mut [u8; AES_BLOCK_SIZE]) {
    debug_assert!(round_keys.len() == AES_BLOCK_SIZE * (nr + 1));
    unsafe { encrypt_block_impl(round_keys, nr, block) }
}

#[target_feature(enable = "aes")]
unsafe fn encrypt_block_impl(round_keys: &[u8], nr: usize, block: &mut [u8; AES_BLOCK_SIZE]) {
    let rk = round_keys.as_ptr();

    let mut state = _mm_loadu_si128(block.as_ptr() as *const __m128i);
    state = _mm_xor_si128(state, _mm_loadu_si128(rk as *const __m128i));

    for round in 1..nr {
        let key = _mm_loadu_si128(rk.add(round * AES_BLOCK_SIZE) as *const __m128i);
        state = _mm_aesenc_si128(state, key);
    }

    let last = _mm_loadu_si128(rk.add(nr * AES_BLOCK_SIZE) as *const __m128i);
    state = _mm_aesenclast_si128(state, last);

    _mm_storeu_si128(block.as_mut_ptr() as *mut __m128i, state);
}
