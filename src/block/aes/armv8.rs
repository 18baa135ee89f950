//! ARMv8 crypto-extension fast path for aarch64
//!
//! AESE folds AddRoundKey into SubBytes/ShiftRows and AESMC is MixColumns,
//! so the round structure regroups relative to FIPS 197: the middle rounds
//! pair AESE with AESMC, the last round is a bare AESE followed by the final
//! key XOR. As on x86-64, the per-round instructions serve any round count,
//! including the 22-round 512-bit schedule.

#![allow(unsafe_code)]

use core::arch::aarch64::{vaeseq_u8, vaesmcq_u8, veorq_u8, vld1q_u8, vst1q_u8};

use super::AES_BLOCK_SIZE;

/// Whether the executing CPU reports the AES extension
#[inline]
pub(super) fn is_available() -> bool {
    std::arch::is_aarch64_feature_detected!("aes")
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

    let mut state = vld1q_u8(block.as_ptr());

    for round in 0..nr - 1 {
        let key = vld1q_u8(rk.add(round * AES_BLOCK_SIZE));
        state = vaesmcq_u8(vaeseq_u8(state, key));
    }

    let key = vld1q_u8(rk.add((nr - 1) * AES_BLOCK_SIZE));
    state = vaeseq_u8(state, key);
    state = veorq_u8(state, vld1q_u8(rk.add(nr * AES_BLOCK_SIZE)));

    vst1q_u8(block.as_mut_ptr(), state);
}
