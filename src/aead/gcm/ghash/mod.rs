//! GHASH universal hash for Galois/Counter Mode
//!
//! GHASH absorbs 16-byte blocks into an accumulator by XOR followed by
//! multiplication with the subkey H in GF(2^128). Bit ordering follows NIST
//! SP 800-38D: byte 0 carries the highest-order coefficients and bit 7
//! within each byte is the highest order, which makes the field's "shift
//! toward lower degree" a byte-wise right shift with the reduction value
//! 0xE1 folded into byte 0.
//!
//! ## Constant-Time Guarantees
//!
//! The multiply folds every bit of the first operand through masks; no
//! branch and no memory index depends on data. There is no table-driven or
//! carry-less-multiply variant: a SIMD fast path is only sound with the full
//! polynomial reduction, and the portable masked version is the one
//! implementation this crate carries.

use byteorder::{BigEndian, ByteOrder};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::security::barrier;

const GHASH_BLOCK_SIZE: usize = 16;

/// Reduction feedback of x^128 + x^7 + x^2 + x + 1, positioned at byte 0
const R: u64 = 0xe1 << 56;

/// GHASH accumulator keyed by H = E_K(0^128)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub(crate) struct GHash {
    h: [u8; GHASH_BLOCK_SIZE],
    y: [u8; GHASH_BLOCK_SIZE],
}

impl GHash {
    /// Create an accumulator with `y` at zero
    pub fn new(h: &[u8; GHASH_BLOCK_SIZE]) -> Self {
        Self {
            h: *h,
            y: [0u8; GHASH_BLOCK_SIZE],
        }
    }

    /// Absorb one logical segment (IV, AAD, or ciphertext)
    ///
    /// A trailing partial block is zero-padded. Padding happens exactly once
    /// per segment, so callers must absorb AAD and ciphertext through
    /// separate calls rather than concatenating them first.
    pub fn update(&mut self, data: &[u8]) {
        let mut chunks = data.chunks_exact(GHASH_BLOCK_SIZE);
        for chunk in &mut chunks {
            let mut block = [0u8; GHASH_BLOCK_SIZE];
            block.copy_from_slice(chunk);
            self.absorb(&block);
        }

        let rest = chunks.remainder();
        if !rest.is_empty() {
            let mut block = [0u8; GHASH_BLOCK_SIZE];
            block[..rest.len()].copy_from_slice(rest);
            self.absorb(&block);
        }
    }

    /// Absorb the closing length block
    ///
    /// Both lengths are given in bytes and encoded as 64-bit big-endian bit
    /// counts, AAD first.
    pub fn update_lengths(&mut self, aad_len: u64, data_len: u64) {
        let mut block = [0u8; GHASH_BLOCK_SIZE];
        BigEndian::write_u64(&mut block[..8], aad_len * 8);
        BigEndian::write_u64(&mut block[8..], data_len * 8);
        self.absorb(&block);
    }

    /// Return the current accumulator value
    pub fn finalize(&self) -> [u8; GHASH_BLOCK_SIZE] {
        self.y
    }

    fn absorb(&mut self, block: &[u8; GHASH_BLOCK_SIZE]) {
        for (y, b) in self.y.iter_mut().zip(block.iter()) {
            *y ^= b;
        }
        self.y = gmul(&self.y, &self.h);
    }
}

/// Multiply two elements of GF(2^128) modulo x^128 + x^7 + x^2 + x + 1
///
/// The operands are held as two big-endian 64-bit halves. For each bit of
/// `x` (MSB-first), `v` is conditionally folded into the product through a
/// whole-word mask, then shifted one bit toward lower degree with the
/// reduction value re-entering at the top.
pub(crate) fn gmul(x: &[u8; 16], y: &[u8; 16]) -> [u8; 16] {
    let mut z_hi = 0u64;
    let mut z_lo = 0u64;
    let mut v_hi = BigEndian::read_u64(&y[..8]);
    let mut v_lo = BigEndian::read_u64(&y[8..]);

    for &byte in x.iter() {
        for j in 0..8 {
            // 0xFFF.. when the bit is set, 0 otherwise
            let mask = (((byte >> (7 - j)) & 1) as u64).wrapping_neg();
            z_hi ^= v_hi & mask;
            z_lo ^= v_lo & mask;

            // v >>= 1 across the halves; the shifted-out bit selects R
            let reduce = (v_lo & 1).wrapping_neg() & R;
            v_lo = (v_lo >> 1) | (v_hi << 63);
            v_hi = (v_hi >> 1) ^ reduce;
        }
    }

    barrier::compiler_fence_seq_cst();

    let mut z = [0u8; 16];
    BigEndian::write_u64(&mut z[..8], z_hi);
    BigEndian::write_u64(&mut z[8..], z_lo);
    z
}
