//! Counter mode with GCM's 32-bit counter layout
//!
//! Counter mode turns the block cipher into a stream cipher by encrypting
//! successive counter blocks and XORing the output into the data. The block
//! layout is GCM's: bytes 0..12 hold a per-message prefix and bytes 12..16 a
//! 32-bit big-endian counter. Only the trailing 32 bits increment; a carry
//! never propagates into byte 11, and the counter wraps modulo 2^32.

use byteorder::{BigEndian, ByteOrder};
use zeroize::Zeroize;

use crate::block::BlockCipher;
use crate::error::Result;

const BLOCK_SIZE: usize = 16;

/// Increment the trailing 32 bits of a counter block, big-endian
#[inline]
pub fn inc32(block: &mut [u8; BLOCK_SIZE]) {
    let ctr = BigEndian::read_u32(&block[12..16]).wrapping_add(1);
    BigEndian::write_u32(&mut block[12..16], ctr);
}

/// In-place counter-mode keystream over a borrowed block cipher
///
/// Each 16-byte chunk of data consumes one counter value; the final chunk
/// may be partial. The caller supplies the starting counter and keeps its
/// own copy if it needs the initial value again (GCM holds J0 separately
/// for tag derivation).
pub struct Ctr32<'a, B: BlockCipher> {
    cipher: &'a B,
    counter: [u8; BLOCK_SIZE],
}

impl<'a, B: BlockCipher> Ctr32<'a, B> {
    /// Create a keystream starting at `counter`
    pub fn new(cipher: &'a B, counter: [u8; BLOCK_SIZE]) -> Self {
        Self { cipher, counter }
    }

    /// XOR the keystream into `buf` in place
    ///
    /// Encryption and decryption are the same operation.
    pub fn xor_in_place(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut keystream = [0u8; BLOCK_SIZE];

        for chunk in buf.chunks_mut(BLOCK_SIZE) {
            keystream.copy_from_slice(&self.counter);
            self.cipher.encrypt_block(&mut keystream)?;
            inc32(&mut self.counter);

            for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
                *b ^= k;
            }
        }

        keystream.zeroize();
        Ok(())
    }
}

impl<'a, B: BlockCipher> Drop for Ctr32<'a, B> {
    fn drop(&mut self) {
        self.counter.zeroize();
    }
}
