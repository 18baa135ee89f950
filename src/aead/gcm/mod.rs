//! Galois/Counter Mode (GCM) authenticated encryption
//!
//! GCM combines counter-mode confidentiality with GHASH integrity under a
//! single block-cipher key, following NIST SP 800-38D. The tag is always the
//! full 16 bytes.
//!
//! ## Constant-Time Guarantees
//!
//! - Tag verification uses the `subtle` crate's constant-time comparison,
//!   fenced so the compiler cannot fuse it with surrounding work.
//! - Decryption verifies the tag before generating any keystream; a forged
//!   message never produces plaintext, and the failure path does the same
//!   hashing work as the success path.
//!
//! Callers own nonce uniqueness. Reusing an IV under one key voids both the
//! confidentiality and the integrity guarantee.

#[cfg(all(feature = "alloc", not(feature = "std")))]
use alloc::vec::Vec;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::block::modes::ctr::{inc32, Ctr32};
use crate::block::BlockCipher;
use crate::error::{validate, Result};
use crate::security::barrier;
use crate::types::Tag;

mod ghash;
use ghash::GHash;

/// GCM block size in bytes
const GCM_BLOCK_SIZE: usize = 16;
/// GCM tag size in bytes
pub const GCM_TAG_SIZE: usize = 16;
/// The recommended IV size in bytes; other non-zero lengths go through the
/// GHASH derivation
pub const GCM_IV_SIZE: usize = 12;

/// Largest message one invocation may process: 2^39 - 256 bits (SP 800-38D
/// §5.2.1.1), i.e. 2^36 - 32 bytes. The 32-bit counter subfield has no more
/// distinct blocks than that.
const GCM_P_MAX: u64 = (1 << 36) - 32;

/// GCM authenticated encryption over a 128-bit block cipher
///
/// The hash subkey H is derived once at construction. The context is
/// immutable afterwards and may be shared across threads for any number of
/// calls, each call bringing its own IV; every call keeps its GHASH state,
/// counter, and E_K(J0) on its own stack.
pub struct Gcm<B: BlockCipher> {
    cipher: B,
    h: [u8; GCM_BLOCK_SIZE],
}

impl<B: BlockCipher> Drop for Gcm<B> {
    fn drop(&mut self) {
        // The cipher zeroizes its own schedule; H is ours to scrub.
        self.h.zeroize();
    }
}

impl<B: BlockCipher> Gcm<B> {
    /// Create a GCM instance around an initialized cipher
    pub fn new(cipher: B) -> Result<Self> {
        validate::parameter(
            B::block_size() == GCM_BLOCK_SIZE,
            "cipher",
            "GCM requires a 128-bit block cipher",
        )?;

        // H = E_K(0^128)
        let mut h = [0u8; GCM_BLOCK_SIZE];
        cipher.encrypt_block(&mut h)?;

        Ok(Self { cipher, h })
    }

    /// Derive the initial counter block J0 from the IV
    ///
    /// A 96-bit IV is used directly with the counter field set to 1. Every
    /// other length is hashed: GHASH over the zero-padded IV followed by a
    /// block holding the IV bit length. The two branches are distinct
    /// derivations, not aliases of one another.
    fn derive_j0(&self, iv: &[u8]) -> [u8; GCM_BLOCK_SIZE] {
        let mut j0 = [0u8; GCM_BLOCK_SIZE];
        if iv.len() == GCM_IV_SIZE {
            j0[..GCM_IV_SIZE].copy_from_slice(iv);
            j0[GCM_BLOCK_SIZE - 1] = 1;
        } else {
            let mut g = GHash::new(&self.h);
            g.update(iv);
            g.update_lengths(0, iv.len() as u64);
            j0 = g.finalize();
        }
        j0
    }

    /// Tag = GHASH_H(AAD ‖ pad ‖ C ‖ pad ‖ len(AAD) ‖ len(C)) ⊕ E_K(J0)
    fn compute_tag(
        &self,
        j0: &[u8; GCM_BLOCK_SIZE],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Tag<GCM_TAG_SIZE>> {
        let mut g = GHash::new(&self.h);
        g.update(aad);
        g.update(ciphertext);
        g.update_lengths(aad.len() as u64, ciphertext.len() as u64);
        let mut tag = g.finalize();

        let mut ek0 = *j0;
        self.cipher.encrypt_block(&mut ek0)?;
        for (t, e) in tag.iter_mut().zip(ek0.iter()) {
            *t ^= e;
        }
        ek0.zeroize();

        Ok(Tag::new(tag))
    }

    fn check_limits(iv: &[u8], data_len: usize) -> Result<()> {
        validate::parameter(
            !iv.is_empty(),
            "iv",
            "GCM requires an IV of at least one byte",
        )?;
        validate::parameter(
            data_len as u64 <= GCM_P_MAX,
            "message",
            "GCM input exceeds the per-invocation limit of 2^36 - 32 bytes",
        )
    }

    /// Authenticated encryption
    ///
    /// Returns the ciphertext (same length as the plaintext) and the
    /// detached 16-byte tag. The AAD is authenticated but not encrypted and
    /// may be empty; the plaintext may be empty as well, in which case only
    /// the tag carries information.
    pub fn encrypt(
        &self,
        iv: &[u8],
        aad: &[u8],
        plaintext: &[u8],
    ) -> Result<(Vec<u8>, Tag<GCM_TAG_SIZE>)> {
        Self::check_limits(iv, plaintext.len())?;

        let mut j0 = self.derive_j0(iv);

        let mut ciphertext = plaintext.to_vec();
        let mut counter = j0;
        inc32(&mut counter);
        Ctr32::new(&self.cipher, counter).xor_in_place(&mut ciphertext)?;

        let tag = self.compute_tag(&j0, aad, &ciphertext)?;
        j0.zeroize();

        Ok((ciphertext, tag))
    }

    /// Authenticated decryption
    ///
    /// Verifies the tag over the AAD and ciphertext and only then decrypts.
    /// On mismatch no plaintext is produced and the error carries no
    /// input-dependent detail.
    pub fn decrypt(
        &self,
        iv: &[u8],
        aad: &[u8],
        ciphertext: &[u8],
        tag: &Tag<GCM_TAG_SIZE>,
    ) -> Result<Vec<u8>> {
        Self::check_limits(iv, ciphertext.len())?;

        let mut j0 = self.derive_j0(iv);
        let expected = self.compute_tag(&j0, aad, ciphertext)?;

        barrier::compiler_fence_seq_cst();
        let tag_matches: bool = expected.as_ref().ct_eq(tag.as_ref()).into();
        barrier::compiler_fence_seq_cst();

        if let Err(e) = validate::authentication(tag_matches, "GCM") {
            j0.zeroize();
            return Err(e);
        }

        let mut plaintext = ciphertext.to_vec();
        let mut counter = j0;
        inc32(&mut counter);
        Ctr32::new(&self.cipher, counter).xor_in_place(&mut plaintext)?;
        j0.zeroize();

        Ok(plaintext)
    }
}

#[cfg(test)]
mod tests;
