//! Block cipher implementations
//!
//! The AES cipher and the counter mode it drives. Only the forward cipher is
//! provided: GCM builds both encryption and decryption out of counter-mode
//! keystream, so the inverse cipher never runs.

use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::Result;

pub mod aes;
pub mod modes;

pub use aes::{Aes128, Aes192, Aes256};
#[cfg(feature = "aes512")]
pub use aes::Aes512;
pub use modes::ctr::Ctr32;

/// Marker trait for cipher algorithms with compile-time properties
pub trait CipherAlgorithm {
    /// Key size in bytes
    const KEY_SIZE: usize;

    /// Block size in bytes
    const BLOCK_SIZE: usize;

    /// Algorithm name
    fn name() -> &'static str;
}

/// Marker trait for specific AES key widths
pub trait AesVariant: CipherAlgorithm {
    /// Number of rounds
    const ROUNDS: usize;
}

/// Trait for block ciphers
///
/// A cipher context is immutable after construction and may be shared freely
/// between threads for any number of encryptions.
pub trait BlockCipher {
    /// The algorithm this cipher implements
    type Algorithm: CipherAlgorithm;

    /// Key type with appropriate size guarantee
    type Key: AsRef<[u8]> + AsMut<[u8]> + Clone + Zeroize;

    /// Creates a new block cipher instance with the given key
    fn new(key: &Self::Key) -> Self;

    /// Encrypts a single block in place
    fn encrypt_block(&self, block: &mut [u8]) -> Result<()>;

    /// Returns the key size in bytes
    fn key_size() -> usize {
        Self::Algorithm::KEY_SIZE
    }

    /// Returns the block size in bytes
    fn block_size() -> usize {
        Self::Algorithm::BLOCK_SIZE
    }

    /// Returns the name of the block cipher
    fn name() -> &'static str {
        Self::Algorithm::name()
    }

    /// Generate a random key
    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key;
}
