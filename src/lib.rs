//! AES-GCM authenticated encryption
//!
//! This crate implements the Galois/Counter Mode construction of NIST SP
//! 800-38D over the AES block cipher, with the three standardized key widths
//! and, behind the `aes512` feature, a non-standard 512-bit extension that
//! continues the Rijndael key-schedule pattern.
//!
//! The primitive is one-shot over full buffers: no streaming, no incremental
//! state, always a full 16-byte tag. Callers supply IVs and own their
//! uniqueness.
//!
//! # Security Features
//!
//! - Constant-time software AES (field-inversion S-box, branchless GF(2^8))
//!   with runtime-detected AES-NI and ARMv8 fast paths
//! - Constant-time GF(2^128) multiplication in GHASH (mask-and-XOR, no
//!   secret-dependent branches)
//! - Tag verification through `subtle`, before any plaintext is produced
//! - Key and schedule material zeroized on drop
//!
//! # Example
//!
//! ```
//! use aesgcm::{Aes128, BlockCipher, Gcm, SecretBytes};
//!
//! let key = SecretBytes::<16>::new([0x42; 16]);
//! let gcm = Gcm::new(Aes128::new(&key)).unwrap();
//!
//! let iv = [0x24; 12]; // must be unique per key; callers own this
//! let (ciphertext, tag) = gcm.encrypt(&iv, b"header", b"secret").unwrap();
//!
//! let plaintext = gcm.decrypt(&iv, b"header", &ciphertext, &tag).unwrap();
//! assert_eq!(plaintext, b"secret");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub use error::{validate, Error, Result};

pub mod security;

pub mod types;
pub use types::{SecretBytes, Tag};

pub mod block;
#[cfg(feature = "aes512")]
pub use block::Aes512;
pub use block::{Aes128, Aes192, Aes256, BlockCipher, CipherAlgorithm};

#[cfg(feature = "alloc")]
pub mod aead;
#[cfg(feature = "alloc")]
pub use aead::Gcm;
