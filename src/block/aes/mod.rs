//! AES block cipher (FIPS 197) with a non-standard 512-bit key extension
//!
//! ## Constant-Time Guarantees
//!
//! The scalar path mitigates timing side channels by:
//! - Using branchless arithmetic for GF(2^8) operations
//! - Computing the S-box by field inversion instead of table lookups
//! - Touching the full round-key buffer before use for a uniform cache state
//!
//! On x86-64 and aarch64 CPUs that report AES extensions, the per-round
//! hardware instructions are used instead; they are constant-time by
//! construction. The scalar path is always compiled and serves every CPU
//! without the extensions.
//!
//! Only the forward cipher exists. GCM decrypts with the same counter-mode
//! keystream it encrypts with, so the inverse cipher would be dead weight.

use byteorder::{BigEndian, ByteOrder};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{AesVariant, BlockCipher, CipherAlgorithm};
use crate::error::{validate, Result};
use crate::security::barrier;
use crate::types::SecretBytes;

#[cfg(all(feature = "std", target_arch = "x86_64"))]
mod aesni;
#[cfg(all(feature = "std", target_arch = "aarch64"))]
mod armv8;

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;
/// AES-128 key size in bytes
pub const AES128_KEY_SIZE: usize = 16;
/// AES-192 key size in bytes
pub const AES192_KEY_SIZE: usize = 24;
/// AES-256 key size in bytes
pub const AES256_KEY_SIZE: usize = 32;
/// AES-512 key size in bytes (non-standard extension)
#[cfg(feature = "aes512")]
pub const AES512_KEY_SIZE: usize = 64;

/// Multiply by x in GF(2^8) with the AES reduction poly x^8 + x^4 + x^3 + x + 1
#[inline(always)]
fn xtime(x: u8) -> u8 {
    (x << 1) ^ (((x >> 7) & 1) * 0x1b)
}

/// Multiply two bytes in GF(2^8) without data-dependent branches
///
/// Horner evaluation over the bits of `b`, high to low: the accumulator is
/// doubled each step and `a` folds in multiplied by the bit value.
#[inline(always)]
fn gf_mul(a: u8, b: u8) -> u8 {
    let mut p = 0u8;
    for shift in (0..8).rev() {
        p = xtime(p);
        p ^= a * ((b >> shift) & 1);
    }
    p
}

/// Invert in GF(2^8) by Fermat: x^-1 = x^254
///
/// Square-then-multiply ladder; each rung squares up to exponent 2^k - 2 and
/// one multiply tops it up to 2^k - 1. The ladder runs identically for every
/// input, and zero rides through to zero with no correction step.
#[inline(always)]
fn gf_inv(x: u8) -> u8 {
    let x3 = gf_mul(gf_mul(x, x), x);
    let x7 = gf_mul(gf_mul(x3, x3), x);
    let x15 = gf_mul(gf_mul(x7, x7), x);
    let x31 = gf_mul(gf_mul(x15, x15), x);
    let x63 = gf_mul(gf_mul(x31, x31), x);
    let x127 = gf_mul(gf_mul(x63, x63), x);
    gf_mul(x127, x127)
}

/// AES forward S-box: field inversion followed by the affine transform
#[inline(always)]
fn sbox(x: u8) -> u8 {
    let inv = gf_inv(x);

    // The affine matrix is circulant: XOR of inv rotated by 0..=4, plus 0x63
    let mut s = inv ^ 0x63;
    let mut r = inv;
    for _ in 0..4 {
        r = r.rotate_left(1);
        s ^= r;
    }
    s
}

/// Substitute each byte of a key-schedule word
#[inline(always)]
fn sub_word(word: u32) -> u32 {
    let b = word.to_be_bytes();
    u32::from_be_bytes([sbox(b[0]), sbox(b[1]), sbox(b[2]), sbox(b[3])])
}

/// Round constant for word group `n` of the key schedule, n >= 1
///
/// Generated by repeated doubling in GF(2^8). Wide schedules (AES-256 and
/// the 512-bit extension) index past the eleven constants most references
/// tabulate, so there is no fixed table to run off the end of.
#[inline]
fn rcon(n: usize) -> u8 {
    let mut r = 1u8;
    for _ in 1..n {
        r = xtime(r);
    }
    r
}

/// Expanded key schedule for one AES variant, wiped on drop
///
/// `N` is the full schedule size in bytes, `16 * (Nr + 1)`; the round count
/// falls out of it. Expansion happens inside the type so raw schedule bytes
/// never live anywhere unzeroized.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
struct KeySchedule<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> KeySchedule<N> {
    /// Expand a raw key of `4 * nk` bytes into the full schedule
    ///
    /// The first `nk` words are the key itself; each later word is the word
    /// `nk` back XORed with a transform of its predecessor: every `nk` words
    /// the predecessor is rotated, substituted, and folded with the round
    /// constant, and for `nk > 6` the word at offset 4 within each group
    /// gets a bare substitution.
    fn expand(key: &[u8], nk: usize) -> Self {
        debug_assert_eq!(key.len(), 4 * nk);
        debug_assert_eq!(N % AES_BLOCK_SIZE, 0);

        let mut bytes = [0u8; N];
        bytes[..key.len()].copy_from_slice(key);

        for i in nk..N / 4 {
            let mut temp = BigEndian::read_u32(&bytes[(i - 1) * 4..i * 4]);
            if i % nk == 0 {
                temp = sub_word(temp.rotate_left(8)) ^ ((rcon(i / nk) as u32) << 24);
            } else if nk > 6 && i % nk == 4 {
                temp = sub_word(temp);
            }
            let prev = BigEndian::read_u32(&bytes[(i - nk) * 4..(i - nk) * 4 + 4]);
            BigEndian::write_u32(&mut bytes[i * 4..(i + 1) * 4], prev ^ temp);
        }

        Self { bytes }
    }

    /// The whole schedule, one round key per 16-byte stride
    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> core::fmt::Debug for KeySchedule<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("KeySchedule").finish_non_exhaustive()
    }
}

/// SubBytes step
fn sub_bytes(state: &mut [u8; AES_BLOCK_SIZE]) {
    for byte in state.iter_mut() {
        *byte = sbox(*byte);
    }
    barrier::compiler_fence_seq_cst();
}

/// ShiftRows step
///
/// The state is column-major (byte of row r, column c at offset 4c + r), so
/// rotating row r left by r positions is this fixed permutation.
fn shift_rows(state: &mut [u8; AES_BLOCK_SIZE]) {
    let temp = *state;
    state[1] = temp[5];
    state[5] = temp[9];
    state[9] = temp[13];
    state[13] = temp[1];
    state[2] = temp[10];
    state[6] = temp[14];
    state[10] = temp[2];
    state[14] = temp[6];
    state[3] = temp[15];
    state[7] = temp[3];
    state[11] = temp[7];
    state[15] = temp[11];
}

/// MixColumns step
fn mix_columns(state: &mut [u8; AES_BLOCK_SIZE]) {
    for c in 0..4 {
        let i = c * 4;
        let s0 = state[i];
        let s1 = state[i + 1];
        let s2 = state[i + 2];
        let s3 = state[i + 3];
        state[i] = xtime(s0) ^ xtime(s1) ^ s1 ^ s2 ^ s3;
        state[i + 1] = s0 ^ xtime(s1) ^ xtime(s2) ^ s2 ^ s3;
        state[i + 2] = s0 ^ s1 ^ xtime(s2) ^ xtime(s3) ^ s3;
        state[i + 3] = xtime(s0) ^ s0 ^ s1 ^ s2 ^ xtime(s3);
    }
}

/// AddRoundKey step
#[inline(always)]
fn add_round_key(state: &mut [u8; AES_BLOCK_SIZE], round_key: &[u8]) {
    for i in 0..AES_BLOCK_SIZE {
        state[i] ^= round_key[i];
    }
}

/// Portable single-block encryption, `nr` rounds
fn encrypt_block_scalar(round_keys: &[u8], nr: usize, state: &mut [u8; AES_BLOCK_SIZE]) {
    // Touch every round-key byte up front for a uniform cache state
    let mut _warm: u8 = 0;
    for &b in round_keys {
        _warm = _warm.wrapping_add(b);
    }
    barrier::compiler_fence_seq_cst();

    add_round_key(state, &round_keys[..AES_BLOCK_SIZE]);

    for round in 1..nr {
        sub_bytes(state);
        shift_rows(state);
        mix_columns(state);
        let offset = round * AES_BLOCK_SIZE;
        add_round_key(state, &round_keys[offset..offset + AES_BLOCK_SIZE]);
    }

    sub_bytes(state);
    shift_rows(state);
    let offset = nr * AES_BLOCK_SIZE;
    add_round_key(state, &round_keys[offset..offset + AES_BLOCK_SIZE]);
}

/// Encrypt one block in place, dispatching to a hardware path when available
fn cipher_in_place(round_keys: &[u8], nr: usize, block: &mut [u8]) -> Result<()> {
    validate::length("AES block", block.len(), AES_BLOCK_SIZE)?;

    let mut state = [0u8; AES_BLOCK_SIZE];
    state.copy_from_slice(block);

    #[cfg(all(feature = "std", target_arch = "x86_64"))]
    {
        if aesni::is_available() {
            aesni::encrypt_block(round_keys, nr, &mut state);
            block.copy_from_slice(&state);
            state.zeroize();
            return Ok(());
        }
    }

    #[cfg(all(feature = "std", target_arch = "aarch64"))]
    {
        if armv8::is_available() {
            armv8::encrypt_block(round_keys, nr, &mut state);
            block.copy_from_slice(&state);
            state.zeroize();
            return Ok(());
        }
    }

    encrypt_block_scalar(round_keys, nr, &mut state);
    block.copy_from_slice(&state);
    state.zeroize();
    Ok(())
}

/// Type-level constants for AES-128
pub enum Aes128Algorithm {}

impl CipherAlgorithm for Aes128Algorithm {
    const KEY_SIZE: usize = AES128_KEY_SIZE;
    const BLOCK_SIZE: usize = AES_BLOCK_SIZE;

    fn name() -> &'static str {
        "AES-128"
    }
}

impl AesVariant for Aes128Algorithm {
    const ROUNDS: usize = 10;
}

/// AES-128 block cipher
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes128 {
    round_keys: KeySchedule<176>, // 11 round keys x 16 bytes
}

impl Aes128 {
    const NK: usize = 4;
    const NR: usize = Aes128Algorithm::ROUNDS;
}

impl BlockCipher for Aes128 {
    type Algorithm = Aes128Algorithm;
    type Key = SecretBytes<16>;

    fn new(key: &Self::Key) -> Self {
        Aes128 {
            round_keys: KeySchedule::expand(key.as_ref(), Self::NK),
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        cipher_in_place(self.round_keys.as_bytes(), Self::NR, block)
    }

    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key {
        SecretBytes::random(rng)
    }
}

/// Type-level constants for AES-192
pub enum Aes192Algorithm {}

impl CipherAlgorithm for Aes192Algorithm {
    const KEY_SIZE: usize = AES192_KEY_SIZE;
    const BLOCK_SIZE: usize = AES_BLOCK_SIZE;

    fn name() -> &'static str {
        "AES-192"
    }
}

impl AesVariant for Aes192Algorithm {
    const ROUNDS: usize = 12;
}

/// AES-192 block cipher
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes192 {
    round_keys: KeySchedule<208>, // 13 round keys x 16 bytes
}

impl Aes192 {
    const NK: usize = 6;
    const NR: usize = Aes192Algorithm::ROUNDS;
}

impl BlockCipher for Aes192 {
    type Algorithm = Aes192Algorithm;
    type Key = SecretBytes<24>;

    fn new(key: &Self::Key) -> Self {
        Aes192 {
            round_keys: KeySchedule::expand(key.as_ref(), Self::NK),
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        cipher_in_place(self.round_keys.as_bytes(), Self::NR, block)
    }

    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key {
        SecretBytes::random(rng)
    }
}

/// Type-level constants for AES-256
pub enum Aes256Algorithm {}

impl CipherAlgorithm for Aes256Algorithm {
    const KEY_SIZE: usize = AES256_KEY_SIZE;
    const BLOCK_SIZE: usize = AES_BLOCK_SIZE;

    fn name() -> &'static str {
        "AES-256"
    }
}

impl AesVariant for Aes256Algorithm {
    const ROUNDS: usize = 14;
}

/// AES-256 block cipher
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes256 {
    round_keys: KeySchedule<240>, // 15 round keys x 16 bytes
}

impl Aes256 {
    const NK: usize = 8;
    const NR: usize = Aes256Algorithm::ROUNDS;
}

impl BlockCipher for Aes256 {
    type Algorithm = Aes256Algorithm;
    type Key = SecretBytes<32>;

    fn new(key: &Self::Key) -> Self {
        Aes256 {
            round_keys: KeySchedule::expand(key.as_ref(), Self::NK),
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        cipher_in_place(self.round_keys.as_bytes(), Self::NR, block)
    }

    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key {
        SecretBytes::random(rng)
    }
}

/// Type-level constants for AES-512
#[cfg(feature = "aes512")]
pub enum Aes512Algorithm {}

#[cfg(feature = "aes512")]
impl CipherAlgorithm for Aes512Algorithm {
    const KEY_SIZE: usize = AES512_KEY_SIZE;
    const BLOCK_SIZE: usize = AES_BLOCK_SIZE;

    fn name() -> &'static str {
        "AES-512"
    }
}

#[cfg(feature = "aes512")]
impl AesVariant for Aes512Algorithm {
    const ROUNDS: usize = 22;
}

/// AES-512 block cipher (non-standard)
///
/// A 512-bit key width obtained by continuing the Rijndael key-schedule
/// pattern: Nk = 16 words and Nr = Nk + 6 = 22 rounds. No standard defines
/// this construction and its security margin is unanalyzed; the wider key
/// does not imply more security than AES-256. It interoperates with nothing
/// but itself.
#[cfg(feature = "aes512")]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Aes512 {
    round_keys: KeySchedule<368>, // 23 round keys x 16 bytes
}

#[cfg(feature = "aes512")]
impl Aes512 {
    const NK: usize = 16;
    const NR: usize = Aes512Algorithm::ROUNDS;
}

#[cfg(feature = "aes512")]
impl BlockCipher for Aes512 {
    type Algorithm = Aes512Algorithm;
    type Key = SecretBytes<64>;

    fn new(key: &Self::Key) -> Self {
        Aes512 {
            round_keys: KeySchedule::expand(key.as_ref(), Self::NK),
        }
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<()> {
        cipher_in_place(self.round_keys.as_bytes(), Self::NR, block)
    }

    fn generate_key<R: RngCore + CryptoRng>(rng: &mut R) -> Self::Key {
        SecretBytes::random(rng)
    }
}
