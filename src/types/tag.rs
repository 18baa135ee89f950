//! Type-safe authentication tag with size guarantees

use core::fmt;
use core::ops::Deref;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{validate, Result};

/// A cryptographic authentication tag with fixed size
#[derive(Clone, Zeroize)]
pub struct Tag<const N: usize> {
    data: [u8; N],
}

impl<const N: usize> Tag<N> {
    /// Create a new tag from an existing array
    pub fn new(data: [u8; N]) -> Self {
        Self { data }
    }

    /// Create from a slice, if it has the correct length
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        validate::length("Tag::from_slice", slice.len(), N)?;

        let mut data = [0u8; N];
        data.copy_from_slice(slice);

        Ok(Self { data })
    }

    /// Create a zeroed tag
    pub fn zeroed() -> Self {
        Self { data: [0u8; N] }
    }

    /// Get the length of the tag in bytes
    pub fn len(&self) -> usize {
        N
    }

    /// Check if the tag is empty
    pub fn is_empty(&self) -> bool {
        N == 0
    }

    /// Compare two tags in constant time
    pub fn ct_eq(&self, other: &Self) -> bool {
        self.data.ct_eq(&other.data).into()
    }
}

impl<const N: usize> AsRef<[u8]> for Tag<N> {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl<const N: usize> AsMut<[u8]> for Tag<N> {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl<const N: usize> Deref for Tag<N> {
    type Target = [u8; N];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<const N: usize> PartialEq for Tag<N> {
    fn eq(&self, other: &Self) -> bool {
        // Deliberately non-constant-time: tag values are public once emitted.
        // Verification of a received tag goes through `ct_eq`.
        self.data == other.data
    }
}

impl<const N: usize> Eq for Tag<N> {}

impl<const N: usize> fmt::Debug for Tag<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag<{}>(", N)?;
        for byte in &self.data {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}
