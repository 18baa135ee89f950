//! Memory barriers for secret-dependent computation
//!
//! Key material itself lives in the types that own it (`SecretBytes` keys,
//! the cipher's internal key schedule), each zeroized on drop; this module
//! only carries the fences placed around the work done on it.

/// Memory barrier utilities
pub mod barrier {
    use core::sync::atomic::{compiler_fence, Ordering};

    /// Sequentially-consistent compiler fence
    ///
    /// Prevents the compiler from reordering memory operations across the
    /// fence. Used around S-box application and tag comparison so that
    /// secret-dependent work is not hoisted or merged in ways that reintroduce
    /// data-dependent timing.
    #[inline(always)]
    pub fn compiler_fence_seq_cst() {
        compiler_fence(Ordering::SeqCst);
    }
}
