//! Block cipher modes of operation
//!
//! Only the counter mode GCM is built on. Each GCM invocation drives its own
//! counter sequence; there is no chaining state between calls.

pub mod ctr;

pub use ctr::Ctr32;
