//! Authenticated encryption with associated data

pub mod gcm;

pub use gcm::Gcm;
