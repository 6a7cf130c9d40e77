//! Cryptographic utilities for the wire format
//!
//! This module provides:
//! - SHA-256 and double SHA-256 hashing
//! - The fixed 32-byte digest type with byte-reversed hex display

pub mod hash;

pub use hash::{double_sha256, sha256, HashError, ShaHash, HASH_SIZE};
