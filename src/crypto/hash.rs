//! Cryptographic hashing utilities for the wire format
//!
//! Provides SHA-256 based hashing functions and the fixed 32-byte digest
//! type used for block identifiers, transaction identifiers, and merkle
//! proof reconstruction.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of a digest in bytes
pub const HASH_SIZE: usize = 32;

/// Errors when constructing a digest from external input
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Invalid digest length: {0} bytes (expected {HASH_SIZE})")]
    InvalidLength(usize),
    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes double SHA-256 hash (SHA-256 of SHA-256)
/// Used for block and transaction identifiers in Bitcoin-style blockchains
pub fn double_sha256(data: &[u8]) -> [u8; HASH_SIZE] {
    sha256(&sha256(data))
}

/// A 32-byte SHA-256 digest with value semantics.
///
/// Stored in internal byte order; displayed and parsed as byte-reversed
/// hex, the convention used by block explorers and RPC interfaces.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ShaHash([u8; HASH_SIZE]);

impl ShaHash {
    /// Wrap raw digest bytes in internal byte order
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Digest bytes in internal byte order
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Consume the digest, returning its bytes in internal byte order
    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Build a digest from a slice, failing unless it is exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, HashError> {
        if bytes.len() != HASH_SIZE {
            return Err(HashError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

impl From<[u8; HASH_SIZE]> for ShaHash {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ShaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

impl fmt::Debug for ShaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for ShaHash {
    type Err = HashError;

    /// Parse a digest from byte-reversed hex
    fn from_str(s: &str) -> Result<Self, HashError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != HASH_SIZE {
            return Err(HashError::InvalidLength(bytes.len()));
        }
        let mut arr = [0u8; HASH_SIZE];
        arr.copy_from_slice(&bytes);
        arr.reverse();
        Ok(Self(arr))
    }
}
