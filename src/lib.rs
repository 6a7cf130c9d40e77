//! Namechain-Wire: consensus-critical wire format for a merge-mined name-chain
//!
//! This crate provides the byte-exact binary encoding shared with peer nodes:
//! - 80-byte block headers with a bit-packed version field (block format
//!   version, AuxPow flag, chain ID)
//! - Merged-mining AuxPow proofs reusing a parent chain's proof of work
//! - Merkle branch inclusion proofs with mask-driven root reconstruction
//! - Bitcoin-style transaction and out point encoding
//! - Name records with height-based expiration
//!
//! # Example
//!
//! ```rust
//! use namechain_wire::{BlockHeader, ShaHash};
//!
//! // Build a header for the next block
//! let prev = ShaHash::default();
//! let merkle_root = ShaHash::default();
//! let header = BlockHeader::new(prev, merkle_root, 0x1d00ffff, 0);
//!
//! // Block identity covers exactly the 80 core bytes
//! println!("block sha: {}", header.block_sha());
//!
//! // Round trip through the wire encoding
//! let mut bytes = Vec::new();
//! header.serialize(&mut bytes).unwrap();
//! assert_eq!(bytes.len(), 80);
//! ```

pub mod crypto;
pub mod names;
pub mod wire;

// Re-export commonly used types
pub use crypto::{double_sha256, sha256, HashError, ShaHash, HASH_SIZE};
pub use names::{
    expiration_depth, is_name_expired, NameInfo, MAX_ADDR_LENGTH, MAX_NAME_LENGTH,
    MAX_NAME_VALUE_LENGTH, MEMPOOL_HEIGHT, MIN_FIRST_UPDATE_DEPTH, NAME_LOCKED_AMOUNT,
};
pub use wire::{
    AuxPowHeader, BlockHeader, MerkleBranch, OutPoint, PureBlockHeader, Transaction, TxIn, TxOut,
    WireError, BLOCK_VERSION, MAX_AUX_POW_SIZE, MAX_BRANCH_HASHES, MAX_BRANCH_SIZE,
    MAX_COINBASE_TX_SIZE, PURE_HEADER_LEN,
};
