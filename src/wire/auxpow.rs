//! Merged-mining proof of work
//!
//! An AuxPow header proves that a block on this chain was produced as a
//! byproduct of mining a parent-chain block: the parent coinbase commits
//! to a chain-merkle root covering every merged chain, and the parent
//! header carries the proof of work being reused. Two merkle branches tie
//! the pieces together, one into the parent block's transaction tree and
//! one into the chain-merkle tree. Checking the reconstructed roots and
//! the parent proof of work is the validation layer's job; this module is
//! the byte-exact structure.

use crate::crypto::{ShaHash, HASH_SIZE};
use crate::wire::block_header::{PureBlockHeader, PURE_HEADER_LEN};
use crate::wire::encoding::{read_sha_hash, write_sha_hash, WireError};
use crate::wire::merkle_branch::{MerkleBranch, MAX_BRANCH_SIZE};
use crate::wire::transaction::{Transaction, MAX_COINBASE_TX_SIZE};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Upper bound on a serialized AuxPow header; callers reject anything
/// claiming to be larger before allocating
pub const MAX_AUX_POW_SIZE: usize =
    MAX_COINBASE_TX_SIZE + HASH_SIZE + MAX_BRANCH_SIZE * 2 + PURE_HEADER_LEN;

/// Merged-mining proof attached to a block header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxPowHeader {
    /// Coinbase transaction of the parent block, carrying the chain-merkle
    /// commitment in its script
    pub coinbase_tx: Transaction,

    /// Hash of the parent block. Legacy field: round-tripped for wire
    /// compatibility, never consulted when reconstructing roots.
    pub parent_block_hash: ShaHash,

    /// Proves the coinbase transaction is in the parent block's
    /// transaction tree
    pub coinbase_branch: MerkleBranch,

    /// Proves this chain's block hash sits under the chain-merkle root
    /// committed by the coinbase
    pub blockchain_branch: MerkleBranch,

    /// Core header of the parent block. Only the 80-byte core is carried;
    /// a parent's own AuxPow trailer is never included.
    pub parent_block_header: PureBlockHeader,
}

impl AuxPowHeader {
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        self.coinbase_tx.serialize(w)?;
        write_sha_hash(w, &self.parent_block_hash)?;
        self.coinbase_branch.serialize(w)?;
        self.blockchain_branch.serialize(w)?;
        self.parent_block_header.serialize(w)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let coinbase_tx = Transaction::deserialize(r)?;
        let parent_block_hash = read_sha_hash(r)?;
        let coinbase_branch = MerkleBranch::deserialize(r)?;
        let blockchain_branch = MerkleBranch::deserialize(r)?;
        let parent_block_header = PureBlockHeader::deserialize(r)?;
        Ok(Self {
            coinbase_tx,
            parent_block_hash,
            coinbase_branch,
            blockchain_branch,
            parent_block_header,
        })
    }

    pub fn serialize_size(&self) -> usize {
        HASH_SIZE
            + PURE_HEADER_LEN
            + self.coinbase_tx.serialize_size()
            + self.coinbase_branch.serialize_size()
            + self.blockchain_branch.serialize_size()
    }
}
