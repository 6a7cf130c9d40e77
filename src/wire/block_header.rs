//! Block header wire format
//!
//! An 80-byte core header in fixed field order, optionally followed by a
//! merged-mining AuxPow trailer. The trailer's presence on the wire is
//! signalled by a bit inside the packed version field, never by a
//! separate marker.

use crate::crypto::{double_sha256, ShaHash, HASH_SIZE};
use crate::wire::auxpow::{AuxPowHeader, MAX_AUX_POW_SIZE};
use crate::wire::encoding::{
    read_i32_le, read_sha_hash, read_u32_le, write_i32_le, write_sha_hash, write_u32_le,
    WireError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

// =============================================================================
// Constants
// =============================================================================

/// Current latest supported block format version
pub const BLOCK_VERSION: i32 = 2;

/// Serialized length of the core header: Version 4 bytes + Timestamp
/// 4 bytes + Bits 4 bytes + Nonce 4 bytes + two 32-byte hashes
pub const PURE_HEADER_LEN: usize = 16 + HASH_SIZE * 2;

/// Upper bound on a serialized core header (fixed width, so equal to its
/// length)
pub const MAX_PURE_HEADER_PAYLOAD: usize = PURE_HEADER_LEN;

/// Upper bound on a serialized block header including its AuxPow trailer
pub const MAX_BLOCK_HEADER_PAYLOAD: usize = MAX_PURE_HEADER_PAYLOAD + MAX_AUX_POW_SIZE;

/// Version bit signalling that an AuxPow trailer follows the core header
pub const AUX_POW_FLAG: i32 = 1 << 8;

/// Chain IDs occupy the version bits from 2^16 up, packed by integer
/// division rather than shifting
pub const CHAIN_ID_START: i32 = 1 << 16;

// =============================================================================
// Core Header
// =============================================================================

/// The 80-byte core block header, without any AuxPow trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PureBlockHeader {
    /// Packed version of the block. Not the protocol version: bits 0-7
    /// carry the block format version, bit 8 the AuxPow flag, and the bits
    /// from 2^16 up the chain ID.
    pub version: i32,

    /// Hash of the previous block in the chain
    pub prev_block: ShaHash,

    /// Merkle root over all transactions in the block
    pub merkle_root: ShaHash,

    /// Time the block was created. Encoded as a uint32 of epoch seconds on
    /// the wire and therefore limited to 2106; values outside that range do
    /// not round trip.
    pub timestamp: DateTime<Utc>,

    /// Compact difficulty target for the block
    pub bits: u32,

    /// Nonce used to generate the block
    pub nonce: u32,
}

impl PureBlockHeader {
    /// Whether the version flag bit announces an AuxPow trailer
    pub fn has_aux_pow(&self) -> bool {
        self.version & AUX_POW_FLAG != 0
    }

    /// Set or clear the AuxPow flag bit, leaving every other version bit
    /// untouched
    pub fn set_aux_pow(&mut self, aux_pow: bool) {
        if aux_pow {
            self.version |= AUX_POW_FLAG;
        } else {
            self.version &= !AUX_POW_FLAG;
        }
    }

    /// Identifier of this chain within the merged-mining chain-merkle tree.
    ///
    /// Integer division, not a shift: negative versions must divide exactly
    /// as they do on the wire.
    pub fn chain_id(&self) -> u32 {
        (self.version / CHAIN_ID_START) as u32
    }

    /// Block format version carried in the low 8 bits
    pub fn block_version(&self) -> i32 {
        self.version & 0xFF
    }

    /// Block identifier: double SHA-256 of exactly the 80 serialized core
    /// bytes. An AuxPow trailer never contributes to block identity.
    pub fn block_sha(&self) -> ShaHash {
        let mut buf = Vec::with_capacity(PURE_HEADER_LEN);
        self.serialize(&mut buf)
            .expect("writing to a Vec never fails");
        ShaHash::from(double_sha256(&buf))
    }

    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_i32_le(w, self.version)?;
        write_sha_hash(w, &self.prev_block)?;
        write_sha_hash(w, &self.merkle_root)?;
        write_u32_le(w, self.timestamp.timestamp() as u32)?;
        write_u32_le(w, self.bits)?;
        write_u32_le(w, self.nonce)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let version = read_i32_le(r)?;
        let prev_block = read_sha_hash(r)?;
        let merkle_root = read_sha_hash(r)?;
        let seconds = read_u32_le(r)?;
        let bits = read_u32_le(r)?;
        let nonce = read_u32_le(r)?;

        let timestamp = DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default();
        Ok(Self {
            version,
            prev_block,
            merkle_root,
            timestamp,
            bits,
            nonce,
        })
    }

    /// Encoded length in bytes; the core header is fixed width
    pub const fn serialize_size() -> usize {
        PURE_HEADER_LEN
    }
}

// =============================================================================
// Block Header
// =============================================================================

/// A full block header: the core header plus, when the version flag bit is
/// set, a merged-mining AuxPow trailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Core 80-byte header
    pub header: PureBlockHeader,

    /// Merged-mining proof; on the wire iff the flag bit is set
    pub aux_pow: Option<AuxPowHeader>,
}

impl BlockHeader {
    /// Create a header for the next block using the provided previous block
    /// hash, merkle root, difficulty bits, and nonce. The timestamp is the
    /// current time limited to one-second precision since the wire format
    /// supports no better; the AuxPow flag starts clear.
    pub fn new(prev_block: ShaHash, merkle_root: ShaHash, bits: u32, nonce: u32) -> Self {
        let timestamp = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap_or_default();
        Self {
            header: PureBlockHeader {
                version: BLOCK_VERSION,
                prev_block,
                merkle_root,
                timestamp,
                bits,
                nonce,
            },
            aux_pow: None,
        }
    }

    /// Whether this header carries a merged-mining proof
    pub fn has_aux_pow(&self) -> bool {
        self.header.has_aux_pow()
    }

    /// Attach or remove the merged-mining proof, keeping the version flag
    /// bit in sync with the trailer
    pub fn set_aux_pow(&mut self, aux_pow: Option<AuxPowHeader>) {
        self.header.set_aux_pow(aux_pow.is_some());
        self.aux_pow = aux_pow;
    }

    /// Block identifier; covers the 80 core bytes only
    pub fn block_sha(&self) -> ShaHash {
        self.header.block_sha()
    }

    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        self.header.serialize(w)?;

        if self.header.has_aux_pow() {
            match &self.aux_pow {
                Some(aux_pow) => aux_pow.serialize(w)?,
                None => return Err(WireError::MissingAuxPow),
            }
        }

        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        // The core header comes first; only the flag bit just decoded from
        // it says whether a trailer follows.
        let header = PureBlockHeader::deserialize(r)?;

        let aux_pow = if header.has_aux_pow() {
            Some(AuxPowHeader::deserialize(r)?)
        } else {
            None
        };

        Ok(Self { header, aux_pow })
    }

    pub fn serialize_size(&self) -> usize {
        let mut n = PURE_HEADER_LEN;
        if self.header.has_aux_pow() {
            if let Some(aux_pow) = &self.aux_pow {
                n += aux_pow.serialize_size();
            }
        }
        n
    }
}
