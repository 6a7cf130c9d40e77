//! Merkle branch inclusion proofs
//!
//! An ordered list of sibling hashes plus a direction mask is enough to
//! recompute a merkle root from a single leaf. Merged-mining proofs carry
//! two of these: one into the parent block's transaction tree, and one
//! into the chain-merkle tree committed by the parent coinbase.

use crate::crypto::{double_sha256, ShaHash, HASH_SIZE};
use crate::wire::encoding::{
    read_sha_hash, read_u32_le, read_var_int, var_int_serialize_size, write_sha_hash,
    write_u32_le, write_var_int, WireError,
};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

// =============================================================================
// Constants
// =============================================================================

/// Largest branch a well-formed proof needs (a tree of 2^32 leaves)
pub const MAX_BRANCH_HASHES: usize = 32;

/// Upper bound on a serialized branch within that limit
pub const MAX_BRANCH_SIZE: usize = 4 + MAX_BRANCH_HASHES * HASH_SIZE;

/// Hard cap on the decoded hash count; a count prefix above this is
/// rejected before anything is allocated
const MAX_DECODE_HASHES: u64 = 0x0200_0000;

// =============================================================================
// Merkle Branch
// =============================================================================

/// Sibling hashes and the direction mask needed to recompute a merkle
/// root from one leaf
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleBranch {
    /// Sibling hashes, ordered from the bottom of the tree to the top
    pub hashes: Vec<ShaHash>,
    /// Bit `i` selects the concatenation order when consuming hash `i`
    pub side_mask: u32,
}

impl MerkleBranch {
    pub fn new(hashes: Vec<ShaHash>, side_mask: u32) -> Self {
        Self { hashes, side_mask }
    }

    /// Number of sibling hashes in the branch
    pub fn size(&self) -> usize {
        self.hashes.len()
    }

    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_var_int(w, self.hashes.len() as u64)?;
        for hash in &self.hashes {
            write_sha_hash(w, hash)?;
        }
        write_u32_le(w, self.side_mask)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let count = read_var_int(r)?;
        if count > MAX_DECODE_HASHES {
            return Err(WireError::TooLong {
                element: "merkle branch hashes",
                length: count,
                max: MAX_DECODE_HASHES,
            });
        }

        let mut hashes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            hashes.push(read_sha_hash(r)?);
        }

        let side_mask = read_u32_le(r)?;
        Ok(Self { hashes, side_mask })
    }

    /// Exact encoded length: count prefix, the hashes, the 4-byte mask
    pub fn serialize_size(&self) -> usize {
        var_int_serialize_size(self.hashes.len() as u64) + HASH_SIZE * self.hashes.len() + 4
    }

    /// Recompute the merkle root this branch proves `leaf` under.
    ///
    /// Consumes the mask low-bit-first: a set bit hashes the sibling on the
    /// left of the accumulator, a clear bit on the right, double SHA-256 at
    /// each step. An empty branch returns the leaf itself.
    pub fn determine_root(&self, leaf: &ShaHash) -> ShaHash {
        log::trace!(
            "determining root from {} siblings (mask {:#010x})",
            self.hashes.len(),
            self.side_mask
        );

        let mut mask = self.side_mask;
        let mut acc = *leaf;
        let mut buf = [0u8; HASH_SIZE * 2];

        for sibling in &self.hashes {
            if mask & 1 != 0 {
                buf[..HASH_SIZE].copy_from_slice(sibling.as_bytes());
                buf[HASH_SIZE..].copy_from_slice(acc.as_bytes());
            } else {
                buf[..HASH_SIZE].copy_from_slice(acc.as_bytes());
                buf[HASH_SIZE..].copy_from_slice(sibling.as_bytes());
            }
            acc = ShaHash::from(double_sha256(&buf));
            mask >>= 1;
        }

        acc
    }

    /// Whether this branch connects `leaf` to `root`
    pub fn has_root(&self, leaf: &ShaHash, root: &ShaHash) -> bool {
        self.determine_root(leaf) == *root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PROOF_ROOT: &str = "bf0ca48d50405f62cb40fa67c6f9fd9309e9a5fcb2ad05d3976ecb28839b4474";

    fn hash(s: &str) -> ShaHash {
        s.parse().unwrap()
    }

    fn branch(hashes: &[&str], side_mask: u32) -> MerkleBranch {
        MerkleBranch::new(hashes.iter().map(|s| hash(s)).collect(), side_mask)
    }

    #[test]
    fn test_known_serialization() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mb = branch(
            &[
                "b98db090398ebc4342951f9ba89b3e0110bdc757714b80c695663c9060113639",
                "3e0a60195218f27df0edc1d5b008568b2754f8a709eb80e3c1412bdfcb3b7e21",
            ],
            0,
        );
        assert_eq!(mb.size(), 2);

        let mut buf = Vec::new();
        mb.serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), mb.serialize_size());
        assert_eq!(
            hex::encode(&buf),
            "0239361160903c6695c6804b7157c7bd10013e9ba89b1f954243bc8e3990b08db9\
             217e3bcbdf2b41c1e380eb09a7f854278b5608b0d5c1edf07df2185219600a3e\
             00000000"
        );

        let decoded = MerkleBranch::deserialize(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, mb);

        let mut again = Vec::new();
        decoded.serialize(&mut again).unwrap();
        assert_eq!(again, buf);
    }

    #[test]
    fn test_determine_root_known_proofs() {
        // Three distinct (branch, mask, leaf) triples from the same tree all
        // reconstruct the same root; that is correct, not a collision.
        let mb = branch(
            &[
                "b98db090398ebc4342951f9ba89b3e0110bdc757714b80c695663c9060113639",
                "3e0a60195218f27df0edc1d5b008568b2754f8a709eb80e3c1412bdfcb3b7e21",
            ],
            0,
        );
        let leaf = hash("d8f244c159278ea8cfffcbe1c463edef33d92d11d36ac3c62efd3eb7ff3a5dbf");
        assert_eq!(mb.determine_root(&leaf).to_string(), PROOF_ROOT);
        assert!(mb.has_root(&leaf, &hash(PROOF_ROOT)));

        let mb = branch(
            &[
                "d8f244c159278ea8cfffcbe1c463edef33d92d11d36ac3c62efd3eb7ff3a5dbf",
                "3e0a60195218f27df0edc1d5b008568b2754f8a709eb80e3c1412bdfcb3b7e21",
            ],
            1,
        );
        let leaf = hash("b98db090398ebc4342951f9ba89b3e0110bdc757714b80c695663c9060113639");
        assert_eq!(mb.determine_root(&leaf).to_string(), PROOF_ROOT);

        let mb = branch(
            &[
                "d377b92dd7af8f1b25b2ac96f5ac68d0d8ae0e15fc370f89ea0fa36c3d753266",
                "f01b8b33d4737f715303d502cd8dda6b2ea4f9513c169d94b18b5f2fa1a367b7",
            ],
            2,
        );
        let leaf = hash("d377b92dd7af8f1b25b2ac96f5ac68d0d8ae0e15fc370f89ea0fa36c3d753266");
        assert_eq!(mb.determine_root(&leaf).to_string(), PROOF_ROOT);
    }

    #[test]
    fn test_mask_and_order_change_the_root() {
        let mb = branch(
            &[
                "b98db090398ebc4342951f9ba89b3e0110bdc757714b80c695663c9060113639",
                "3e0a60195218f27df0edc1d5b008568b2754f8a709eb80e3c1412bdfcb3b7e21",
            ],
            0,
        );
        let leaf = hash("d8f244c159278ea8cfffcbe1c463edef33d92d11d36ac3c62efd3eb7ff3a5dbf");
        let root = mb.determine_root(&leaf);

        let mut flipped = mb.clone();
        flipped.side_mask = 1;
        assert_ne!(flipped.determine_root(&leaf), root);

        let mut permuted = mb.clone();
        permuted.hashes.swap(0, 1);
        assert_ne!(permuted.determine_root(&leaf), root);
    }

    #[test]
    fn test_empty_branch_root_is_leaf() {
        let mb = MerkleBranch::default();
        let leaf = ShaHash::new([0x42; 32]);
        assert_eq!(mb.determine_root(&leaf), leaf);
    }

    #[test]
    fn test_oversized_count_rejected_before_allocation() {
        // 0xfe marker declaring 0x02000001 hashes, no hash data at all:
        // the cap must trip before the decoder tries to read them
        let buf = [0xfeu8, 0x01, 0x00, 0x00, 0x02];
        let err = MerkleBranch::deserialize(&mut Cursor::new(&buf[..])).unwrap_err();
        match err {
            WireError::TooLong {
                element, length, ..
            } => {
                assert_eq!(element, "merkle branch hashes");
                assert_eq!(length, 0x0200_0001);
            }
            other => panic!("expected TooLong, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_size_tracks_var_int_width() {
        let mb = MerkleBranch::default();
        assert_eq!(mb.serialize_size(), 1 + 4);

        let mb = MerkleBranch::new(vec![ShaHash::default(); 32], 0);
        assert_eq!(mb.serialize_size(), 1 + 32 * HASH_SIZE + 4);
        assert_eq!(mb.serialize_size(), MAX_BRANCH_SIZE + 1);

        // Past 0xfc hashes the count prefix widens to three bytes
        let mb = MerkleBranch::new(vec![ShaHash::default(); 253], 0);
        assert_eq!(mb.serialize_size(), 3 + 253 * HASH_SIZE + 4);

        let mut buf = Vec::new();
        mb.serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), mb.serialize_size());
    }
}
