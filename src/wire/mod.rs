//! Consensus-critical wire format
//!
//! Byte-exact encoding of block headers, merged-mining proofs, merkle
//! branches, and transactions. All multi-byte integers are little-endian;
//! decode reads exactly the declared bytes and bounds every
//! variable-length field before allocating.

pub mod auxpow;
pub mod block_header;
pub mod encoding;
pub mod merkle_branch;
pub mod transaction;

pub use auxpow::{AuxPowHeader, MAX_AUX_POW_SIZE};
pub use block_header::{
    BlockHeader, PureBlockHeader, AUX_POW_FLAG, BLOCK_VERSION, CHAIN_ID_START,
    MAX_BLOCK_HEADER_PAYLOAD, MAX_PURE_HEADER_PAYLOAD, PURE_HEADER_LEN,
};
pub use encoding::WireError;
pub use merkle_branch::{MerkleBranch, MAX_BRANCH_HASHES, MAX_BRANCH_SIZE};
pub use transaction::{
    OutPoint, Transaction, TxIn, TxOut, MAX_COINBASE_TX_SIZE, OUT_POINT_SERIALIZE_VERSION,
    TX_VERSION,
};
