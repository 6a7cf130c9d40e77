//! Transaction wire codec
//!
//! Bitcoin-style transaction encoding, consumed here by the merged-mining
//! coinbase commitment and by name records, which own the out point of
//! their creating spend. Signature production and script evaluation live
//! elsewhere; this layer is the byte-exact structure only.

use crate::crypto::{double_sha256, ShaHash, HASH_SIZE};
use crate::wire::encoding::{
    read_i32_le, read_i64_le, read_sha_hash, read_u32_le, read_var_bytes, read_var_int,
    var_int_serialize_size, write_i32_le, write_i64_le, write_sha_hash, write_u32_le,
    write_var_bytes, write_var_int, WireError,
};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

// =============================================================================
// Constants
// =============================================================================

/// Current transaction version
pub const TX_VERSION: i32 = 1;

/// Maximum serialized size of a coinbase transaction embedded in an
/// AuxPow header
pub const MAX_COINBASE_TX_SIZE: usize = 100_000;

/// Serialization layout version for out points embedded in name records
pub const OUT_POINT_SERIALIZE_VERSION: u32 = 1;

/// A serialized input is at least 41 bytes (36-byte out point, one-byte
/// script length, 4-byte sequence), bounding what an input count prefix
/// may declare.
const MAX_TX_INPUTS: u64 = (MAX_COINBASE_TX_SIZE / 41) as u64;

/// A serialized output is at least 9 bytes (8-byte value, one-byte
/// script length)
const MAX_TX_OUTPUTS: u64 = (MAX_COINBASE_TX_SIZE / 9) as u64;

/// Maximum script bytes accepted in a single input or output
const MAX_SCRIPT_SIZE: u64 = MAX_COINBASE_TX_SIZE as u64;

// =============================================================================
// Out Point
// =============================================================================

/// Reference to an output of a previous transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct OutPoint {
    /// Identifier of the transaction holding the output
    pub hash: ShaHash,
    /// Index of the output within that transaction
    pub index: u32,
}

impl OutPoint {
    /// Create an out point referencing output `index` of transaction `hash`
    pub fn new(hash: ShaHash, index: u32) -> Self {
        Self { hash, index }
    }

    /// The null out point spent by coinbase inputs
    pub fn null() -> Self {
        Self {
            hash: ShaHash::default(),
            index: u32::MAX,
        }
    }

    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_sha_hash(w, &self.hash)?;
        write_u32_le(w, self.index)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let hash = read_sha_hash(r)?;
        let index = read_u32_le(r)?;
        Ok(Self { hash, index })
    }

    /// Encoded length in bytes; out points are fixed width
    pub const fn serialize_size() -> usize {
        HASH_SIZE + 4
    }
}

// =============================================================================
// Transaction Input
// =============================================================================

/// Transaction input spending a previous output
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxIn {
    /// Output being spent
    pub previous_out_point: OutPoint,
    /// Script satisfying the spent output's conditions; free-form data in
    /// a coinbase input
    pub signature_script: Vec<u8>,
    /// Sequence number
    pub sequence: u32,
}

impl TxIn {
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        self.previous_out_point.serialize(w)?;
        write_var_bytes(w, &self.signature_script)?;
        write_u32_le(w, self.sequence)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let previous_out_point = OutPoint::deserialize(r)?;
        let signature_script = read_var_bytes(r, MAX_SCRIPT_SIZE, "signature script")?;
        let sequence = read_u32_le(r)?;
        Ok(Self {
            previous_out_point,
            signature_script,
            sequence,
        })
    }

    pub fn serialize_size(&self) -> usize {
        OutPoint::serialize_size()
            + var_int_serialize_size(self.signature_script.len() as u64)
            + self.signature_script.len()
            + 4
    }
}

// =============================================================================
// Transaction Output
// =============================================================================

/// Transaction output assigning value to a script
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TxOut {
    /// Amount in base units
    pub value: i64,
    /// Conditions for spending this output
    pub pk_script: Vec<u8>,
}

impl TxOut {
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_i64_le(w, self.value)?;
        write_var_bytes(w, &self.pk_script)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let value = read_i64_le(r)?;
        let pk_script = read_var_bytes(r, MAX_SCRIPT_SIZE, "pk script")?;
        Ok(Self { value, pk_script })
    }

    pub fn serialize_size(&self) -> usize {
        8 + var_int_serialize_size(self.pk_script.len() as u64) + self.pk_script.len()
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A transaction in wire form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction format version
    pub version: i32,
    /// Inputs spending previous outputs
    pub inputs: Vec<TxIn>,
    /// Newly created outputs
    pub outputs: Vec<TxOut>,
    /// Earliest block height or timestamp at which the transaction may be
    /// mined; zero disables the lock
    pub lock_time: u32,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }
}

impl Transaction {
    /// Create a coinbase transaction: a single input spending the null out
    /// point with free-form script data, paying `value` to `pk_script`
    pub fn coinbase(signature_script: Vec<u8>, value: i64, pk_script: Vec<u8>) -> Self {
        Self {
            version: TX_VERSION,
            inputs: vec![TxIn {
                previous_out_point: OutPoint::null(),
                signature_script,
                sequence: u32::MAX,
            }],
            outputs: vec![TxOut { value, pk_script }],
            lock_time: 0,
        }
    }

    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_i32_le(w, self.version)?;

        write_var_int(w, self.inputs.len() as u64)?;
        for input in &self.inputs {
            input.serialize(w)?;
        }

        write_var_int(w, self.outputs.len() as u64)?;
        for output in &self.outputs {
            output.serialize(w)?;
        }

        write_u32_le(w, self.lock_time)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let version = read_i32_le(r)?;

        let input_count = read_var_int(r)?;
        if input_count > MAX_TX_INPUTS {
            return Err(WireError::TooLong {
                element: "transaction inputs",
                length: input_count,
                max: MAX_TX_INPUTS,
            });
        }
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            inputs.push(TxIn::deserialize(r)?);
        }

        let output_count = read_var_int(r)?;
        if output_count > MAX_TX_OUTPUTS {
            return Err(WireError::TooLong {
                element: "transaction outputs",
                length: output_count,
                max: MAX_TX_OUTPUTS,
            });
        }
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(TxOut::deserialize(r)?);
        }

        let lock_time = read_u32_le(r)?;
        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    pub fn serialize_size(&self) -> usize {
        let mut n = 4 + 4;
        n += var_int_serialize_size(self.inputs.len() as u64);
        n += self.inputs.iter().map(TxIn::serialize_size).sum::<usize>();
        n += var_int_serialize_size(self.outputs.len() as u64);
        n += self.outputs.iter().map(TxOut::serialize_size).sum::<usize>();
        n
    }

    /// Transaction identifier: double SHA-256 of the exact serialization
    pub fn tx_sha(&self) -> ShaHash {
        let mut buf = Vec::with_capacity(self.serialize_size());
        self.serialize(&mut buf)
            .expect("writing to a Vec never fails");
        ShaHash::from(double_sha256(&buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_tx() -> Transaction {
        Transaction {
            version: TX_VERSION,
            inputs: vec![TxIn {
                previous_out_point: OutPoint::new(ShaHash::new([0x11; 32]), 3),
                signature_script: vec![0x51, 0x52],
                sequence: u32::MAX,
            }],
            outputs: vec![
                TxOut {
                    value: 50_000_000,
                    pk_script: vec![0x76, 0xa9, 0x14],
                },
                TxOut {
                    value: 0,
                    pk_script: Vec::new(),
                },
            ],
            lock_time: 0,
        }
    }

    #[test]
    fn test_out_point_round_trip() {
        let op = OutPoint::new(ShaHash::new([0xaa; 32]), 7);
        let mut buf = Vec::new();
        op.serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), OutPoint::serialize_size());

        let decoded = OutPoint::deserialize(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, op);
    }

    #[test]
    fn test_transaction_round_trip() {
        let tx = sample_tx();
        let mut buf = Vec::new();
        tx.serialize(&mut buf).unwrap();
        assert_eq!(buf.len(), tx.serialize_size());

        let decoded = Transaction::deserialize(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn test_coinbase_shape() {
        let tx = Transaction::coinbase(vec![0x04, 0xff], 50, vec![0xac]);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].previous_out_point, OutPoint::null());
        assert_eq!(tx.inputs[0].previous_out_point.index, u32::MAX);
        assert_eq!(tx.outputs[0].value, 50);
    }

    #[test]
    fn test_tx_sha_is_stable() {
        let tx = sample_tx();
        assert_eq!(tx.tx_sha(), tx.tx_sha());

        // Any field change moves the identifier
        let mut other = tx.clone();
        other.lock_time = 1;
        assert_ne!(other.tx_sha(), tx.tx_sha());
    }

    #[test]
    fn test_oversized_script_rejected() {
        // Out point, then a script length prefix far over the cap
        let mut buf = Vec::new();
        OutPoint::null().serialize(&mut buf).unwrap();
        write_var_int(&mut buf, MAX_SCRIPT_SIZE + 1).unwrap();

        let err = TxIn::deserialize(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(
            err,
            WireError::TooLong {
                element: "signature script",
                ..
            }
        ));
    }

    #[test]
    fn test_oversized_input_count_rejected() {
        let mut buf = Vec::new();
        write_i32_le(&mut buf, TX_VERSION).unwrap();
        write_var_int(&mut buf, MAX_TX_INPUTS + 1).unwrap();

        let err = Transaction::deserialize(&mut Cursor::new(&buf)).unwrap_err();
        assert!(matches!(
            err,
            WireError::TooLong {
                element: "transaction inputs",
                ..
            }
        ));
    }
}
