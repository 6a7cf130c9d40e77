//! Name records
//!
//! The registered state of a single name: its key, current value, the
//! height of the last update, the out point of the creating or updating
//! spend, and the owner address script.

use crate::names::expiry::{is_name_expired, MAX_NAME_LENGTH, MAX_NAME_VALUE_LENGTH};
use crate::wire::encoding::{
    read_i64_le, read_var_bytes, read_var_string, var_int_serialize_size, write_i64_le,
    write_var_bytes, write_var_string, WireError,
};
use crate::wire::transaction::OutPoint;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Maximum address bytes accepted when decoding a record
pub const MAX_ADDR_LENGTH: usize = 4096;

/// State of one registered name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameInfo {
    /// The name being registered
    pub key: String,

    /// Current value held by the name
    pub value: String,

    /// Height of the last registration or renewal; `MEMPOOL_HEIGHT` while
    /// unconfirmed
    pub height: i64,

    /// Out point of the spend that created or last updated the record
    pub prev_out_point: OutPoint,

    /// Owner address script
    pub addr: Vec<u8>,
}

impl NameInfo {
    pub fn serialize<W: Write>(&self, w: &mut W) -> Result<(), WireError> {
        write_var_string(w, &self.key)?;
        write_var_string(w, &self.value)?;
        write_i64_le(w, self.height)?;
        self.prev_out_point.serialize(w)?;
        write_var_bytes(w, &self.addr)?;
        Ok(())
    }

    pub fn deserialize<R: Read>(r: &mut R) -> Result<Self, WireError> {
        let key = read_var_string(r, MAX_NAME_LENGTH as u64, "key")?;
        let value = read_var_string(r, MAX_NAME_VALUE_LENGTH as u64, "value")?;
        let height = read_i64_le(r)?;
        let prev_out_point = OutPoint::deserialize(r)?;
        let addr = read_var_bytes(r, MAX_ADDR_LENGTH as u64, "addr")?;
        Ok(Self {
            key,
            value,
            height,
            prev_out_point,
            addr,
        })
    }

    pub fn serialize_size(&self) -> usize {
        var_int_serialize_size(self.key.len() as u64)
            + self.key.len()
            + var_int_serialize_size(self.value.len() as u64)
            + self.value.len()
            + 8
            + OutPoint::serialize_size()
            + var_int_serialize_size(self.addr.len() as u64)
            + self.addr.len()
    }

    /// Whether this record has expired at the given chain height
    pub fn is_expired(&self, height: i64) -> bool {
        is_name_expired(self.height, height)
    }
}
