//! Primitive wire codec helpers
//!
//! Little-endian fixed-width fields, compact variable-length integers, and
//! length-prefixed byte strings over `std::io` streams. Every
//! variable-length read takes an explicit maximum and an element tag so an
//! adversarial length prefix fails before any allocation happens.

use crate::crypto::{ShaHash, HASH_SIZE};
use std::io::{Read, Write};
use thiserror::Error;

/// Wire codec errors
#[derive(Error, Debug)]
pub enum WireError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{element}: length {length} exceeds maximum {max}")]
    TooLong {
        element: &'static str,
        length: u64,
        max: u64,
    },
    #[error("{element}: payload is not valid UTF-8")]
    InvalidString { element: &'static str },
    #[error("AuxPow flag is set but no AuxPow header is attached")]
    MissingAuxPow,
}

// =============================================================================
// Fixed-width fields
// =============================================================================

pub fn read_u8<R: Read>(r: &mut R) -> Result<u8, WireError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn read_u16_le<R: Read>(r: &mut R) -> Result<u16, WireError> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_u32_le<R: Read>(r: &mut R) -> Result<u32, WireError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn read_u64_le<R: Read>(r: &mut R) -> Result<u64, WireError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn read_i32_le<R: Read>(r: &mut R) -> Result<i32, WireError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub fn read_i64_le<R: Read>(r: &mut R) -> Result<i64, WireError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

pub fn write_u8<W: Write>(w: &mut W, v: u8) -> Result<(), WireError> {
    w.write_all(&[v])?;
    Ok(())
}

pub fn write_u16_le<W: Write>(w: &mut W, v: u16) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u32_le<W: Write>(w: &mut W, v: u32) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_u64_le<W: Write>(w: &mut W, v: u64) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i32_le<W: Write>(w: &mut W, v: i32) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub fn write_i64_le<W: Write>(w: &mut W, v: i64) -> Result<(), WireError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Read a 32-byte digest in internal byte order
pub fn read_sha_hash<R: Read>(r: &mut R) -> Result<ShaHash, WireError> {
    let mut buf = [0u8; HASH_SIZE];
    r.read_exact(&mut buf)?;
    Ok(ShaHash::new(buf))
}

/// Write a 32-byte digest in internal byte order
pub fn write_sha_hash<W: Write>(w: &mut W, hash: &ShaHash) -> Result<(), WireError> {
    w.write_all(hash.as_bytes())?;
    Ok(())
}

// =============================================================================
// Variable-length integers (CompactSize)
// =============================================================================

/// Read a compact variable-length integer.
///
/// One byte below 0xfd; otherwise a marker byte (0xfd/0xfe/0xff) followed
/// by a little-endian u16/u32/u64.
pub fn read_var_int<R: Read>(r: &mut R) -> Result<u64, WireError> {
    let marker = read_u8(r)?;
    let value = match marker {
        0xff => read_u64_le(r)?,
        0xfe => u64::from(read_u32_le(r)?),
        0xfd => u64::from(read_u16_le(r)?),
        n => u64::from(n),
    };
    Ok(value)
}

/// Write a compact variable-length integer
pub fn write_var_int<W: Write>(w: &mut W, n: u64) -> Result<(), WireError> {
    if n < 0xfd {
        write_u8(w, n as u8)
    } else if n <= 0xffff {
        write_u8(w, 0xfd)?;
        write_u16_le(w, n as u16)
    } else if n <= 0xffff_ffff {
        write_u8(w, 0xfe)?;
        write_u32_le(w, n as u32)
    } else {
        write_u8(w, 0xff)?;
        write_u64_le(w, n)
    }
}

/// Number of bytes `write_var_int` produces for the given value
pub fn var_int_serialize_size(n: u64) -> usize {
    if n < 0xfd {
        1
    } else if n <= 0xffff {
        3
    } else if n <= 0xffff_ffff {
        5
    } else {
        9
    }
}

// =============================================================================
// Variable-length byte strings
// =============================================================================

/// Read a length-prefixed byte string.
///
/// The declared length is checked against `max` before allocating;
/// `element` tags the failure so callers can tell which field overflowed.
pub fn read_var_bytes<R: Read>(
    r: &mut R,
    max: u64,
    element: &'static str,
) -> Result<Vec<u8>, WireError> {
    let length = read_var_int(r)?;
    if length > max {
        return Err(WireError::TooLong {
            element,
            length,
            max,
        });
    }

    let mut buf = vec![0u8; length as usize];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

/// Write a length-prefixed byte string
pub fn write_var_bytes<W: Write>(w: &mut W, bytes: &[u8]) -> Result<(), WireError> {
    write_var_int(w, bytes.len() as u64)?;
    w.write_all(bytes)?;
    Ok(())
}

/// Read a length-prefixed UTF-8 string, bounded like `read_var_bytes`
pub fn read_var_string<R: Read>(
    r: &mut R,
    max: u64,
    element: &'static str,
) -> Result<String, WireError> {
    let bytes = read_var_bytes(r, max, element)?;
    String::from_utf8(bytes).map_err(|_| WireError::InvalidString { element })
}

/// Write a length-prefixed UTF-8 string
pub fn write_var_string<W: Write>(w: &mut W, s: &str) -> Result<(), WireError> {
    write_var_bytes(w, s.as_bytes())
}
