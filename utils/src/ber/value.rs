use std::convert::TryFrom;

use berdissect_api::error::{Error, ErrorKind, Result};

use super::{Cursor, Oid};

/// Widest INTEGER the 64-bit decoders accept unless the call site says otherwise
pub const DEFAULT_MAX_INT_LEN: usize = 8;

/// BIT STRING contents
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BitString<'a> {
    /// Unused bits in the last octet of `data`, 0..=7
    pub unused_bits: u8,
    pub data: &'a [u8],
}

impl<'a> BitString<'a> {
    /// Number of meaningful bits
    pub fn bit_len(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.unused_bits as usize)
    }

    /// Bit `n`, counting from the most significant bit of the first octet
    pub fn is_set(&self, n: usize) -> bool {
        n < self.bit_len() && self.data[n / 8] & (0x80 >> (n % 8)) != 0
    }
}

/// Unsigned big-endian INTEGER of at most `DEFAULT_MAX_INT_LEN` octets
pub fn decode_uint_value(cur: &mut Cursor<'_>, len: usize) -> Result<u64> {
    decode_uint_value_limited(cur, len, DEFAULT_MAX_INT_LEN)
}

/// Unsigned big-endian INTEGER of at most `limit` octets
///
/// A 64-bit counter with its top bit set is encoded in nine octets, the first
/// one zero: such call sites pass a limit of 9. The value must still fit in
/// 64 bits.
pub fn decode_uint_value_limited(cur: &mut Cursor<'_>, len: usize, limit: usize) -> Result<u64> {
    let start = cur.offset();
    if len > limit {
        return Err(Error::new(ErrorKind::WrongLengthForType, start));
    }
    let bytes = cur.read(len)?;
    let mut value: u128 = 0;
    for &b in bytes {
        value = match value.checked_mul(256) {
            Some(v) => v | b as u128,
            None => return Err(Error::new(ErrorKind::WrongLengthForType, start)),
        };
    }
    u64::try_from(value).map_err(|_| Error::new(ErrorKind::WrongLengthForType, start))
}

/// Two's complement big-endian INTEGER of at most `DEFAULT_MAX_INT_LEN` octets
pub fn decode_int_value(cur: &mut Cursor<'_>, len: usize) -> Result<i64> {
    decode_int_value_limited(cur, len, DEFAULT_MAX_INT_LEN)
}

/// Two's complement big-endian INTEGER of at most `limit` octets
///
/// Octets beyond eight are accepted only as redundant sign extension.
pub fn decode_int_value_limited(cur: &mut Cursor<'_>, len: usize, limit: usize) -> Result<i64> {
    let start = cur.offset();
    if len > limit {
        return Err(Error::new(ErrorKind::WrongLengthForType, start));
    }
    let bytes = cur.read(len)?;
    let mut value: i128 = match bytes.first() {
        Some(b) if b & 0x80 != 0 => -1,
        _ => 0,
    };
    for &b in bytes {
        value = match value.checked_mul(256) {
            Some(v) => v | b as i128,
            None => return Err(Error::new(ErrorKind::WrongLengthForType, start)),
        };
    }
    i64::try_from(value).map_err(|_| Error::new(ErrorKind::WrongLengthForType, start))
}

/// OCTET STRING contents, borrowed from the packet
pub fn decode_octet_string_value<'a>(cur: &mut Cursor<'a>, len: usize) -> Result<&'a [u8]> {
    cur.read(len)
}

/// Character string contents, invalid UTF-8 replaced
pub fn decode_string_value(cur: &mut Cursor<'_>, len: usize) -> Result<String> {
    Ok(String::from_utf8_lossy(cur.read(len)?).into_owned())
}

/// BOOLEAN: any non-zero octet is TRUE
///
/// Non-canonical lengths are tolerated, an empty value is FALSE.
pub fn decode_boolean_value(cur: &mut Cursor<'_>, len: usize) -> Result<bool> {
    Ok(cur.read(len)?.iter().any(|&b| b != 0))
}

pub fn decode_null_value(cur: &mut Cursor<'_>, len: usize) -> Result<()> {
    if len != 0 {
        return Err(Error::new(ErrorKind::WrongLengthForType, cur.offset()));
    }
    Ok(())
}

pub fn decode_bit_string_value<'a>(cur: &mut Cursor<'a>, len: usize) -> Result<BitString<'a>> {
    let start = cur.offset();
    if len == 0 {
        return Err(Error::new(ErrorKind::WrongLengthForType, start));
    }
    let bytes = cur.read(len)?;
    let unused_bits = bytes[0];
    if unused_bits > 7 || (len == 1 && unused_bits != 0) {
        return Err(Error::new(ErrorKind::WrongLengthForType, start));
    }
    Ok(BitString {
        unused_bits,
        data: &bytes[1..],
    })
}

/// OBJECT IDENTIFIER contents
pub fn decode_oid_value(cur: &mut Cursor<'_>, len: usize) -> Result<Oid> {
    let start = cur.offset();
    if len == 0 {
        return Err(Error::new(ErrorKind::WrongLengthForType, start));
    }
    let bytes = cur.read(len)?;
    Oid::decode(bytes).map_err(|e| e.rebase(start))
}
