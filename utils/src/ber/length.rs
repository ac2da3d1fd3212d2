use berdissect_api::error::{Error, ErrorKind, Result};

use super::identifier::continuation_error;
use super::{Cursor, Length};

/// Decode length octets
///
/// * short form: one octet, bit 8 clear, value 0..=127
/// * indefinite form: the single octet `0x80`
/// * long form: bit 8 set, the low 7 bits count the big-endian length octets
///   that follow. Leading zero octets are accepted, a value that does not fit
///   in 32 bits cannot describe anything inside a packet and fails with
///   `Bounds`.
pub fn decode_length(cur: &mut Cursor<'_>) -> Result<Length> {
    let start = cur.offset();
    let first = cur.read_u8()?;
    if first & 0x80 == 0 {
        return Ok(Length::Definite(first as u32));
    }

    let count = (first & 0x7f) as usize;
    if count == 0 {
        return Ok(Length::Indefinite);
    }

    let octets = cur.read(count).map_err(continuation_error)?;
    let mut value: u64 = 0;
    for &octet in octets {
        value = (value << 8) | octet as u64;
        if value > u32::MAX as u64 {
            return Err(Error::new(ErrorKind::Bounds, start));
        }
    }
    Ok(Length::Definite(value as u32))
}
