use berdissect_api::error::{Error, ErrorKind, Result};

use super::{Cursor, TagClass, TagHeader};

/// Low five bits of the first identifier octet announcing a multi-octet tag
const HIGH_TAG_NUMBER: u8 = 0x1f;

/// Decode identifier octets: class, constructed flag and tag number
///
/// Tag numbers of 31 and above use the high-tag-number form: base-128 digits,
/// most significant first, bit 8 set on every octet but the last. A tag
/// number too large for `u32` saturates to `u32::MAX`, which no schema
/// matches.
pub fn decode_identifier(cur: &mut Cursor<'_>) -> Result<TagHeader> {
    let first = cur.read_u8()?;
    let class = TagClass::from_identifier(first);
    let constructed = first & 0x20 != 0;

    let mut tag = (first & HIGH_TAG_NUMBER) as u32;
    if tag == HIGH_TAG_NUMBER as u32 {
        tag = 0;
        loop {
            let octet = cur.read_u8().map_err(continuation_error)?;
            tag = tag
                .checked_mul(128)
                .and_then(|t| t.checked_add((octet & 0x7f) as u32))
                .unwrap_or(u32::MAX);
            if octet & 0x80 == 0 {
                break;
            }
        }
    }

    Ok(TagHeader {
        class,
        constructed,
        tag,
    })
}

/// A missing continuation octet is `Truncated`, unless the octet exists on
/// the wire and only the capture stopped short of it
pub(super) fn continuation_error(e: Error) -> Error {
    match e.kind {
        ErrorKind::ReportedBounds => e,
        _ => Error::new(ErrorKind::Truncated, e.offset),
    }
}
