use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::sequence::tuple;
use nom::IResult;

use berdissect_api::error::{self, Error, ErrorKind};
use berdissect_utils::ber::Cursor;

pub const COMMON_HEADER_LEN: usize = 8;
pub const OBJECT_HEADER_LEN: usize = 4;
/// Offset of the message length in the common header
pub const MESSAGE_LENGTH_OFFSET: usize = 4;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CommonHeader {
    pub version: u8,
    pub flags: u8,
    pub op_code: u8,
    pub client_type: u16,
    pub length: u32,
}

impl CommonHeader {
    #[inline]
    pub fn is_solicited(&self) -> bool {
        self.flags & 0x01 != 0
    }
}

/// Object and COPS-PR sub-object headers share one layout: a 16 bit length
/// covering the header, then a class number and a type number
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ObjectHeader {
    pub length: u16,
    pub num: u8,
    pub ctype: u8,
}

pub fn parse_common_header(input: &[u8]) -> IResult<&[u8], CommonHeader> {
    let (input, (first, op_code, client_type, length)) =
        tuple((be_u8, be_u8, be_u16, be_u32))(input)?;
    Ok((
        input,
        CommonHeader {
            version: first >> 4,
            flags: first & 0x0f,
            op_code,
            client_type,
            length,
        },
    ))
}

pub fn parse_object_header(input: &[u8]) -> IResult<&[u8], ObjectHeader> {
    let (input, (length, num, ctype)) = tuple((be_u16, be_u8, be_u8))(input)?;
    Ok((input, ObjectHeader { length, num, ctype }))
}

/// Run a nom parser over the next `len` bytes of the cursor
///
/// The bytes are fetched through the cursor first, so running short is
/// reported as a bounds error at the cursor offset. The parser only sees
/// complete input.
pub fn read_with<'a, T, F>(cur: &mut Cursor<'a>, len: usize, parser: F) -> error::Result<T>
where
    F: Fn(&'a [u8]) -> IResult<&'a [u8], T>,
{
    let at = cur.offset();
    let raw = cur.read(len)?;
    parser(raw)
        .map(|(_, v)| v)
        .map_err(|_| Error::new(ErrorKind::Truncated, at))
}

#[inline]
pub fn read_u16(cur: &mut Cursor<'_>) -> error::Result<u16> {
    read_with(cur, 2, be_u16)
}

#[inline]
pub fn read_u32(cur: &mut Cursor<'_>) -> error::Result<u32> {
    read_with(cur, 4, be_u32)
}

/// Bytes to the next 32 bit boundary
#[inline]
pub fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn common_header() {
        let (rest, h) =
            parse_common_header(&[0x11, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00, 0x48, 0xff]).unwrap();
        assert_eq!(rest, &[0xff]);
        assert_eq!(h.version, 1);
        assert!(h.is_solicited());
        assert_eq!(h.op_code, 2);
        assert_eq!(h.client_type, 2);
        assert_eq!(h.length, 72);
    }

    #[test]
    fn object_header() {
        let (_, h) = parse_object_header(&[0x00, 0x0e, 0x06, 0x05]).unwrap();
        assert_eq!(
            h,
            ObjectHeader {
                length: 14,
                num: 6,
                ctype: 5
            }
        );
        assert!(parse_object_header(&[0x00, 0x0e, 0x06]).is_err());
    }

    #[test]
    fn paddings() {
        assert_eq!(padding(8), 0);
        assert_eq!(padding(14), 2);
        assert_eq!(padding(19), 1);
    }
}
