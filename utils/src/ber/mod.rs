//! ITU-T X.690 BER/DER decoding engine.
//!
//! Every decoder takes a [`Cursor`] by mutable reference and, on success,
//! advances it by exactly the number of bytes it consumed. On failure the
//! cursor position is unspecified and the error carries the offset where the
//! failing read began. Nothing here logs, allocates global state or panics on
//! bad input.

use std::fmt::{Display, Formatter};

mod cursor;
pub mod eoc;
mod identifier;
mod length;
pub mod oid;
pub mod schema;
pub mod universal;
mod value;

pub use cursor::Cursor;
pub use eoc::{close_contents, consume_eoc, content_length, find_eoc, open_contents, Contents, EOC_LEN};
pub use identifier::decode_identifier;
pub use length::decode_length;
pub use oid::Oid;
pub use schema::{
    decode_any, decode_by_schema, Alternative, Body, Field, Leaf, Node, ParseTree, Schema, TagMatch,
    Value,
};
pub use value::*;

use berdissect_api::error::{Error, ErrorKind, Result};

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TagClass {
    Universal = 0,
    Application = 1,
    ContextSpecific = 2,
    Private = 3,
}

impl TagClass {
    /// Class from the two high bits of an identifier octet
    #[inline]
    pub fn from_identifier(octet: u8) -> Self {
        match octet >> 6 {
            0 => TagClass::Universal,
            1 => TagClass::Application,
            2 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

/// Decoded identifier octets
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TagHeader {
    pub class: TagClass,
    pub constructed: bool,
    pub tag: u32,
}

impl TagHeader {
    pub const fn new(class: TagClass, constructed: bool, tag: u32) -> Self {
        Self {
            class,
            constructed,
            tag,
        }
    }

    pub const fn universal(tag: u32, constructed: bool) -> Self {
        Self::new(TagClass::Universal, constructed, tag)
    }

    pub const fn application(tag: u32, constructed: bool) -> Self {
        Self::new(TagClass::Application, constructed, tag)
    }

    pub const fn context(tag: u32, constructed: bool) -> Self {
        Self::new(TagClass::ContextSpecific, constructed, tag)
    }

    /// End-of-contents identifier: universal, primitive, tag 0
    #[inline]
    pub fn is_eoc(&self) -> bool {
        self.class == TagClass::Universal && !self.constructed && self.tag == 0
    }
}

impl Display for TagHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.class {
            TagClass::Universal => match universal::tag_name(self.tag) {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "[UNIVERSAL {}]", self.tag),
            },
            TagClass::Application => write!(f, "[APPLICATION {}]", self.tag),
            TagClass::ContextSpecific => write!(f, "[{}]", self.tag),
            TagClass::Private => write!(f, "[PRIVATE {}]", self.tag),
        }
    }
}

/// Decoded length octets
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Length {
    Definite(u32),
    Indefinite,
}

impl Length {
    /// The definite length, or `LengthNotDefinite` reported at `offset`
    #[inline]
    pub fn definite(self, offset: usize) -> Result<usize> {
        match self {
            Length::Definite(n) => Ok(n as usize),
            Length::Indefinite => Err(Error::new(ErrorKind::LengthNotDefinite, offset)),
        }
    }
}

/// Identifier and length octets of one TLV
pub fn decode_header(cur: &mut Cursor<'_>) -> Result<(TagHeader, Length)> {
    let tag = decode_identifier(cur)?;
    let length = decode_length(cur)?;
    Ok((tag, length))
}

/// Decode a header without moving the cursor
pub fn peek_header(cur: &Cursor<'_>) -> Result<(TagHeader, Length)> {
    let mut peek = *cur;
    decode_header(&mut peek)
}

/// Decode a header and check it against the tag the grammar expects here
pub fn expect_header(cur: &mut Cursor<'_>, expected: TagHeader) -> Result<Length> {
    let start = cur.offset();
    let (tag, length) = decode_header(cur)?;
    if tag != expected {
        return Err(Error::new(ErrorKind::WrongType, start));
    }
    Ok(length)
}
