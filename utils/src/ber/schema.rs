//! Schema driven decoding.
//!
//! A [`Schema`] lists tagged alternatives. Each alternative either decodes a
//! leaf value, wraps one nested schema in an explicit tag, stands for another
//! schema (an untagged CHOICE reference), or describes a constructed value:
//! a SEQUENCE of fields in order, or a SEQUENCE OF repeated items.
//!
//! Schema tables are plain `static` data and may refer to themselves, which
//! is how recursive grammars like the LDAP search filter are written.

use berdissect_api::config::DecodeOptions;
use berdissect_api::error::{Error, ErrorKind, Result};

use super::eoc::{close_contents, open_contents, Contents, EOC_LEN};
use super::universal::tag_name;
use super::{
    decode_bit_string_value, decode_boolean_value, decode_header, decode_int_value_limited,
    decode_null_value, decode_octet_string_value, decode_oid_value, decode_string_value,
    decode_uint_value_limited, peek_header, BitString, Cursor, Length, Oid, TagClass, TagHeader,
    DEFAULT_MAX_INT_LEN,
};

/// Which identifiers an alternative accepts
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TagMatch {
    Exact(TagHeader),
    Any,
}

impl TagMatch {
    #[inline]
    pub fn matches(&self, tag: &TagHeader) -> bool {
        match self {
            TagMatch::Exact(expected) => expected == tag,
            TagMatch::Any => true,
        }
    }
}

/// How the content of a primitive value is interpreted
#[derive(Clone, Copy)]
pub enum Leaf {
    Uint,
    Int,
    /// Unsigned INTEGER allowed to take this many octets, e.g. 9 for Counter64
    UintWide(usize),
    Bool,
    Null,
    OctetString,
    /// Character string, invalid UTF-8 replaced
    Text,
    Oid,
    BitString,
    /// INTEGER with symbolic names
    Enumerated(&'static [(i64, &'static str)]),
    /// OCTET STRING rendered by a protocol specific formatter
    Formatted(fn(&[u8]) -> String),
    /// Whatever the identifier says, decoded generically
    Any,
    /// Content bytes, primitive or constructed, left uninterpreted
    Raw,
}

#[derive(Clone, Copy)]
pub enum Body {
    Leaf(Leaf),
    /// Explicit tag around exactly one value of `inner`
    Explicit { inner: &'static Schema },
    /// Untagged reference: the value is one of `schema`'s alternatives
    Choice { schema: &'static Schema },
    SequenceOf { item: &'static Schema },
    /// SEQUENCE or SET with its fields in order
    Sequence { fields: &'static [Field] },
}

#[derive(Clone, Copy)]
pub struct Alternative {
    pub name: &'static str,
    pub tag: TagMatch,
    pub body: Body,
}

impl Alternative {
    pub const fn leaf(name: &'static str, tag: TagHeader, leaf: Leaf) -> Self {
        Self {
            name,
            tag: TagMatch::Exact(tag),
            body: Body::Leaf(leaf),
        }
    }

    pub const fn explicit(name: &'static str, tag: TagHeader, inner: &'static Schema) -> Self {
        Self {
            name,
            tag: TagMatch::Exact(tag),
            body: Body::Explicit { inner },
        }
    }

    pub const fn choice(name: &'static str, schema: &'static Schema) -> Self {
        Self {
            name,
            tag: TagMatch::Any,
            body: Body::Choice { schema },
        }
    }

    pub const fn any(name: &'static str) -> Self {
        Self {
            name,
            tag: TagMatch::Any,
            body: Body::Leaf(Leaf::Any),
        }
    }

    /// Whether a value with identifier `tag` is decoded by this alternative
    pub fn matches(&self, tag: &TagHeader) -> bool {
        match self.body {
            Body::Choice { schema } => schema.matches(tag),
            _ => self.tag.matches(tag),
        }
    }
}

/// One position in a SEQUENCE
#[derive(Clone, Copy)]
pub struct Field {
    pub optional: bool,
    pub alternatives: &'static [Alternative],
}

#[derive(Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub alternatives: &'static [Alternative],
}

impl Schema {
    pub fn matches(&self, tag: &TagHeader) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(tag))
    }
}

/// One decoded value and where it sits in the packet
#[derive(Clone, Debug, PartialEq)]
pub struct Node<'a> {
    pub name: &'static str,
    pub tag: TagHeader,
    /// Offset of the identifier octets, in the coordinates of the decoded tvb
    pub offset: usize,
    pub header_len: usize,
    /// Content length, end-of-contents marker excluded
    pub content_len: usize,
    pub indefinite: bool,
    pub value: Value<'a>,
}

pub type ParseTree<'a> = Node<'a>;

#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Uint(u64),
    Int(i64),
    Enumerated(i64, Option<&'static str>),
    Bool(bool),
    Null,
    Bytes(&'a [u8]),
    Text(String),
    Formatted { raw: &'a [u8], text: String },
    Oid(Oid),
    BitString(BitString<'a>),
    Constructed(Vec<Node<'a>>),
    /// The value inside an explicit tag
    Explicit(Box<Node<'a>>),
    /// The alternative picked for an untagged CHOICE
    Choice(Box<Node<'a>>),
}

impl<'a> Node<'a> {
    /// Bytes taken on the wire, header and end-of-contents marker included
    pub fn len(&self) -> usize {
        let eoc = if self.indefinite { EOC_LEN } else { 0 };
        self.header_len + self.content_len + eoc
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn content_offset(&self) -> usize {
        self.offset + self.header_len
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.len()
    }

    /// Skip explicit tags and CHOICE wrappers
    pub fn inner(&self) -> &Node<'a> {
        match &self.value {
            Value::Explicit(inner) | Value::Choice(inner) => inner.inner(),
            _ => self,
        }
    }

    pub fn children(&self) -> &[Node<'a>] {
        match &self.inner().value {
            Value::Constructed(children) => children.as_slice(),
            _ => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&Node<'a>> {
        self.children().iter().find(|child| child.name == name)
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.inner().value {
            Value::Uint(v) => Some(v),
            Value::Int(v) | Value::Enumerated(v, _) if v >= 0 => Some(v as u64),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.inner().value {
            Value::Int(v) | Value::Enumerated(v, _) => Some(v),
            Value::Uint(v) if v <= i64::MAX as u64 => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self.inner().value {
            Value::Bytes(raw) | Value::Formatted { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.inner().value {
            Value::Text(text) | Value::Formatted { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_oid(&self) -> Option<&Oid> {
        match &self.inner().value {
            Value::Oid(oid) => Some(oid),
            _ => None,
        }
    }

    /// Name of the alternative picked by a CHOICE, looking through explicit tags
    pub fn chosen(&self) -> Option<&Node<'a>> {
        match &self.value {
            Value::Choice(inner) => Some(&**inner),
            Value::Explicit(inner) => inner.chosen(),
            _ => None,
        }
    }
}

/// Decode one value of `schema`, reading nothing at or past `end`
///
/// `end` is an offset of the cursor's tvb, normally the end of the enclosing
/// container. On success the cursor sits right after the value, including
/// its end-of-contents marker when the length was indefinite.
pub fn decode_by_schema<'a>(
    cur: &mut Cursor<'a>,
    schema: &'static Schema,
    end: usize,
    opts: &DecodeOptions,
) -> Result<ParseTree<'a>> {
    let mut bounded = cur.limit(end)?;
    let node = decode_element(&mut bounded, schema.alternatives, 0, opts)?;
    cur.advance_to(&bounded)?;
    Ok(node)
}

/// Decode one value of any type, guided only by its identifier
pub fn decode_any<'a>(cur: &mut Cursor<'a>, end: usize, opts: &DecodeOptions) -> Result<Node<'a>> {
    let mut bounded = cur.limit(end)?;
    let node = decode_any_element(&mut bounded, "element", 0, opts)?;
    cur.advance_to(&bounded)?;
    Ok(node)
}

fn too_deep(depth: usize, offset: usize, opts: &DecodeOptions) -> Result<()> {
    if depth >= opts.max_depth {
        Err(Error::new(ErrorKind::TooDeep, offset))
    } else {
        Ok(())
    }
}

fn decode_element<'a>(
    cur: &mut Cursor<'a>,
    alternatives: &'static [Alternative],
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Node<'a>> {
    let offset = cur.offset();
    let (tag, _) = peek_header(cur)?;
    match alternatives.iter().find(|alt| alt.matches(&tag)) {
        Some(alt) => decode_alternative(cur, alt, depth, opts),
        None => Err(Error::new(ErrorKind::UnexpectedTag, offset)),
    }
}

fn decode_alternative<'a>(
    cur: &mut Cursor<'a>,
    alt: &'static Alternative,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Node<'a>> {
    too_deep(depth, cur.offset(), opts)?;

    match alt.body {
        Body::Choice { schema } => {
            let inner = decode_element(cur, schema.alternatives, depth + 1, opts)?;
            Ok(Node {
                name: alt.name,
                tag: inner.tag,
                offset: inner.offset,
                header_len: inner.header_len,
                content_len: inner.content_len,
                indefinite: inner.indefinite,
                value: Value::Choice(Box::new(inner)),
            })
        }
        Body::Leaf(Leaf::Any) => {
            let (node, length) = start_node(cur, alt.name)?;
            decode_any_body(cur, node, length, depth, opts)
        }
        Body::Leaf(Leaf::Raw) => {
            let (mut node, length) = start_node(cur, alt.name)?;
            let contents = open_contents(cur, length, depth, opts)?;
            node.value = Value::Bytes(decode_octet_string_value(cur, contents.len())?);
            close_node(cur, &mut node, &contents)?;
            Ok(node)
        }
        Body::Leaf(leaf) => {
            let (mut node, length) = start_node(cur, alt.name)?;
            if node.tag.constructed {
                return Err(Error::new(ErrorKind::WrongType, node.offset));
            }
            let len = length.definite(node.offset)?;
            node.value = decode_leaf(cur, leaf, len, opts)?;
            node.content_len = len;
            Ok(node)
        }
        Body::Explicit { inner } => {
            let (mut node, length) = start_constructed(cur, alt.name)?;
            let mut contents = open_contents(cur, length, depth, opts)?;
            let child = decode_element(&mut contents.cursor, inner.alternatives, depth + 1, opts)?;
            // exactly one value inside an explicit tag
            if !contents.cursor.is_exhausted() {
                return Err(Error::new(ErrorKind::WrongLengthForType, contents.cursor.offset()));
            }
            node.value = Value::Explicit(Box::new(child));
            close_node(cur, &mut node, &contents)?;
            Ok(node)
        }
        Body::SequenceOf { item } => {
            let (mut node, length) = start_constructed(cur, alt.name)?;
            let mut contents = open_contents(cur, length, depth, opts)?;
            let mut items = Vec::new();
            while !contents.cursor.is_exhausted() {
                if items.len() >= opts.max_items {
                    return Err(Error::new(ErrorKind::TooDeep, contents.cursor.offset()));
                }
                items.push(decode_element(
                    &mut contents.cursor,
                    item.alternatives,
                    depth + 1,
                    opts,
                )?);
            }
            node.value = Value::Constructed(items);
            close_node(cur, &mut node, &contents)?;
            Ok(node)
        }
        Body::Sequence { fields } => {
            let (mut node, length) = start_constructed(cur, alt.name)?;
            let mut contents = open_contents(cur, length, depth, opts)?;
            let mut children = Vec::with_capacity(fields.len());
            for field in fields {
                let at = contents.cursor.offset();
                let picked = if contents.cursor.is_exhausted() {
                    None
                } else {
                    let (next, _) = peek_header(&contents.cursor)?;
                    field.alternatives.iter().find(|alt| alt.matches(&next))
                };
                match picked {
                    Some(alt) => {
                        children.push(decode_alternative(&mut contents.cursor, alt, depth + 1, opts)?)
                    }
                    None if field.optional => {}
                    None => return Err(Error::new(ErrorKind::WrongType, at)),
                }
            }
            // Extension additions and unknown trailing fields
            while !contents.cursor.is_exhausted() {
                if children.len() >= opts.max_items {
                    return Err(Error::new(ErrorKind::TooDeep, contents.cursor.offset()));
                }
                children.push(decode_any_element(
                    &mut contents.cursor,
                    "unknown",
                    depth + 1,
                    opts,
                )?);
            }
            node.value = Value::Constructed(children);
            close_node(cur, &mut node, &contents)?;
            Ok(node)
        }
    }
}

/// Decode a header into a node still waiting for its value
fn start_node<'a>(cur: &mut Cursor<'a>, name: &'static str) -> Result<(Node<'a>, Length)> {
    let offset = cur.offset();
    let (tag, length) = decode_header(cur)?;
    let node = Node {
        name,
        tag,
        offset,
        header_len: cur.offset() - offset,
        content_len: 0,
        indefinite: false,
        value: Value::Null,
    };
    Ok((node, length))
}

fn start_constructed<'a>(cur: &mut Cursor<'a>, name: &'static str) -> Result<(Node<'a>, Length)> {
    let (node, length) = start_node(cur, name)?;
    if !node.tag.constructed {
        return Err(Error::new(ErrorKind::WrongType, node.offset));
    }
    Ok((node, length))
}

fn close_node<'a>(cur: &mut Cursor<'a>, node: &mut Node<'a>, contents: &Contents<'a>) -> Result<()> {
    node.content_len = contents.len();
    node.indefinite = contents.indefinite;
    close_contents(cur, contents)
}

/// Interpret `len` content bytes of a primitive value
fn decode_leaf<'a>(
    cur: &mut Cursor<'a>,
    leaf: Leaf,
    len: usize,
    opts: &DecodeOptions,
) -> Result<Value<'a>> {
    let value = match leaf {
        Leaf::Uint => Value::Uint(decode_uint_value_limited(cur, len, opts.max_int_len)?),
        Leaf::UintWide(limit) => Value::Uint(decode_uint_value_limited(cur, len, limit)?),
        Leaf::Int => Value::Int(decode_int_value_limited(cur, len, opts.max_int_len)?),
        Leaf::Enumerated(names) => {
            let v = decode_int_value_limited(cur, len, opts.max_int_len)?;
            let label = names.iter().find(|(n, _)| *n == v).map(|(_, label)| *label);
            Value::Enumerated(v, label)
        }
        Leaf::Bool => Value::Bool(decode_boolean_value(cur, len)?),
        Leaf::Null => {
            decode_null_value(cur, len)?;
            Value::Null
        }
        Leaf::OctetString | Leaf::Any | Leaf::Raw => {
            Value::Bytes(decode_octet_string_value(cur, len)?)
        }
        Leaf::Text => Value::Text(decode_string_value(cur, len)?),
        Leaf::Oid => Value::Oid(decode_oid_value(cur, len)?),
        Leaf::BitString => Value::BitString(decode_bit_string_value(cur, len)?),
        Leaf::Formatted(format) => {
            let raw = decode_octet_string_value(cur, len)?;
            Value::Formatted {
                raw,
                text: format(raw),
            }
        }
    };
    Ok(value)
}

fn decode_any_element<'a>(
    cur: &mut Cursor<'a>,
    name: &'static str,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Node<'a>> {
    too_deep(depth, cur.offset(), opts)?;
    let (node, length) = start_node(cur, name)?;
    decode_any_body(cur, node, length, depth, opts)
}

/// Decode the content of `node` by its universal type, if it has one
fn decode_any_body<'a>(
    cur: &mut Cursor<'a>,
    mut node: Node<'a>,
    length: Length,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Node<'a>> {
    let tag = node.tag;
    if tag.constructed {
        let mut contents = open_contents(cur, length, depth, opts)?;
        let mut children = Vec::new();
        while !contents.cursor.is_exhausted() {
            if children.len() >= opts.max_items {
                return Err(Error::new(ErrorKind::TooDeep, contents.cursor.offset()));
            }
            let name = generic_name(&contents.cursor);
            children.push(decode_any_element(&mut contents.cursor, name, depth + 1, opts)?);
        }
        node.value = Value::Constructed(children);
        close_node(cur, &mut node, &contents)?;
        return Ok(node);
    }

    let len = length.definite(node.offset)?;
    let leaf = match (tag.class, tag.tag) {
        (TagClass::Universal, 1) => Leaf::Bool,
        (TagClass::Universal, 2) if len <= DEFAULT_MAX_INT_LEN => Leaf::Int,
        (TagClass::Universal, 3) => Leaf::BitString,
        (TagClass::Universal, 5) => Leaf::Null,
        (TagClass::Universal, 6) => Leaf::Oid,
        (TagClass::Universal, 10) if len <= DEFAULT_MAX_INT_LEN => Leaf::Int,
        (TagClass::Universal, 12) | (TagClass::Universal, 18..=27) => Leaf::Text,
        _ => Leaf::OctetString,
    };
    let generic = DecodeOptions {
        max_int_len: DEFAULT_MAX_INT_LEN,
        ..*opts
    };
    node.value = match decode_leaf(cur, leaf, len, &generic)? {
        Value::Int(v) if tag.tag == 10 => Value::Enumerated(v, None),
        value => value,
    };
    node.content_len = len;
    Ok(node)
}

/// Universal type name of the next element, if it has one
fn generic_name(cur: &Cursor<'_>) -> &'static str {
    match peek_header(cur) {
        Ok((tag, _)) if tag.class == TagClass::Universal => tag_name(tag.tag).unwrap_or("element"),
        _ => "element",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::universal;
    use berdissect_api::tvb::Tvb;

    static ITEM: Schema = Schema {
        name: "Item",
        alternatives: &[Alternative::leaf("value", TagHeader::universal(2, false), Leaf::Int)],
    };

    static RECORD: Schema = Schema {
        name: "Record",
        alternatives: &[Alternative {
            name: "record",
            tag: TagMatch::Exact(TagHeader::universal(16, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf(
                            "id",
                            TagHeader::universal(2, false),
                            Leaf::Uint,
                        )],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "label",
                            TagHeader::context(0, false),
                            Leaf::Text,
                        )],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::explicit(
                            "flag",
                            TagHeader::context(1, true),
                            &universal::BOOLEAN,
                        )],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "items",
                            tag: TagMatch::Exact(TagHeader::universal(16, true)),
                            body: Body::SequenceOf { item: &ITEM },
                        }],
                    },
                ],
            },
        }],
    };

    /// TREE ::= CHOICE { leaf [0] INTEGER, node [1] SEQUENCE OF TREE }
    static TREE: Schema = Schema {
        name: "Tree",
        alternatives: &[
            Alternative::leaf("leaf", TagHeader::context(0, false), Leaf::Int),
            Alternative {
                name: "node",
                tag: TagMatch::Exact(TagHeader::context(1, true)),
                body: Body::SequenceOf { item: &TREE },
            },
        ],
    };

    fn decode<'a>(buf: &'a [u8], schema: &'static Schema) -> Result<(Node<'a>, usize)> {
        decode_with(buf, schema, &DecodeOptions::default())
    }

    fn decode_with<'a>(
        buf: &'a [u8],
        schema: &'static Schema,
        opts: &DecodeOptions,
    ) -> Result<(Node<'a>, usize)> {
        let mut cur = Cursor::new(Tvb::new(buf));
        let node = decode_by_schema(&mut cur, schema, buf.len(), opts)?;
        Ok((node, cur.offset()))
    }

    #[test]
    fn sequence_with_optional_fields() {
        let buf = [
            0x30, 0x0c, 0x02, 0x01, 0x07, 0x80, 0x02, 0x68, 0x69, 0x30, 0x03, 0x02, 0x01, 0xff,
        ];
        let (node, consumed) = decode(&buf, &RECORD).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(node.name, "record");
        assert_eq!(node.len(), buf.len());
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.child("id").unwrap().as_uint(), Some(7));
        assert_eq!(node.child("label").unwrap().as_str(), Some("hi"));
        assert!(node.child("flag").is_none());
        let items = node.child("items").unwrap();
        assert_eq!(items.children()[0].as_int(), Some(-1));
        assert_eq!(items.children()[0].offset, 11);
    }

    #[test]
    fn explicit_field() {
        let buf = [
            0x30, 0x0a, 0x02, 0x01, 0x01, 0xa1, 0x03, 0x01, 0x01, 0xff, 0x30, 0x00,
        ];
        let (node, _) = decode(&buf, &RECORD).unwrap();
        let flag = node.child("flag").unwrap();
        assert_eq!(flag.header_len, 2);
        assert!(matches!(flag.inner().value, Value::Bool(true)));
        assert_eq!(flag.inner().offset, 7);
        assert!(node.child("items").unwrap().children().is_empty());
    }

    #[test]
    fn explicit_tag_holds_one_value() {
        // [1] { BOOLEAN TRUE, OCTET STRING "A" }
        let buf = [
            0x30, 0x0d, 0x02, 0x01, 0x01, 0xa1, 0x06, 0x01, 0x01, 0xff, 0x04, 0x01, 0x41, 0x30,
            0x00,
        ];
        assert_eq!(
            decode(&buf, &RECORD).unwrap_err(),
            Error::new(ErrorKind::WrongLengthForType, 10)
        );

        let buf = [
            0x30, 0x80, 0x02, 0x01, 0x01, 0xa1, 0x80, 0x01, 0x01, 0xff, 0x04, 0x01, 0x41, 0x00,
            0x00, 0x30, 0x00, 0x00, 0x00,
        ];
        assert_eq!(
            decode(&buf, &RECORD).unwrap_err(),
            Error::new(ErrorKind::WrongLengthForType, 10)
        );
    }

    #[test]
    fn missing_mandatory_field() {
        let buf = [0x30, 0x03, 0x02, 0x01, 0x07];
        let err = decode(&buf, &RECORD).unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::WrongType, 5));

        let buf = [0x30, 0x03, 0x80, 0x01, 0x07];
        let err = decode(&buf, &RECORD).unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::WrongType, 2));
    }

    #[test]
    fn no_alternative_matches() {
        let buf = [0x31, 0x00];
        assert_eq!(
            decode(&buf, &RECORD).unwrap_err(),
            Error::new(ErrorKind::UnexpectedTag, 0)
        );
    }

    #[test]
    fn trailing_elements_are_kept() {
        let buf = [
            0x30, 0x08, 0x02, 0x01, 0x01, 0x30, 0x00, 0x04, 0x01, 0x41,
        ];
        let (node, _) = decode(&buf, &RECORD).unwrap();
        let extra = node.children().last().unwrap();
        assert_eq!(extra.name, "unknown");
        assert_eq!(extra.as_bytes(), Some(&b"A"[..]));
    }

    #[test]
    fn indefinite_matches_definite() {
        let der = [0x30, 0x08, 0x02, 0x01, 0x07, 0x30, 0x03, 0x02, 0x01, 0x05];
        let ber = [
            0x30, 0x80, 0x02, 0x01, 0x07, 0x30, 0x80, 0x02, 0x01, 0x05, 0x00, 0x00, 0x00, 0x00,
        ];
        let (a, _) = decode(&der, &RECORD).unwrap();
        let (b, consumed) = decode(&ber, &RECORD).unwrap();
        assert_eq!(consumed, ber.len());
        assert!(b.indefinite);
        assert_eq!(b.len(), ber.len());
        assert_eq!(a.child("id"), b.child("id"));
        let a_items = a.child("items").unwrap().children();
        let b_items = b.child("items").unwrap().children();
        assert_eq!(a_items[0].value, b_items[0].value);
    }

    #[test]
    fn recursive_schema() {
        // node { leaf 1, node { leaf 2 } }
        let buf = [0xa1, 0x08, 0x80, 0x01, 0x01, 0xa1, 0x03, 0x80, 0x01, 0x02];
        let (tree, _) = decode(&buf, &TREE).unwrap();
        assert_eq!(tree.name, "node");
        let children = tree.children();
        assert_eq!(children[0].as_int(), Some(1));
        assert_eq!(children[1].children()[0].as_int(), Some(2));
    }

    #[test]
    fn depth_guard() {
        let mut buf = Vec::new();
        for i in 0..80usize {
            let remaining = (80 - i - 1) * 2;
            buf.extend_from_slice(&[0xa1, remaining as u8]);
        }
        let opts = DecodeOptions::default();
        let err = decode_with(&buf, &TREE, &opts).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeep);
        assert_eq!(err.offset, opts.max_depth * 2);
    }

    #[test]
    fn item_limit() {
        let buf = [0xa1, 0x06, 0x80, 0x00, 0x80, 0x00, 0x80, 0x00];
        let opts = DecodeOptions {
            max_items: 2,
            ..DecodeOptions::default()
        };
        let err = decode_with(&buf, &TREE, &opts).unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::TooDeep, 6));
    }

    #[test]
    fn leaf_on_constructed_value() {
        let buf = [0xa0, 0x00];
        let err = decode(&buf, &TREE).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedTag);

        static LOOSE: Schema = Schema {
            name: "Loose",
            alternatives: &[Alternative {
                name: "x",
                tag: TagMatch::Any,
                body: Body::Leaf(Leaf::Int),
            }],
        };
        assert_eq!(decode(&buf, &LOOSE).unwrap_err(), Error::new(ErrorKind::WrongType, 0));
    }

    #[test]
    fn container_bounds_win() {
        // The INTEGER claims two bytes but its SEQUENCE only holds one
        let buf = [0x30, 0x03, 0x02, 0x02, 0x05, 0x06];
        let err = decode(&buf, &universal::ANY).unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::Bounds, 4));
    }

    #[test]
    fn truncated_content_offset() {
        let buf = [0x30, 0x05];
        let err = decode(&buf, &RECORD).unwrap_err();
        assert_eq!(err.offset, 2);
        assert!(err.kind.is_truncation());
    }

    #[test]
    fn generic_decoding() {
        let buf = [
            0x30, 0x0c, 0x06, 0x03, 0x2b, 0x06, 0x01, 0x0a, 0x01, 0x02, 0x0c, 0x02, 0x68, 0x69,
            0x05, 0x00,
        ];
        let mut cur = Cursor::new(Tvb::new(&buf[..]));
        let node = decode_any(&mut cur, buf.len(), &DecodeOptions::default()).unwrap();
        assert_eq!(node.name, "element");
        let children = node.children();
        assert_eq!(children[0].name, "OBJECT IDENTIFIER");
        assert_eq!(children[0].as_oid().unwrap().to_string(), "1.3.6");
        assert_eq!(children[1].value, Value::Enumerated(2, None));
        assert_eq!(children[2].as_str(), Some("hi"));
        assert_eq!(cur.offset(), 14);

        let null = decode_any(&mut cur, buf.len(), &DecodeOptions::default()).unwrap();
        assert_eq!(null.value, Value::Null);
        assert!(cur.is_exhausted());

        // The SEQUENCE does not fit before the requested end
        let mut cur = Cursor::new(Tvb::new(&buf[..]));
        let err = decode_any(&mut cur, 10, &DecodeOptions::default()).unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::Bounds, 2));
    }

    #[test]
    fn wide_integer_kept_as_bytes() {
        let buf = [0x02, 0x09, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let (node, _) = decode(&buf, &universal::ANY).unwrap();
        assert_eq!(node.as_bytes().map(|b| b.len()), Some(9));
    }

    #[test]
    fn choice_reference() {
        static WRAPPED: Schema = Schema {
            name: "Wrapped",
            alternatives: &[Alternative {
                name: "wrapped",
                tag: TagMatch::Exact(TagHeader::universal(16, true)),
                body: Body::Sequence {
                    fields: &[Field {
                        optional: false,
                        alternatives: &[Alternative::choice("tree", &TREE)],
                    }],
                },
            }],
        };
        let buf = [0x30, 0x03, 0x80, 0x01, 0x09];
        let (node, _) = decode(&buf, &WRAPPED).unwrap();
        let tree = node.child("tree").unwrap();
        assert_eq!(tree.chosen().unwrap().name, "leaf");
        assert_eq!(tree.as_int(), Some(9));
        assert_eq!(tree.len(), 3);
    }
}
