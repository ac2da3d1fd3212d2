//! COPS-PR data carried in named Decision and ClientSI objects, RFC 3084
//!
//! A named object holds a list of sub-objects. Instance identifiers (PRID,
//! PPRID, ErrorPRID) are BER encoded OIDs. Encoded provisioning instance data
//! (EPD) is a run of BER values, one per attribute of the class, and each
//! value is labelled by the preceding PRID and its position.

use num_traits::FromPrimitive;
use tracing::trace;

use berdissect_api::config::DecodeOptions;
use berdissect_api::error::{self, Error, ErrorKind};
use berdissect_api::tree::{FieldEvent, FieldValue};
use berdissect_api::tvb::Tvb;
use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{decode_any, decode_by_schema, Alternative, Cursor, Leaf, Node, Schema, TagHeader};
use berdissect_utils::dissectors::emit_node;

use crate::consts::{label, SNum, CLASS_ERRORS, GLOBAL_ERRORS};
use crate::field;
use crate::parser::{padding, parse_object_header, read_u16, read_with, OBJECT_HEADER_LEN};

static INSTANCE_ID: Schema = Schema {
    name: "InstanceId",
    alternatives: &[Alternative::leaf(
        "oid",
        TagHeader::universal(universal::OID_TAG, false),
        Leaf::Oid,
    )],
};

/// Walk the sub-objects filling `cur`, adding one item per sub-object
pub fn dissect_named_data(
    cur: &mut Cursor<'_>,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    let mut prid: Option<String> = None;
    while !cur.is_exhausted() {
        let at = cur.offset();
        let header = read_with(cur, OBJECT_HEADER_LEN, parse_object_header)?;
        let len = header.length as usize;
        if len < OBJECT_HEADER_LEN {
            return Err(Error::new(ErrorKind::WrongLengthForType, at));
        }
        let mut content = cur.bounded(len - OBJECT_HEADER_LEN)?;
        let snum = SNum::from_u8(header.num);
        let name: &'static str = snum.map(|s| s.into()).unwrap_or("sub-object");
        let sub = item.push(field(cur.tvb(), name, at, len, FieldValue::None));
        sub.push(field(cur.tvb(), "length", at, 2, FieldValue::Uint(header.length.into())));
        sub.push(field(cur.tvb(), "s-num", at + 2, 1, FieldValue::Uint(header.num.into())));
        sub.push(field(cur.tvb(), "s-type", at + 3, 1, FieldValue::Uint(header.ctype.into())));

        match snum {
            Some(SNum::Prid) | Some(SNum::PrefixPrid) | Some(SNum::ErrorPrid) => {
                let oid = instance_id(&mut content, sub, opts)?;
                if snum == Some(SNum::Prid) {
                    prid = Some(oid);
                }
            }
            Some(SNum::Epd) => {
                let prefix = prid.as_deref().unwrap_or("epd");
                epd(&mut content, prefix, sub, opts)?;
            }
            Some(SNum::GlobalError) => error_code(&mut content, GLOBAL_ERRORS, sub)?,
            Some(SNum::ClassError) => error_code(&mut content, CLASS_ERRORS, sub)?,
            None => {
                trace!(snum = header.num, "unknown COPS-PR sub-object");
            }
        }
        if !content.is_exhausted() {
            let offset = content.offset();
            let rest = content.read(content.remaining())?;
            sub.push(field(
                cur.tvb(),
                "data",
                offset,
                rest.len(),
                FieldValue::OctetString(rest.to_vec()),
            ));
        }

        cur.skip(len - OBJECT_HEADER_LEN)?;
        let pad = padding(len).min(cur.remaining());
        cur.skip(pad)?;
    }
    Ok(())
}

fn instance_id(cur: &mut Cursor<'_>, item: &mut FieldEvent, opts: &DecodeOptions) -> error::Result<String> {
    let end = cur.end();
    let node = decode_by_schema(cur, &INSTANCE_ID, end, opts)?;
    let oid = node.as_oid().map(|o| o.to_string()).unwrap_or_default();
    item.display = Some(oid.clone());
    item.push(emit_node(&node, cur.tvb()));
    Ok(oid)
}

fn epd(cur: &mut Cursor<'_>, prefix: &str, item: &mut FieldEvent, opts: &DecodeOptions) -> error::Result<()> {
    let end = cur.end();
    let mut index = 0;
    while !cur.is_exhausted() {
        let node = decode_any(cur, end, opts)?;
        attributes(&node, prefix, &mut index, cur.tvb(), item);
    }
    item.display = Some(format!("{} attributes", index));
    Ok(())
}

/// Values are numbered in order, looking through SEQUENCE wrappers
fn attributes(node: &Node<'_>, prefix: &str, index: &mut usize, tvb: Tvb<'_>, item: &mut FieldEvent) {
    if node.tag == SEQUENCE {
        for child in node.children() {
            attributes(child, prefix, index, tvb, item);
        }
        return;
    }
    *index += 1;
    let mut attr = emit_node(node, tvb);
    attr.name = format!("{}.{}", prefix, index);
    item.push(attr);
}

fn error_code(cur: &mut Cursor<'_>, table: &[(u16, &'static str)], item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let code = read_u16(cur)?;
    let sub_code = read_u16(cur)?;
    let mut code_item = field(cur.tvb(), "error-code", at, 2, FieldValue::Uint(code.into()));
    if let Some(name) = label(table, code) {
        code_item = code_item.with_display(format!("{} ({})", name, code));
        item.display = Some(name.to_string());
    }
    item.push(code_item);
    item.push(field(cur.tvb(), "error-sub-code", at + 2, 2, FieldValue::Uint(sub_code.into())));
    Ok(())
}
