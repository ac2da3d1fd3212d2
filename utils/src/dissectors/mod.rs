//! Glue between the BER engine and the result tree.
//!
//! Dissectors decode with [`crate::ber`], then hand the resulting [`Node`]s
//! to [`emit_node`]. When decoding fails they call [`report_error`], which
//! adds one synthetic `malformed` item starting where the failing read began
//! and stops there.

use tracing::debug;

use berdissect_api::config::DecodeOptions;
use berdissect_api::error::{Error, Result};
use berdissect_api::tree::{FieldEvent, FieldValue, ProtoTree};
use berdissect_api::tvb::Tvb;

use crate::ber::{decode_by_schema, Cursor, Node, Schema, Value};

/// Turn a decoded node into a tree item, offsets made absolute
///
/// Explicit tags are folded into the value they wrap: the item keeps the
/// wrapper's name and byte range and shows the inner value.
pub fn emit_node(node: &Node<'_>, tvb: Tvb<'_>) -> FieldEvent {
    let offset = tvb.absolute(node.offset);
    let length = node.len();
    match &node.value {
        Value::Explicit(inner) => {
            let mut item = emit_node(inner, tvb);
            item.name = node.name.to_string();
            item.offset = offset;
            item.length = length;
            item
        }
        Value::Choice(inner) => {
            let mut item = FieldEvent::new(node.name, offset, length, FieldValue::None)
                .with_display(inner.name);
            item.push(emit_node(inner, tvb));
            item
        }
        Value::Constructed(children) => {
            let mut item = FieldEvent::new(node.name, offset, length, FieldValue::None);
            item.children = children.iter().map(|c| emit_node(c, tvb)).collect();
            item
        }
        value => {
            let (value, display) = leaf_value(value);
            let item = FieldEvent::new(node.name, offset, length, value);
            match display {
                Some(display) => item.with_display(display),
                None => item,
            }
        }
    }
}

fn leaf_value(value: &Value<'_>) -> (FieldValue, Option<String>) {
    match value {
        Value::Uint(v) => (FieldValue::Uint(*v), None),
        Value::Int(v) => (FieldValue::Int(*v), None),
        Value::Enumerated(v, Some(label)) => (FieldValue::Int(*v), Some(format!("{} ({})", label, v))),
        Value::Enumerated(v, None) => (FieldValue::Int(*v), None),
        Value::Bool(v) => (FieldValue::Bool(*v), None),
        Value::Null => (FieldValue::None, None),
        Value::Bytes(raw) => (FieldValue::OctetString(raw.to_vec()), None),
        Value::Text(text) => (FieldValue::Text(text.clone()), None),
        Value::Formatted { raw, text } => (FieldValue::OctetString(raw.to_vec()), Some(text.clone())),
        Value::Oid(oid) if oid.is_lossy() => (
            FieldValue::Oid(oid.to_string()),
            Some(format!("{} (sub-identifier overflow)", oid)),
        ),
        Value::Oid(oid) => (FieldValue::Oid(oid.to_string()), None),
        Value::BitString(bits) => (
            FieldValue::OctetString(bits.data.to_vec()),
            Some(format!("{} bits", bits.bit_len())),
        ),
        // Containers are handled by the caller
        Value::Constructed(_) | Value::Explicit(_) | Value::Choice(_) => (FieldValue::None, None),
    }
}

/// Add a `malformed` item covering `[err.offset, end)`
///
/// `err` and `end` are in the coordinates of `tvb`, the item is placed in
/// packet coordinates.
pub fn report_error(tree: &mut ProtoTree, tvb: Tvb<'_>, err: &Error, end: usize) {
    let err = err.rebase(tvb.base_offset());
    let end = tvb.absolute(end).max(err.offset);
    debug!(kind = %err.kind, offset = err.offset, "malformed BER data");
    tree.add(FieldEvent::error(&err, end));
}

/// Decode one value of `schema` and add it to the tree
///
/// On failure a `malformed` item running to `end` is added instead and the
/// error is handed back, so the caller stops interpreting this structure.
pub fn decode_or_report<'a>(
    cur: &mut Cursor<'a>,
    schema: &'static Schema,
    end: usize,
    opts: &DecodeOptions,
    tree: &mut ProtoTree,
) -> Result<Node<'a>> {
    match decode_by_schema(cur, schema, end, opts) {
        Ok(node) => {
            tree.add(emit_node(&node, cur.tvb()));
            Ok(node)
        }
        Err(e) => {
            report_error(tree, cur.tvb(), &e, end);
            Err(e)
        }
    }
}
