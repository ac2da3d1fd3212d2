use anyhow::Result;
use tracing::trace;

use berdissect_api as api;
use api::config::{Config, DecodeOptions};
use api::dissector::{Builder as DissectorBuilder, Dissector};
use api::error;
use api::tree::{FieldEvent, ProtoTree};
use api::tvb::Tvb;
use berdissect_utils::ber::{Cursor, Node, Value};
use berdissect_utils::dissectors::decode_or_report;

mod filter;
mod schema;

pub use filter::filter_to_string;
pub use schema::{FILTER, LDAP_MESSAGE, RESULT_CODES};

/// Attribute values are shown as text when they are printable UTF-8, in hex
/// otherwise
pub(crate) fn printable(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) if !s.chars().any(|c| c.is_control()) => s.to_string(),
        _ => hex::encode(raw),
    }
}

#[derive(Clone, Debug, Default)]
struct Builder {}

impl DissectorBuilder for Builder {
    fn name(&self) -> &'static str {
        "ldap"
    }

    fn build(&self, _: &Config) -> Result<Box<dyn Dissector>> {
        Ok(Box::new(Ldap::default()))
    }
}

#[derive(Clone, Debug, Default)]
struct Ldap {}

impl Dissector for Ldap {
    fn name(&self) -> &'static str {
        "ldap"
    }

    /// A buffer may carry several LDAPMessages back to back
    fn dissect(
        &self,
        tvb: Tvb<'_>,
        tree: &mut ProtoTree,
        opts: &DecodeOptions,
    ) -> error::Result<usize> {
        let mut cur = Cursor::new(tvb);
        let end = tvb.reported_len();
        while !cur.is_exhausted() {
            let msg = decode_or_report(&mut cur, &LDAP_MESSAGE, end, opts, tree)?;
            if let Some(item) = tree.items.last_mut() {
                annotate(item, &msg);
            }
        }
        Ok(cur.offset())
    }
}

/// Summary line on the message, filter string on search requests
fn annotate(item: &mut FieldEvent, msg: &Node<'_>) {
    let id = msg.child("messageID").and_then(|n| n.as_uint()).unwrap_or(0);
    let op = match msg.child("protocolOp").and_then(|n| n.chosen()) {
        Some(op) => op,
        None => return,
    };
    trace!(id, op = op.name, "ldap message");
    item.display = Some(format!("{}({})", op.name, id));

    if let Some(filter) = op.child("filter") {
        if let Some(filter_item) = item.find_mut("filter") {
            filter_item.display = Some(filter_to_string(filter));
        }
    }
    if let Some(code) = op.child("resultCode") {
        if let Value::Enumerated(_, Some(label)) = code.value {
            item.display = Some(format!("{}({}) {}", op.name, id, label));
        }
    }
}

pub fn new_builder() -> Box<dyn DissectorBuilder> {
    Box::new(Builder::default())
}
