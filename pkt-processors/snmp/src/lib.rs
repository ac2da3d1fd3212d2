use std::net::Ipv4Addr;

use anyhow::Result;
use tracing::trace;

use berdissect_api as api;
use api::config::{Config, DecodeOptions};
use api::dissector::{Builder as DissectorBuilder, Dissector};
use api::error;
use api::tree::{FieldEvent, ProtoTree};
use api::tvb::Tvb;
use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{decode_uint_value, expect_header, Cursor, Node, TagHeader, Value};
use berdissect_utils::dissectors::decode_or_report;

mod schema;

pub use schema::{COMMUNITY_MESSAGE, PDUS, USM_PARAMETERS, V3_MESSAGE};
use schema::USM_SECURITY_MODEL;

pub(crate) fn printable(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(s) if !s.chars().any(|c| c.is_control()) => s.to_string(),
        _ => hex::encode(raw),
    }
}

pub(crate) fn ip_address(raw: &[u8]) -> String {
    match raw {
        [a, b, c, d] => Ipv4Addr::new(*a, *b, *c, *d).to_string(),
        _ => hex::encode(raw),
    }
}

/// What later parts of a message need to know about earlier ones
#[derive(Debug, Default, PartialEq)]
struct MessageContext {
    version: Option<&'static str>,
    security_model: Option<u64>,
    user: Option<String>,
    pdu: Option<&'static str>,
}

impl MessageContext {
    fn from_message(msg: &Node<'_>) -> Self {
        let version = match msg.child("version").map(|n| &n.value) {
            Some(Value::Enumerated(_, label)) => *label,
            _ => None,
        };
        let security_model = msg
            .child("msgGlobalData")
            .and_then(|g| g.child("msgSecurityModel"))
            .and_then(|n| n.as_uint());
        let pdu = match msg.child("plaintext") {
            Some(scoped) => scoped.child("data").and_then(|n| n.chosen()),
            None => msg.child("data").and_then(|n| n.chosen()),
        };
        let pdu = match (pdu, msg.child("encryptedPDU")) {
            (Some(pdu), _) => Some(pdu.name),
            (None, Some(_)) => Some("encryptedPDU"),
            (None, None) => None,
        };
        MessageContext {
            version,
            security_model,
            user: None,
            pdu,
        }
    }

    fn summary(&self) -> String {
        let mut s = format!(
            "{} {}",
            self.version.unwrap_or("unknown"),
            self.pdu.unwrap_or("unknown")
        );
        if let Some(user) = &self.user {
            s.push_str(" user=");
            s.push_str(user);
        }
        s
    }
}

/// Peek at the version to pick the message layout
fn probe_version(cur: &Cursor<'_>) -> error::Result<u64> {
    let mut probe = *cur;
    expect_header(&mut probe, SEQUENCE)?;
    let at = probe.offset();
    let len = expect_header(&mut probe, TagHeader::universal(universal::INTEGER_TAG, false))?
        .definite(at)?;
    decode_uint_value(&mut probe, len)
}

/// Decode the USM parameters nested in msgSecurityParameters
///
/// Their items, or the error item, become children of the
/// msgSecurityParameters item.
fn dissect_usm(
    tvb: Tvb<'_>,
    msg: &Node<'_>,
    ctx: &mut MessageContext,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    if ctx.security_model != Some(USM_SECURITY_MODEL) {
        return Ok(());
    }
    let params = match msg.child("msgSecurityParameters") {
        Some(params) if params.content_len > 0 => params,
        _ => return Ok(()),
    };
    let sub = tvb.subset(params.content_offset(), params.content_len)?;
    let mut usm_tree = ProtoTree::new();
    let mut cur = Cursor::new(sub);
    let usm = decode_or_report(&mut cur, &USM_PARAMETERS, sub.reported_len(), opts, &mut usm_tree);
    if let Some(params_item) = item.find_mut("msgSecurityParameters") {
        params_item.children.append(&mut usm_tree.items);
    }
    let usm = usm.map_err(|e| e.rebase(params.content_offset()))?;
    ctx.user = usm
        .child("msgUserName")
        .and_then(|n| n.as_str())
        .map(str::to_string);
    Ok(())
}

fn annotate(item: &mut FieldEvent, msg: &Node<'_>, ctx: &MessageContext) {
    item.display = Some(ctx.summary());

    let bindings = match msg.child("plaintext") {
        Some(scoped) => scoped.child("data"),
        None => msg.child("data"),
    }
    .and_then(|pdu| pdu.child("variable-bindings"));
    let bindings = match bindings {
        Some(b) => b,
        None => return,
    };
    if let Some(list) = item.find_mut("variable-bindings") {
        for (vb_item, vb) in list.children.iter_mut().zip(bindings.children()) {
            let name = vb.child("name").and_then(|n| n.as_oid());
            let kind = vb.child("value").and_then(|n| n.chosen()).map(|n| n.name);
            if let (Some(name), Some(kind)) = (name, kind) {
                vb_item.display = Some(format!("{}: {}", name, kind));
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Builder {}

impl DissectorBuilder for Builder {
    fn name(&self) -> &'static str {
        "snmp"
    }

    fn build(&self, _: &Config) -> Result<Box<dyn Dissector>> {
        Ok(Box::new(Snmp::default()))
    }
}

#[derive(Clone, Debug, Default)]
struct Snmp {}

impl Dissector for Snmp {
    fn name(&self) -> &'static str {
        "snmp"
    }

    fn dissect(
        &self,
        tvb: Tvb<'_>,
        tree: &mut ProtoTree,
        opts: &DecodeOptions,
    ) -> error::Result<usize> {
        let mut cur = Cursor::new(tvb);
        let schema = match probe_version(&cur) {
            Ok(3) => &V3_MESSAGE,
            _ => &COMMUNITY_MESSAGE,
        };
        let msg = decode_or_report(&mut cur, schema, tvb.reported_len(), opts, tree)?;
        let mut ctx = MessageContext::from_message(&msg);
        if let Some(item) = tree.items.last_mut() {
            let usm = dissect_usm(tvb, &msg, &mut ctx, item, opts);
            annotate(item, &msg, &ctx);
            usm?;
        }
        trace!(version = ?ctx.version, pdu = ?ctx.pdu, "snmp message");
        Ok(cur.offset())
    }
}

pub fn new_builder() -> Box<dyn DissectorBuilder> {
    Box::new(Builder::default())
}
