use std::convert::TryFrom;

use anyhow::Result;
use kerberos_parser::krb5::{EncryptionType, MessageType, NameType, PAType};
use nom::number::complete::be_u32;
use tracing::trace;

use berdissect_api as api;
use api::config::{Config, DecodeOptions};
use api::dissector::{Builder as DissectorBuilder, Dissector};
use api::error::{self, Error, ErrorKind};
use api::tree::{FieldEvent, FieldValue, ProtoTree};
use api::tvb::Tvb;
use berdissect_utils::ber::{Cursor, Node, TagClass};
use berdissect_utils::dissectors::{decode_or_report, report_error};

mod schema;

pub use schema::{AP_REQ, KRB5_MESSAGE};
use schema::PA_TGS_REQ;

const RECORD_MARK_LEN: usize = 4;

#[derive(Clone, Debug, Default)]
struct Builder {}

impl DissectorBuilder for Builder {
    fn name(&self) -> &'static str {
        "krb5"
    }

    fn build(&self, _: &Config) -> Result<Box<dyn Dissector>> {
        Ok(Box::new(Krb5::default()))
    }
}

#[derive(Clone, Debug, Default)]
struct Krb5 {}

impl Dissector for Krb5 {
    fn name(&self) -> &'static str {
        "krb5"
    }

    /// Over UDP the buffer starts with the message itself, over TCP every
    /// message is preceded by a 4 byte record mark
    fn dissect(
        &self,
        tvb: Tvb<'_>,
        tree: &mut ProtoTree,
        opts: &DecodeOptions,
    ) -> error::Result<usize> {
        match tvb.read_u8(0) {
            Ok(first) if TagClass::from_identifier(first) != TagClass::Application => {
                dissect_records(tvb, tree, opts)
            }
            _ => dissect_message(tvb, tree, opts),
        }
    }
}

fn record_mark(tvb: Tvb<'_>, offset: usize) -> error::Result<usize> {
    let raw = tvb.read(offset, RECORD_MARK_LEN)?;
    let (_, mark) = be_u32::<_, nom::error::Error<&[u8]>>(raw)
        .map_err(|_| Error::new(ErrorKind::Truncated, offset))?;
    // The high bit is reserved for a length extension nobody uses
    if mark & 0x8000_0000 != 0 {
        return Err(Error::new(ErrorKind::WrongType, offset));
    }
    Ok(mark as usize)
}

fn dissect_records(tvb: Tvb<'_>, tree: &mut ProtoTree, opts: &DecodeOptions) -> error::Result<usize> {
    let mut offset = 0;
    while offset < tvb.reported_len() {
        let record = offset + RECORD_MARK_LEN;
        let sub = match record_mark(tvb, offset).and_then(|len| Ok((len, tvb.subset(record, len)?))) {
            Ok((len, sub)) => {
                tree.add(FieldEvent::new(
                    "record-mark",
                    tvb.absolute(offset),
                    RECORD_MARK_LEN,
                    FieldValue::Uint(len as u64),
                ));
                sub
            }
            Err(e) => {
                report_error(tree, tvb, &e, tvb.reported_len());
                return Err(e);
            }
        };
        let consumed = dissect_message(sub, tree, opts).map_err(|e| e.rebase(record))?;
        offset = record + consumed.max(sub.reported_len());
    }
    Ok(offset)
}

fn dissect_message(tvb: Tvb<'_>, tree: &mut ProtoTree, opts: &DecodeOptions) -> error::Result<usize> {
    let mut cur = Cursor::new(tvb);
    let msg = decode_or_report(&mut cur, &KRB5_MESSAGE, tvb.reported_len(), opts, tree)?;
    trace!(msg = msg.name, "kerberos message");
    if let Some(item) = tree.items.last_mut() {
        label(item);
        let embedded = dissect_pa_tgs_req(tvb, &msg, item, opts);
        item.display = Some(summary(&msg));
        embedded?;
    }
    Ok(cur.offset())
}

/// A TGS-REQ authenticates with an AP-REQ carried in its PA-TGS-REQ padata
fn dissect_pa_tgs_req(
    tvb: Tvb<'_>,
    msg: &Node<'_>,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    let padata = match msg.child("padata") {
        Some(padata) => padata,
        None => return Ok(()),
    };
    let padata_item = match item.find_mut("padata") {
        Some(padata_item) => padata_item,
        None => return Ok(()),
    };
    for (pa, pa_item) in padata.children().iter().zip(padata_item.children.iter_mut()) {
        if pa.child("padata-type").and_then(|n| n.as_int()) != Some(PA_TGS_REQ) {
            continue;
        }
        let value = match pa.child("padata-value") {
            Some(value) => value.inner(),
            None => continue,
        };
        let sub = tvb.subset(value.content_offset(), value.content_len)?;
        let mut embedded = ProtoTree::new();
        let r = decode_or_report(
            &mut Cursor::new(sub),
            &AP_REQ,
            sub.reported_len(),
            opts,
            &mut embedded,
        );
        if let Some(value_item) = pa_item.find_mut("padata-value") {
            for mut e in embedded.items {
                label(&mut e);
                value_item.children.push(e);
            }
        }
        r.map_err(|e| e.rebase(value.content_offset()))?;
    }
    Ok(())
}

/// Symbolic names for the numbers Kerberos is full of
fn label(item: &mut FieldEvent) {
    if let FieldValue::Int(v) = item.value {
        let display = match item.name.as_str() {
            "msg-type" => u32::try_from(v).ok().map(|v| format!("{:?}", MessageType(v))),
            "etype" => i32::try_from(v).ok().map(|v| format!("{:?}", EncryptionType(v))),
            "padata-type" => i32::try_from(v).ok().map(|v| format!("{:?}", PAType(v))),
            "name-type" => i32::try_from(v).ok().map(|v| format!("{:?}", NameType(v))),
            _ => None,
        };
        if display.is_some() {
            item.display = display;
        }
    }
    for child in &mut item.children {
        label(child);
    }
}

fn principal(name: &Node<'_>) -> Option<String> {
    let parts: Vec<&str> = name
        .child("name-string")?
        .children()
        .iter()
        .filter_map(|n| n.as_str())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn summary(msg: &Node<'_>) -> String {
    let body = msg.child("req-body");
    let lookup = |name: &str| body.and_then(|b| b.child(name)).or_else(|| msg.child(name));

    let mut parts = vec![msg.name.to_string()];
    if let Some(cname) = lookup("cname").and_then(principal) {
        parts.push(format!("cname={}", cname));
    }
    let realm = lookup("realm").or_else(|| msg.child("crealm"));
    if let Some(realm) = realm.and_then(|n| n.as_str()) {
        parts.push(format!("realm={}", realm));
    }
    if let Some(sname) = lookup("sname").and_then(principal) {
        parts.push(format!("sname={}", sname));
    }
    if let Some(code) = msg.child("error-code").and_then(|n| n.as_int()) {
        parts.push(format!("error-code={}", code));
    }
    parts.join(" ")
}

pub fn new_builder() -> Box<dyn DissectorBuilder> {
    Box::new(Builder::default())
}

#[cfg(test)]
mod test {
    use super::*;

    const AS_REQ: &[u8] = &[
        0x6a, 0x70, 0x30, 0x6e, 0xa1, 0x03, 0x02, 0x01, 0x05, 0xa2, 0x03, 0x02, 0x01, 0x0a, 0xa4,
        0x62, 0x30, 0x60, 0xa0, 0x07, 0x03, 0x05, 0x00, 0x40, 0x81, 0x00, 0x10, 0xa1, 0x12, 0x30,
        0x10, 0xa0, 0x03, 0x02, 0x01, 0x01, 0xa1, 0x09, 0x30, 0x07, 0x1b, 0x05, 0x61, 0x6c, 0x69,
        0x63, 0x65, 0xa2, 0x03, 0x1b, 0x01, 0x52, 0xa3, 0x16, 0x30, 0x14, 0xa0, 0x03, 0x02, 0x01,
        0x02, 0xa1, 0x0d, 0x30, 0x0b, 0x1b, 0x06, 0x6b, 0x72, 0x62, 0x74, 0x67, 0x74, 0x1b, 0x01,
        0x52, 0xa5, 0x11, 0x18, 0x0f, 0x32, 0x30, 0x33, 0x37, 0x30, 0x39, 0x31, 0x33, 0x30, 0x32,
        0x34, 0x38, 0x30, 0x35, 0x5a, 0xa7, 0x07, 0x02, 0x05, 0x00, 0x9c, 0x2a, 0x31, 0x05, 0xa8,
        0x08, 0x30, 0x06, 0x02, 0x01, 0x12, 0x02, 0x01, 0x11,
    ];

    const TGS_REQ: &[u8] = &[
        0x6c, 0x81, 0xc8, 0x30, 0x81, 0xc5, 0xa1, 0x03, 0x02, 0x01, 0x05, 0xa2, 0x03, 0x02, 0x01,
        0x0c, 0xa3, 0x69, 0x30, 0x67, 0x30, 0x65, 0xa1, 0x03, 0x02, 0x01, 0x01, 0xa2, 0x5e, 0x04,
        0x5c, 0x6e, 0x5a, 0x30, 0x58, 0xa0, 0x03, 0x02, 0x01, 0x05, 0xa1, 0x03, 0x02, 0x01, 0x0e,
        0xa2, 0x07, 0x03, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0xa3, 0x35, 0x61, 0x33, 0x30, 0x31,
        0xa0, 0x03, 0x02, 0x01, 0x05, 0xa1, 0x03, 0x1b, 0x01, 0x52, 0xa2, 0x16, 0x30, 0x14, 0xa0,
        0x03, 0x02, 0x01, 0x02, 0xa1, 0x0d, 0x30, 0x0b, 0x1b, 0x06, 0x6b, 0x72, 0x62, 0x74, 0x67,
        0x74, 0x1b, 0x01, 0x52, 0xa3, 0x0d, 0x30, 0x0b, 0xa0, 0x03, 0x02, 0x01, 0x12, 0xa2, 0x04,
        0x04, 0x02, 0xaa, 0xbb, 0xa4, 0x0c, 0x30, 0x0a, 0xa0, 0x03, 0x02, 0x01, 0x12, 0xa2, 0x03,
        0x04, 0x01, 0xcc, 0xa4, 0x4e, 0x30, 0x4c, 0xa0, 0x07, 0x03, 0x05, 0x00, 0x40, 0x81, 0x00,
        0x10, 0xa2, 0x03, 0x1b, 0x01, 0x52, 0xa3, 0x16, 0x30, 0x14, 0xa0, 0x03, 0x02, 0x01, 0x02,
        0xa1, 0x0d, 0x30, 0x0b, 0x1b, 0x06, 0x6b, 0x72, 0x62, 0x74, 0x67, 0x74, 0x1b, 0x01, 0x52,
        0xa5, 0x11, 0x18, 0x0f, 0x32, 0x30, 0x33, 0x37, 0x30, 0x39, 0x31, 0x33, 0x30, 0x32, 0x34,
        0x38, 0x30, 0x35, 0x5a, 0xa7, 0x07, 0x02, 0x05, 0x00, 0x9c, 0x2a, 0x31, 0x05, 0xa8, 0x08,
        0x30, 0x06, 0x02, 0x01, 0x12, 0x02, 0x01, 0x11,
    ];

    const KRB_ERROR: &[u8] = &[
        0x7e, 0x5b, 0x30, 0x59, 0xa0, 0x03, 0x02, 0x01, 0x05, 0xa1, 0x03, 0x02, 0x01, 0x1e, 0xa4,
        0x11, 0x18, 0x0f, 0x32, 0x30, 0x33, 0x37, 0x30, 0x39, 0x31, 0x33, 0x30, 0x32, 0x34, 0x38,
        0x30, 0x35, 0x5a, 0xa5, 0x03, 0x02, 0x01, 0x07, 0xa6, 0x03, 0x02, 0x01, 0x06, 0xa9, 0x03,
        0x1b, 0x01, 0x52, 0xaa, 0x16, 0x30, 0x14, 0xa0, 0x03, 0x02, 0x01, 0x02, 0xa1, 0x0d, 0x30,
        0x0b, 0x1b, 0x06, 0x6b, 0x72, 0x62, 0x74, 0x67, 0x74, 0x1b, 0x01, 0x52, 0xab, 0x13, 0x1b,
        0x11, 0x6e, 0x6f, 0x20, 0x73, 0x75, 0x63, 0x68, 0x20, 0x70, 0x72, 0x69, 0x6e, 0x63, 0x69,
        0x70, 0x61, 0x6c,
    ];

    fn dissect(buf: &[u8]) -> (error::Result<usize>, ProtoTree) {
        let mut tree = ProtoTree::new();
        let r = Krb5::default().dissect(Tvb::new(buf), &mut tree, &DecodeOptions::default());
        (r, tree)
    }

    fn over_tcp(msg: &[u8]) -> Vec<u8> {
        let mut buf = (msg.len() as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(msg);
        buf
    }

    #[test]
    fn as_req() {
        let (r, tree) = dissect(AS_REQ);
        assert_eq!(r.unwrap(), AS_REQ.len());
        let msg = &tree.items[0];
        assert_eq!(msg.name, "as-req");
        assert_eq!(msg.display.as_deref(), Some("as-req cname=alice realm=R sname=krbtgt/R"));
        assert!(tree.find("msg-type").unwrap().display.is_some());
        assert!(tree.find("etype").unwrap().children[0].display.is_some());
        assert_eq!(tree.find("nonce").unwrap().value, FieldValue::Uint(0x9c2a_3105));
        assert_eq!(tree.find("name").unwrap().value, FieldValue::Text("alice".into()));
        assert_eq!(
            tree.find("kdc-options").unwrap().value,
            FieldValue::OctetString(vec![0x40, 0x81, 0x00, 0x10])
        );
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn record_marked() {
        let buf = over_tcp(AS_REQ);
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap(), buf.len());
        assert_eq!(tree.items.len(), 2);
        assert_eq!(tree.items[0].name, "record-mark");
        assert_eq!(tree.items[0].value, FieldValue::Uint(AS_REQ.len() as u64));
        assert_eq!(tree.items[1].offset, 4);
        assert_eq!(tree.find("name").unwrap().offset, 44);
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn several_records() {
        let mut buf = over_tcp(AS_REQ);
        buf.extend(over_tcp(KRB_ERROR));
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap(), buf.len());
        assert_eq!(tree.items.len(), 4);
        assert_eq!(tree.items[3].name, "krb-error");
        assert_eq!(tree.items[3].offset, AS_REQ.len() + 8);
    }

    #[test]
    fn oversized_record() {
        let mut buf = over_tcp(AS_REQ);
        buf[3] += 1;
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap_err().kind, ErrorKind::Bounds);
        assert!(tree.items[0].is_error());
        assert_eq!(tree.items[0].offset, 4);
    }

    #[test]
    fn tgs_req_with_embedded_ap_req() {
        let (r, tree) = dissect(TGS_REQ);
        assert_eq!(r.unwrap(), TGS_REQ.len());
        assert_eq!(tree.items[0].display.as_deref(), Some("tgs-req realm=R sname=krbtgt/R"));
        let ap_req = tree.find("ap-req").unwrap();
        assert_eq!(ap_req.offset, 31);
        assert!(ap_req.find("msg-type").unwrap().display.is_some());
        assert_eq!(tree.find("tkt-vno").unwrap().offset, 60);
        assert!(tree.find("padata-type").unwrap().display.is_some());
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn krb_error() {
        let (r, tree) = dissect(KRB_ERROR);
        assert_eq!(r.unwrap(), KRB_ERROR.len());
        assert_eq!(
            tree.items[0].display.as_deref(),
            Some("krb-error realm=R sname=krbtgt/R error-code=6")
        );
        assert_eq!(
            tree.find("e-text").unwrap().value,
            FieldValue::Text("no such principal".into())
        );
    }

    #[test]
    fn unknown_application_tag() {
        let buf = [0x70, 0x00];
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap_err().kind, ErrorKind::UnexpectedTag);
        assert!(tree.items[0].is_error());
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        let tcp = over_tcp(AS_REQ);
        for pdu in &[AS_REQ, TGS_REQ, KRB_ERROR, &tcp[..]] {
            for k in 0..pdu.len() {
                let tvb = Tvb::with_snaplen(pdu, k);
                let mut tree = ProtoTree::new();
                let err = Krb5::default()
                    .dissect(tvb, &mut tree, &DecodeOptions::default())
                    .unwrap_err();
                assert_eq!(err.kind, ErrorKind::ReportedBounds, "snaplen {}", k);
                assert!(err.offset <= k);
                assert!(tree.has_errors());
            }
        }
    }
}
