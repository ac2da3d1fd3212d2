//! COPS, RFC 2748, with the COPS-PR client type of RFC 3084
//!
//! The fixed header and the object headers are plain binary and go through
//! nom. BER only shows up inside COPS-PR sub-objects.

#[macro_use]
extern crate enum_primitive_derive;

use std::net::{Ipv4Addr, Ipv6Addr};

use anyhow::Result;
use num_traits::FromPrimitive;
use tracing::{debug, trace};

use berdissect_api as api;
use api::config::{Config, DecodeOptions};
use api::dissector::{Builder as DissectorBuilder, Dissector};
use api::error::{self, Error, ErrorKind};
use api::tree::{FieldEvent, FieldValue, ProtoTree};
use api::tvb::Tvb;
use berdissect_utils::ber::Cursor;
use berdissect_utils::dissectors::report_error;

mod consts;
mod parser;
mod pr;

use consts::*;
use parser::{
    padding, parse_common_header, parse_object_header, read_u16, read_u32, read_with,
    CommonHeader, ObjectHeader, COMMON_HEADER_LEN, MESSAGE_LENGTH_OFFSET, OBJECT_HEADER_LEN,
};

/// Item at an offset of `tvb`, placed in top level packet coordinates
pub(crate) fn field<S: Into<String>>(
    tvb: Tvb<'_>,
    name: S,
    at: usize,
    len: usize,
    value: FieldValue,
) -> FieldEvent {
    FieldEvent::new(name, tvb.absolute(at), len, value)
}

fn labelled(tvb: Tvb<'_>, name: &str, at: usize, len: usize, code: u16, table: &[(u16, &'static str)]) -> FieldEvent {
    let item = field(tvb, name, at, len, FieldValue::Uint(code.into()));
    match label(table, code) {
        Some(text) => item.with_display(format!("{} ({})", text, code)),
        None => item,
    }
}

fn read_header(cur: &mut Cursor<'_>) -> error::Result<CommonHeader> {
    let header = read_with(cur, COMMON_HEADER_LEN, parse_common_header)?;
    if header.version != VERSION {
        return Err(Error::new(ErrorKind::WrongType, 0));
    }
    if (header.length as usize) < COMMON_HEADER_LEN {
        return Err(Error::new(ErrorKind::WrongLengthForType, MESSAGE_LENGTH_OFFSET));
    }
    Ok(header)
}

fn header_fields(tvb: Tvb<'_>, header: &CommonHeader, item: &mut FieldEvent) {
    // Version and flags share the first octet
    let version = item.push(field(tvb, "version", 0, 1, FieldValue::Uint(header.version.into())));
    let flags = field(tvb, "flags", 0, 1, FieldValue::Uint(header.flags.into()));
    version.push(if header.is_solicited() {
        flags.with_display("solicited")
    } else {
        flags
    });
    let op = field(tvb, "op-code", 1, 1, FieldValue::Uint(header.op_code.into()));
    item.push(match OpCode::from_u8(header.op_code) {
        Some(code) => op.with_display(<&'static str>::from(code)),
        None => op,
    });
    item.push(labelled(tvb, "client-type", 2, 2, header.client_type, CLIENT_TYPES));
    item.push(field(
        tvb,
        "message-length",
        MESSAGE_LENGTH_OFFSET,
        4,
        FieldValue::Uint(header.length.into()),
    ));
}

/// Record `err` in the innermost item still being filled when it happened
fn attach_error(item: &mut FieldEvent, err: &Error) {
    let end = item.range().end.max(err.offset);
    match item.children.last_mut() {
        Some(last) if !last.children.is_empty() && last.range().contains(&err.offset) => {
            attach_error(last, err)
        }
        _ => {
            item.push(FieldEvent::error(err, end));
        }
    }
}

fn context(cur: &mut Cursor<'_>, item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let r_type = read_u16(cur)?;
    let m_type = read_u16(cur)?;
    let names: Vec<&str> = CONTEXT_TYPES
        .iter()
        .filter(|(bit, _)| r_type & bit != 0)
        .map(|(_, name)| *name)
        .collect();
    let r_item = field(cur.tvb(), "r-type", at, 2, FieldValue::Uint(r_type.into()));
    item.push(if names.is_empty() {
        r_item
    } else {
        r_item.with_display(names.join(", "))
    });
    item.push(field(cur.tvb(), "m-type", at + 2, 2, FieldValue::Uint(m_type.into())));
    Ok(())
}

fn code_pair(cur: &mut Cursor<'_>, name: &str, table: &[(u16, &'static str)], item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let code = read_u16(cur)?;
    let sub_code = read_u16(cur)?;
    let code = labelled(cur.tvb(), &format!("{}-code", name), at, 2, code, table);
    item.display = code.display.clone();
    item.push(code);
    item.push(field(
        cur.tvb(),
        format!("{}-sub-code", name),
        at + 2,
        2,
        FieldValue::Uint(sub_code.into()),
    ));
    Ok(())
}

fn address(cur: &mut Cursor<'_>, ctype: u8, item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let (name, text) = match ctype {
        1 => {
            let raw = cur.read(4)?;
            ("ipv4-address", Ipv4Addr::new(raw[0], raw[1], raw[2], raw[3]).to_string())
        }
        2 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(cur.read(16)?);
            ("ipv6-address", Ipv6Addr::from(octets).to_string())
        }
        _ => return Ok(()),
    };
    let len = cur.offset() - at;
    let raw = cur.tvb().read(at, len)?;
    item.display = Some(text.clone());
    item.push(field(cur.tvb(), name, at, len, FieldValue::OctetString(raw.to_vec())).with_display(text));
    Ok(())
}

fn interface(cur: &mut Cursor<'_>, ctype: u8, item: &mut FieldEvent) -> error::Result<()> {
    address(cur, ctype, item)?;
    if ctype == 1 || ctype == 2 {
        let at = cur.offset();
        let ifindex = read_u32(cur)?;
        item.push(field(cur.tvb(), "ifindex", at, 4, FieldValue::Uint(ifindex.into())));
    }
    Ok(())
}

fn pdp_address(cur: &mut Cursor<'_>, ctype: u8, item: &mut FieldEvent) -> error::Result<()> {
    address(cur, ctype, item)?;
    if ctype == 1 || ctype == 2 {
        cur.skip(2)?;
        let at = cur.offset();
        let port = read_u16(cur)?;
        item.push(field(cur.tvb(), "tcp-port", at, 2, FieldValue::Uint(port.into())));
    }
    Ok(())
}

fn timer(cur: &mut Cursor<'_>, item: &mut FieldEvent) -> error::Result<()> {
    cur.skip(2)?;
    let at = cur.offset();
    let seconds = read_u16(cur)?;
    item.display = Some(format!("{} seconds", seconds));
    item.push(field(cur.tvb(), "timer", at, 2, FieldValue::Uint(seconds.into())));
    Ok(())
}

fn pep_id(cur: &mut Cursor<'_>, item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let raw = cur.read(cur.remaining())?;
    let text = String::from_utf8_lossy(raw).trim_end_matches('\0').to_string();
    item.display = Some(text.clone());
    item.push(field(cur.tvb(), "pep-id", at, raw.len(), FieldValue::Text(text)));
    Ok(())
}

fn integrity(cur: &mut Cursor<'_>, item: &mut FieldEvent) -> error::Result<()> {
    let at = cur.offset();
    let key_id = read_u32(cur)?;
    let sequence = read_u32(cur)?;
    item.push(field(cur.tvb(), "key-id", at, 4, FieldValue::Uint(key_id.into())));
    item.push(field(cur.tvb(), "sequence-number", at + 4, 4, FieldValue::Uint(sequence.into())));
    let at = cur.offset();
    let digest = cur.read(cur.remaining())?;
    item.push(field(
        cur.tvb(),
        "keyed-message-digest",
        at,
        digest.len(),
        FieldValue::OctetString(digest.to_vec()),
    ));
    Ok(())
}

/// Decode one object's content according to its class and type
fn object_content(
    cur: &mut Cursor<'_>,
    obj: &ObjectHeader,
    header: &CommonHeader,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    let cops_pr = header.client_type == CLIENT_TYPE_COPS_PR;
    match CNum::from_u8(obj.num) {
        Some(CNum::Context) => context(cur, item)?,
        Some(CNum::InInterface) | Some(CNum::OutInterface) => interface(cur, obj.ctype, item)?,
        Some(CNum::Reason) => code_pair(cur, "reason", REASONS, item)?,
        Some(CNum::Decision) | Some(CNum::LpdpDecision) => match obj.ctype {
            DECISION_FLAGS => {
                let at = cur.offset();
                let command = read_u16(cur)?;
                let flags = read_u16(cur)?;
                let command = labelled(cur.tvb(), "command-code", at, 2, command, DECISION_COMMANDS);
                item.display = command.display.clone();
                item.push(command);
                let flags_item = field(cur.tvb(), "flags", at + 2, 2, FieldValue::Uint(flags.into()));
                item.push(if flags & 0x01 != 0 {
                    flags_item.with_display("Trigger Error")
                } else {
                    flags_item
                });
            }
            DECISION_NAMED if cops_pr => pr::dissect_named_data(cur, item, opts)?,
            _ => {}
        },
        Some(CNum::Error) => code_pair(cur, "error", ERRORS, item)?,
        Some(CNum::ClientSi) if cops_pr && obj.ctype == CLIENT_SI_NAMED => {
            pr::dissect_named_data(cur, item, opts)?
        }
        Some(CNum::KeepAliveTimer) | Some(CNum::AccountingTimer) => timer(cur, item)?,
        Some(CNum::PepId) => pep_id(cur, item)?,
        Some(CNum::ReportType) => {
            let at = cur.offset();
            let report = read_u16(cur)?;
            cur.skip(2)?;
            let report = labelled(cur.tvb(), "report-type", at, 2, report, REPORT_TYPES);
            item.display = report.display.clone();
            item.push(report);
        }
        Some(CNum::PdpRedirectAddress) | Some(CNum::LastPdpAddress) => {
            pdp_address(cur, obj.ctype, item)?
        }
        Some(CNum::Integrity) => integrity(cur, item)?,
        Some(CNum::Handle) | Some(CNum::ClientSi) | None => {}
    }
    if !cur.is_exhausted() {
        let at = cur.offset();
        let rest = cur.read(cur.remaining())?;
        item.push(field(cur.tvb(), "data", at, rest.len(), FieldValue::OctetString(rest.to_vec())));
    }
    Ok(())
}

/// Walk the objects following the common header, up to the message length
///
/// An object whose content fails to decode gets the error attached and the
/// walk moves on to the next one, since its length is still trusted. A bad
/// object header, or a capture ending inside an object, stops the walk. The
/// first error met is returned.
fn dissect_objects(
    cur: &mut Cursor<'_>,
    header: &CommonHeader,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    let base = cur.tvb().base_offset();
    let mut first_err = None;
    if let Err(e) = walk_objects(cur, header, item, opts, &mut first_err) {
        attach_error(item, &e.rebase(base));
        first_err.get_or_insert(e);
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn walk_objects(
    cur: &mut Cursor<'_>,
    header: &CommonHeader,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
    first_err: &mut Option<Error>,
) -> error::Result<()> {
    let mut body = cur
        .limit(header.length as usize)
        .map_err(|_| Error::new(ErrorKind::Bounds, MESSAGE_LENGTH_OFFSET))?;
    let tvb = body.tvb();
    while !body.is_exhausted() {
        let at = body.offset();
        let obj = read_with(&mut body, OBJECT_HEADER_LEN, parse_object_header)?;
        let len = obj.length as usize;
        if len < OBJECT_HEADER_LEN {
            return Err(Error::new(ErrorKind::WrongLengthForType, at));
        }
        let mut content = body.bounded(len - OBJECT_HEADER_LEN)?;
        let name: &'static str = CNum::from_u8(obj.num).map(|c| c.into()).unwrap_or("object");
        let obj_item = item.push(field(tvb, name, at, len, FieldValue::None));
        obj_item.push(field(tvb, "length", at, 2, FieldValue::Uint(obj.length.into())));
        obj_item.push(field(tvb, "c-num", at + 2, 1, FieldValue::Uint(obj.num.into())));
        obj_item.push(field(tvb, "c-type", at + 3, 1, FieldValue::Uint(obj.ctype.into())));
        if let Err(e) = object_content(&mut content, &obj, header, obj_item, opts) {
            debug!(object = name, kind = %e.kind, offset = e.offset, "malformed cops object");
            attach_error(obj_item, &e.rebase(tvb.base_offset()));
            first_err.get_or_insert(e);
            // capture ends inside this object
            if e.kind == ErrorKind::ReportedBounds {
                break;
            }
        }
        trace!(object = name, offset = at, len, "cops object");

        body.skip(len - OBJECT_HEADER_LEN)?;
        let pad = padding(len).min(body.remaining());
        body.skip(pad)?;
    }
    cur.advance_to(&body)
}

fn summary(header: &CommonHeader) -> String {
    let op: &'static str = OpCode::from_u8(header.op_code).map(|o| o.into()).unwrap_or("unknown");
    match label(CLIENT_TYPES, header.client_type) {
        Some(client) => format!("{} {}", op, client),
        None => format!("{} client-type={:#06x}", op, header.client_type),
    }
}

#[derive(Clone, Debug, Default)]
struct Builder {}

impl DissectorBuilder for Builder {
    fn name(&self) -> &'static str {
        "cops"
    }

    fn build(&self, _: &Config) -> Result<Box<dyn Dissector>> {
        Ok(Box::new(Cops::default()))
    }
}

#[derive(Clone, Debug, Default)]
struct Cops {}

impl Dissector for Cops {
    fn name(&self) -> &'static str {
        "cops"
    }

    fn dissect(
        &self,
        tvb: Tvb<'_>,
        tree: &mut ProtoTree,
        opts: &DecodeOptions,
    ) -> error::Result<usize> {
        let mut cur = Cursor::new(tvb);
        let header = match read_header(&mut cur) {
            Ok(header) => header,
            Err(e) => {
                report_error(tree, tvb, &e, tvb.reported_len());
                return Err(e);
            }
        };
        let item = tree.add(
            field(tvb, "cops", 0, header.length as usize, FieldValue::None)
                .with_display(summary(&header)),
        );
        header_fields(tvb, &header, item);
        dissect_objects(&mut cur, &header, item, opts)?;
        Ok(cur.offset())
    }
}

pub fn new_builder() -> Box<dyn DissectorBuilder> {
    Box::new(Builder::default())
}

#[cfg(test)]
mod test {
    use super::*;

    /// Solicited COPS-PR decision installing one instance
    const DECISION: &[u8] = &[
        0x11, 0x02, 0x00, 0x02, 0x00, 0x00, 0x00, 0x48, // header
        0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x00, 0x01, // handle
        0x00, 0x08, 0x02, 0x01, 0x00, 0x08, 0x00, 0x00, // context
        0x00, 0x08, 0x06, 0x01, 0x00, 0x01, 0x00, 0x00, // decision flags
        0x00, 0x28, 0x06, 0x05, // named decision
        0x00, 0x0e, 0x01, 0x01, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x02, 0x02, 0x01, 0x01, 0x01, 0x00,
        0x00, // prid
        0x00, 0x13, 0x03, 0x01, 0x30, 0x0d, 0x02, 0x01, 0x05, 0x04, 0x03, 0x61, 0x62, 0x63, 0x06,
        0x03, 0x2b, 0x06, 0x01, 0x00, // epd
    ];

    /// Failure report naming the instance and the class error
    const REPORT: &[u8] = &[
        0x10, 0x03, 0x00, 0x02, 0x00, 0x00, 0x00, 0x34, // header
        0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x00, 0x01, // handle
        0x00, 0x08, 0x0c, 0x01, 0x00, 0x02, 0x00, 0x00, // report type
        0x00, 0x1c, 0x09, 0x02, // named client si
        0x00, 0x0e, 0x06, 0x01, 0x06, 0x08, 0x2b, 0x06, 0x01, 0x02, 0x02, 0x01, 0x01, 0x01, 0x00,
        0x00, // error prid
        0x00, 0x08, 0x05, 0x01, 0x00, 0x03, 0x00, 0x02, // cperr
    ];

    const OPEN: &[u8] = &[
        0x10, 0x06, 0x00, 0x02, 0x00, 0x00, 0x00, 0x1c, // header
        0x00, 0x0c, 0x0b, 0x01, 0x70, 0x65, 0x70, 0x31, 0x00, 0x00, 0x00, 0x00, // pep id
        0x00, 0x08, 0x0a, 0x01, 0x00, 0x00, 0x00, 0x1e, // ka timer
    ];

    const CLOSE: &[u8] = &[
        0x10, 0x08, 0x00, 0x02, 0x00, 0x00, 0x00, 0x10, // header
        0x00, 0x08, 0x08, 0x01, 0x00, 0x06, 0x00, 0x00, // error
    ];

    fn dissect(buf: &[u8]) -> (error::Result<usize>, ProtoTree) {
        let mut tree = ProtoTree::new();
        let r = Cops::default().dissect(Tvb::new(buf), &mut tree, &DecodeOptions::default());
        (r, tree)
    }

    #[test]
    fn named_decision() {
        let (r, tree) = dissect(DECISION);
        assert_eq!(r.unwrap(), DECISION.len());
        let cops = &tree.items[0];
        assert_eq!(cops.display.as_deref(), Some("DEC COPS-PR"));
        assert_eq!(cops.find("flags").unwrap().display.as_deref(), Some("solicited"));
        assert_eq!(cops.find("r-type").unwrap().display.as_deref(), Some("Configuration"));
        assert_eq!(
            cops.find("command-code").unwrap().display.as_deref(),
            Some("Install (1)")
        );

        let prid = cops.find("prid").unwrap();
        assert_eq!(prid.offset, 36);
        assert_eq!(prid.display.as_deref(), Some("1.3.6.1.2.2.1.1.1"));
        let epd = cops.find("epd").unwrap();
        assert_eq!(epd.offset, 52);
        assert_eq!(epd.display.as_deref(), Some("3 attributes"));
        assert_eq!(cops.find("1.3.6.1.2.2.1.1.1.1").unwrap().value, FieldValue::Int(5));
        assert_eq!(
            cops.find("1.3.6.1.2.2.1.1.1.2").unwrap().value,
            FieldValue::OctetString(b"abc".to_vec())
        );
        assert_eq!(
            cops.find("1.3.6.1.2.2.1.1.1.3").unwrap().value,
            FieldValue::Oid("1.3.6.1".into())
        );
        assert!(tree.is_well_ordered());
        assert!(!tree.has_errors());
    }

    #[test]
    fn failure_report() {
        let (r, tree) = dissect(REPORT);
        assert_eq!(r.unwrap(), REPORT.len());
        assert_eq!(
            tree.find("report-type").unwrap().display.as_deref(),
            Some("Failure (2)")
        );
        assert_eq!(
            tree.find("error-prid").unwrap().display.as_deref(),
            Some("1.3.6.1.2.2.1.1.1")
        );
        let cperr = tree.find("cperr").unwrap();
        assert_eq!(cperr.display.as_deref(), Some("attrValueInvalid"));
        assert_eq!(cperr.find("error-sub-code").unwrap().value, FieldValue::Uint(2));
    }

    #[test]
    fn client_open_and_close() {
        let (r, tree) = dissect(OPEN);
        assert_eq!(r.unwrap(), OPEN.len());
        assert_eq!(tree.items[0].display.as_deref(), Some("OPN COPS-PR"));
        assert_eq!(
            tree.find("pep-id").unwrap().value,
            FieldValue::Text("pep1".into())
        );
        assert_eq!(
            tree.find("keep-alive-timer").unwrap().display.as_deref(),
            Some("30 seconds")
        );

        let (r, tree) = dissect(CLOSE);
        assert_eq!(r.unwrap(), CLOSE.len());
        assert_eq!(
            tree.find("error").unwrap().display.as_deref(),
            Some("Unsupported client (6)")
        );
    }

    #[test]
    fn bad_version() {
        let mut buf = CLOSE.to_vec();
        buf[0] = 0x20;
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap_err(), Error::new(ErrorKind::WrongType, 0));
        assert!(tree.items[0].is_error());
    }

    #[test]
    fn short_object_length() {
        let mut buf = CLOSE.to_vec();
        buf[9] = 0x02;
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap_err(), Error::new(ErrorKind::WrongLengthForType, 8));
        let malformed = tree.find("malformed").unwrap();
        assert_eq!(malformed.offset, 8);
        assert_eq!(malformed.range().end, CLOSE.len());
    }

    #[test]
    fn object_past_message() {
        let mut buf = CLOSE.to_vec();
        buf[9] = 0x10;
        let (r, _) = dissect(&buf);
        assert_eq!(r.unwrap_err(), Error::new(ErrorKind::Bounds, 12));
    }

    #[test]
    fn malformed_epd() {
        // SEQUENCE length runs past the sub-object
        let mut buf = DECISION.to_vec();
        buf[57] = 0x20;
        let (r, tree) = dissect(&buf);
        let err = r.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Bounds);
        let epd = tree.find("epd").unwrap();
        assert!(epd.children.last().unwrap().is_error());
        assert_eq!(epd.children.last().unwrap().offset, err.offset);
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn malformed_object_does_not_hide_the_next() {
        let mut buf = DECISION.to_vec();
        buf[7] = 0x50;
        buf[57] = 0x20;
        buf.extend_from_slice(&CLOSE[8..]);
        let (r, tree) = dissect(&buf);
        let err = r.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Bounds);
        let epd = tree.find("epd").unwrap();
        assert!(epd.children.last().unwrap().is_error());
        let error = tree.find("error").unwrap();
        assert_eq!(error.offset, 72);
        assert_eq!(error.display.as_deref(), Some("Unsupported client (6)"));
        assert_eq!(tree.walk().iter().filter(|i| i.is_error()).count(), 1);
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn offsets_follow_the_enclosing_packet() {
        let mut buf = vec![0xde, 0xad, 0xbe, 0xef];
        buf.extend_from_slice(DECISION);
        let tvb = Tvb::new(&buf).subset(4, DECISION.len()).unwrap();
        let mut tree = ProtoTree::new();
        let r = Cops::default().dissect(tvb, &mut tree, &DecodeOptions::default());
        assert_eq!(r.unwrap(), DECISION.len());
        assert_eq!(tree.items[0].offset, 4);
        assert_eq!(tree.find("message-length").unwrap().offset, 8);
        assert_eq!(tree.find("handle").unwrap().offset, 12);
        assert_eq!(tree.find("prid").unwrap().offset, 40);
        assert_eq!(tree.find("epd").unwrap().offset, 56);
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn malformed_object_in_subset() {
        let mut buf = vec![0xde, 0xad, 0xbe, 0xef];
        buf.extend_from_slice(CLOSE);
        buf[4 + 9] = 0x02;
        let tvb = Tvb::new(&buf).subset(4, CLOSE.len()).unwrap();
        let mut tree = ProtoTree::new();
        let err = Cops::default()
            .dissect(tvb, &mut tree, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::WrongLengthForType, 8));
        let malformed = tree.find("malformed").unwrap();
        assert_eq!(malformed.offset, 12);
        assert_eq!(malformed.range().end, 4 + CLOSE.len());
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        for pdu in &[DECISION, REPORT, OPEN, CLOSE] {
            for k in 0..pdu.len() {
                let tvb = Tvb::with_snaplen(pdu, k);
                let mut tree = ProtoTree::new();
                let err = Cops::default()
                    .dissect(tvb, &mut tree, &DecodeOptions::default())
                    .unwrap_err();
                assert_eq!(err.kind, ErrorKind::ReportedBounds, "snaplen {}", k);
                assert!(err.offset <= k);
                assert!(tree.has_errors());
                assert!(tree.is_well_ordered(), "snaplen {}", k);
            }
        }
    }
}
