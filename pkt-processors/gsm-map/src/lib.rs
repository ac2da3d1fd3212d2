//! GSM MAP carried in TCAP
//!
//! The TCAP layer is decoded first, leaving every component parameter as raw
//! bytes. Each parameter is then decoded again with the argument or result
//! schema of its operation, or walked generically when the operation is not
//! known or the bytes do not fit the schema.

use anyhow::Result;
use tracing::trace;

use berdissect_api as api;
use api::config::{Config, DecodeOptions};
use api::dissector::{Builder as DissectorBuilder, Dissector};
use api::error::{self, ErrorKind};
use api::tree::{FieldEvent, ProtoTree};
use api::tvb::Tvb;
use berdissect_utils::ber::{decode_any, decode_by_schema, Cursor, Node, Schema};
use berdissect_utils::dissectors::{decode_or_report, emit_node};

mod map;
mod tcap;

pub use map::{address_string, argument_schema, operation_name, result_schema, tbcd};
pub use tcap::{COMPONENT, TCAP_MESSAGE};

fn opcode(comp: &Node<'_>) -> Option<i64> {
    match comp.name {
        "invoke" => comp.child("opCode"),
        "returnResultLast" | "returnResultNotLast" => comp
            .child("resultretres")
            .and_then(|r| r.child("opCode")),
        _ => None,
    }
    .and_then(|n| n.as_int())
}

fn parameter<'n, 'a>(comp: &'n Node<'a>) -> Option<&'n Node<'a>> {
    match comp.name {
        "invoke" => comp.child("parameter"),
        "returnResultLast" | "returnResultNotLast" => comp
            .child("resultretres")
            .and_then(|r| r.child("parameter")),
        _ => None,
    }
}

fn component_label(comp: &Node<'_>) -> String {
    if let Some(code) = opcode(comp) {
        return format!(
            "{} {} ({})",
            comp.name,
            operation_name(code).unwrap_or("unknown"),
            code
        );
    }
    match comp.child("errorCode").and_then(|n| n.as_int()) {
        Some(code) => format!("{} error-code={}", comp.name, code),
        None => comp.name.to_string(),
    }
}

/// Decode a raw parameter span with `schema`, or generically
///
/// A schema that does not fit the bytes falls back to the generic walk.
/// Missing bytes do not.
fn decode_parameter<'a>(
    tvb: Tvb<'a>,
    param: &Node<'a>,
    schema: Option<&'static Schema>,
    opts: &DecodeOptions,
) -> error::Result<Node<'a>> {
    if let Some(schema) = schema {
        let mut cur = Cursor::at(tvb, param.offset);
        match decode_by_schema(&mut cur, schema, param.end(), opts) {
            Err(e) if !e.kind.is_truncation() && e.kind != ErrorKind::TooDeep => {
                trace!(schema = schema.name, error = %e, "parameter does not fit");
            }
            r => return r,
        }
    }
    let mut cur = Cursor::at(tvb, param.offset);
    let mut node = decode_any(&mut cur, param.end(), opts)?;
    node.name = "parameter";
    Ok(node)
}

/// Replace the raw `parameter` item of a component with its decoded form
fn dissect_component(
    tvb: Tvb<'_>,
    comp: &Node<'_>,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    item.display = Some(component_label(comp));
    let param = match parameter(comp) {
        Some(param) => param,
        None => return Ok(()),
    };
    let schema = match (comp.name, opcode(comp)) {
        ("invoke", Some(code)) => argument_schema(code),
        (_, Some(code)) => result_schema(code),
        _ => None,
    };
    let decoded = decode_parameter(tvb, param, schema, opts);
    let slot = match item.find_mut("parameter") {
        Some(slot) => slot,
        None => return decoded.map(|_| ()),
    };
    match decoded {
        Ok(node) => {
            *slot = emit_node(&node, tvb);
            Ok(())
        }
        Err(e) => {
            let end = tvb.absolute(param.end());
            slot.push(FieldEvent::error(&e.rebase(tvb.base_offset()), end));
            Err(e)
        }
    }
}

fn dissect_components(
    tvb: Tvb<'_>,
    msg: &Node<'_>,
    item: &mut FieldEvent,
    opts: &DecodeOptions,
) -> error::Result<()> {
    let comps = match msg.child("components") {
        Some(comps) => comps,
        None => return Ok(()),
    };
    let list = match item.find_mut("components") {
        Some(list) => list,
        None => return Ok(()),
    };
    // each component is bounded on its own
    let mut first_err = None;
    for (comp, comp_item) in comps.children().iter().zip(list.children.iter_mut()) {
        if let Err(e) = dissect_component(tvb, comp, comp_item, opts) {
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn summary(msg: &Node<'_>) -> String {
    let labels: Vec<String> = msg
        .child("components")
        .map(|c| c.children())
        .unwrap_or_default()
        .iter()
        .map(component_label)
        .collect();
    if labels.is_empty() {
        msg.name.to_string()
    } else {
        format!("{} {}", msg.name, labels.join(", "))
    }
}

#[derive(Clone, Debug, Default)]
struct Builder {}

impl DissectorBuilder for Builder {
    fn name(&self) -> &'static str {
        "gsm-map"
    }

    fn build(&self, _: &Config) -> Result<Box<dyn Dissector>> {
        Ok(Box::new(GsmMap::default()))
    }
}

#[derive(Clone, Debug, Default)]
struct GsmMap {}

impl Dissector for GsmMap {
    fn name(&self) -> &'static str {
        "gsm-map"
    }

    fn dissect(
        &self,
        tvb: Tvb<'_>,
        tree: &mut ProtoTree,
        opts: &DecodeOptions,
    ) -> error::Result<usize> {
        let mut cur = Cursor::new(tvb);
        let msg = decode_or_report(&mut cur, &TCAP_MESSAGE, tvb.reported_len(), opts, tree)?;
        if let Some(item) = tree.items.last_mut() {
            let components = dissect_components(tvb, &msg, item, opts);
            item.display = Some(summary(&msg));
            components?;
        }
        trace!(msg = msg.name, "tcap message");
        Ok(cur.offset())
    }
}

pub fn new_builder() -> Box<dyn DissectorBuilder> {
    Box::new(Builder::default())
}

#[cfg(test)]
mod test {
    use super::*;
    use api::tree::FieldValue;

    /// Begin, invoke updateLocation
    const BEGIN_UPDATE_LOCATION: &[u8] = &[
        0x62, 0x2e, 0x48, 0x04, 0x00, 0x00, 0x00, 0x01, 0x6c, 0x26, 0xa1, 0x24, 0x02, 0x01, 0x01,
        0x02, 0x01, 0x02, 0x30, 0x1c, 0x04, 0x08, 0x62, 0x02, 0x11, 0x32, 0x54, 0x76, 0x98, 0xf0,
        0x81, 0x07, 0x91, 0x94, 0x71, 0x02, 0x00, 0x00, 0x10, 0x04, 0x07, 0x91, 0x94, 0x71, 0x02,
        0x00, 0x00, 0x20,
    ];

    /// End, returnResultLast for updateLocation
    const END_UPDATE_LOCATION: &[u8] = &[
        0x64, 0x1d, 0x49, 0x04, 0x00, 0x00, 0x00, 0x01, 0x6c, 0x15, 0xa2, 0x13, 0x02, 0x01, 0x01,
        0x30, 0x0e, 0x02, 0x01, 0x02, 0x30, 0x09, 0x04, 0x07, 0x91, 0x94, 0x71, 0x02, 0x00, 0x00,
        0x90,
    ];

    /// Begin, invoke mo-forwardSM, every constructed value indefinite
    const BEGIN_MO_FORWARD_SM: &[u8] = &[
        0x62, 0x80, 0x48, 0x04, 0x00, 0x00, 0x00, 0x02, 0x6c, 0x80, 0xa1, 0x80, 0x02, 0x01, 0x07,
        0x02, 0x01, 0x2e, 0x30, 0x80, 0x84, 0x07, 0x91, 0x94, 0x71, 0x02, 0x00, 0x00, 0x01, 0x82,
        0x07, 0x91, 0x94, 0x71, 0x02, 0x00, 0x00, 0x11, 0x04, 0x03, 0x01, 0x02, 0x03, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    /// Begin, invoke of operation 99
    const BEGIN_UNKNOWN: &[u8] = &[
        0x62, 0x19, 0x48, 0x04, 0x00, 0x00, 0x00, 0x03, 0x6c, 0x11, 0xa1, 0x0f, 0x02, 0x01, 0x01,
        0x02, 0x01, 0x63, 0x30, 0x07, 0x02, 0x01, 0x05, 0x04, 0x02, 0x61, 0x62,
    ];

    /// Begin, version 2 sendAuthenticationInfo with a bare IMSI
    const BEGIN_SEND_AUTH_INFO_V2: &[u8] = &[
        0x62, 0x1a, 0x48, 0x04, 0x00, 0x00, 0x00, 0x04, 0x6c, 0x12, 0xa1, 0x10, 0x02, 0x01, 0x01,
        0x02, 0x01, 0x38, 0x04, 0x08, 0x62, 0x02, 0x11, 0x32, 0x54, 0x76, 0x98, 0xf0,
    ];

    fn dissect(buf: &[u8]) -> (error::Result<usize>, ProtoTree) {
        let mut tree = ProtoTree::new();
        let r = GsmMap::default().dissect(Tvb::new(buf), &mut tree, &DecodeOptions::default());
        (r, tree)
    }

    #[test]
    fn update_location() {
        let (r, tree) = dissect(BEGIN_UPDATE_LOCATION);
        assert_eq!(r.unwrap(), BEGIN_UPDATE_LOCATION.len());
        assert_eq!(
            tree.items[0].display.as_deref(),
            Some("begin invoke updateLocation (2)")
        );
        assert!(tree.find("updateLocationArg").is_some());
        assert!(tree.find("parameter").is_none());
        let imsi = tree.find("imsi").unwrap();
        assert_eq!(imsi.offset, 20);
        assert_eq!(imsi.display.as_deref(), Some("262011234567890"));
        assert_eq!(
            tree.find("msc-Number").unwrap().display.as_deref(),
            Some("491720000001 (international, E.164)")
        );
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn update_location_result() {
        let (r, tree) = dissect(END_UPDATE_LOCATION);
        assert_eq!(r.unwrap(), END_UPDATE_LOCATION.len());
        assert_eq!(
            tree.items[0].display.as_deref(),
            Some("end returnResultLast updateLocation (2)")
        );
        assert_eq!(
            tree.find("hlr-Number").unwrap().display.as_deref(),
            Some("491720000009 (international, E.164)")
        );
    }

    #[test]
    fn indefinite_lengths() {
        let (r, tree) = dissect(BEGIN_MO_FORWARD_SM);
        assert_eq!(r.unwrap(), BEGIN_MO_FORWARD_SM.len());
        assert_eq!(
            tree.items[0].display.as_deref(),
            Some("begin invoke mo-forwardSM (46)")
        );
        let arg = tree.find("forwardSM-Arg").unwrap();
        assert_eq!((arg.offset, arg.length), (18, 27));
        assert_eq!(
            tree.find("sm-RP-DA").unwrap().display.as_deref(),
            Some("serviceCentreAddressDA")
        );
        assert_eq!(
            tree.find("msisdn").unwrap().display.as_deref(),
            Some("491720000011 (international, E.164)")
        );
        assert_eq!(
            tree.find("sm-RP-UI").unwrap().value,
            FieldValue::OctetString(vec![1, 2, 3])
        );
        assert!(tree.is_well_ordered());
    }

    #[test]
    fn unknown_operation_walked_generically() {
        let (r, tree) = dissect(BEGIN_UNKNOWN);
        assert_eq!(r.unwrap(), BEGIN_UNKNOWN.len());
        assert_eq!(tree.items[0].display.as_deref(), Some("begin invoke unknown (99)"));
        let param = tree.find("parameter").unwrap();
        assert_eq!(param.offset, 18);
        assert_eq!(param.children.len(), 2);
        assert!(!tree.has_errors());
    }

    #[test]
    fn older_version_argument() {
        let (r, tree) = dissect(BEGIN_SEND_AUTH_INFO_V2);
        assert_eq!(r.unwrap(), BEGIN_SEND_AUTH_INFO_V2.len());
        assert_eq!(tree.find("imsi").unwrap().display.as_deref(), Some("262011234567890"));
        assert!(tree.find("parameter").is_none());
    }

    #[test]
    fn mismatched_argument_falls_back() {
        // updateLocation bytes labelled as sendAuthenticationInfo
        let mut buf = BEGIN_UPDATE_LOCATION.to_vec();
        buf[17] = 0x38;
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap(), buf.len());
        let param = tree.find("parameter").unwrap();
        assert_eq!(param.children.len(), 3);
        assert!(!tree.has_errors());
    }

    #[test]
    fn malformed_argument() {
        // IMSI length runs past the end of the argument
        let mut buf = BEGIN_UPDATE_LOCATION.to_vec();
        buf[21] = 0x20;
        let (r, tree) = dissect(&buf);
        let err = r.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Bounds);
        assert!(err.offset >= 20 && err.offset < 48);
        let malformed = tree.find("malformed").unwrap();
        assert_eq!(malformed.offset, err.offset);
        assert!(tree.find("parameter").is_some());
        assert_eq!(
            tree.items[0].display.as_deref(),
            Some("begin invoke updateLocation (2)")
        );
    }

    #[test]
    fn malformed_component_does_not_hide_the_next() {
        let comp = &BEGIN_UPDATE_LOCATION[10..];
        let mut buf = vec![0x62, 0x54, 0x48, 0x04, 0x00, 0x00, 0x00, 0x01, 0x6c, 0x4c];
        buf.extend_from_slice(comp);
        buf.extend_from_slice(comp);
        // first IMSI runs past its argument
        buf[21] = 0x20;
        let (r, tree) = dissect(&buf);
        let err = r.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Bounds);
        assert!(err.offset < 48);
        let components = tree.find("components").unwrap();
        assert_eq!(components.children.len(), 2);
        assert!(components.children[0].find("malformed").is_some());
        assert!(components.children[0].find("updateLocationArg").is_none());
        assert!(components.children[1].find("updateLocationArg").is_some());
        let imsi = tree.find("imsi").unwrap();
        assert_eq!(imsi.offset, 58);
        assert_eq!(imsi.display.as_deref(), Some("262011234567890"));
    }

    #[test]
    fn reject_component() {
        let buf = [
            0x64, 0x10, 0x49, 0x04, 0x00, 0x00, 0x00, 0x05, 0x6c, 0x08, 0xa4, 0x06, 0x02, 0x01,
            0x01, 0x81, 0x01, 0x01,
        ];
        let (r, tree) = dissect(&buf);
        assert_eq!(r.unwrap(), buf.len());
        assert_eq!(tree.items[0].display.as_deref(), Some("end reject"));
        assert_eq!(
            tree.find("invokeProblem").unwrap().display.as_deref(),
            Some("unrecognizedOperation (1)")
        );
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        for pdu in &[
            BEGIN_UPDATE_LOCATION,
            END_UPDATE_LOCATION,
            BEGIN_MO_FORWARD_SM,
            BEGIN_UNKNOWN,
            BEGIN_SEND_AUTH_INFO_V2,
        ] {
            for k in 0..pdu.len() {
                let tvb = Tvb::with_snaplen(pdu, k);
                let mut tree = ProtoTree::new();
                let err = GsmMap::default()
                    .dissect(tvb, &mut tree, &DecodeOptions::default())
                    .unwrap_err();
                assert!(err.kind.is_truncation(), "{} at snaplen {}", err, k);
                assert!(err.offset <= k);
                assert!(tree.has_errors());
            }
        }
    }
}
