//! Universal class types and ready made schemas for them.

use super::schema::{Alternative, Body, Leaf, Schema, TagMatch};
use super::TagHeader;

pub const BOOLEAN_TAG: u32 = 1;
pub const INTEGER_TAG: u32 = 2;
pub const BIT_STRING_TAG: u32 = 3;
pub const OCTET_STRING_TAG: u32 = 4;
pub const NULL_TAG: u32 = 5;
pub const OID_TAG: u32 = 6;
pub const ENUMERATED_TAG: u32 = 10;
pub const UTF8_STRING_TAG: u32 = 12;
pub const SEQUENCE_TAG: u32 = 16;
pub const SET_TAG: u32 = 17;
pub const IA5_STRING_TAG: u32 = 22;
pub const GENERALIZED_TIME_TAG: u32 = 24;
pub const GENERAL_STRING_TAG: u32 = 27;

pub const SEQUENCE: TagHeader = TagHeader::universal(SEQUENCE_TAG, true);
pub const SET: TagHeader = TagHeader::universal(SET_TAG, true);

pub fn tag_name(tag: u32) -> Option<&'static str> {
    let name = match tag {
        0 => "EOC",
        1 => "BOOLEAN",
        2 => "INTEGER",
        3 => "BIT STRING",
        4 => "OCTET STRING",
        5 => "NULL",
        6 => "OBJECT IDENTIFIER",
        7 => "ObjectDescriptor",
        8 => "EXTERNAL",
        9 => "REAL",
        10 => "ENUMERATED",
        11 => "EMBEDDED PDV",
        12 => "UTF8String",
        13 => "RELATIVE-OID",
        16 => "SEQUENCE",
        17 => "SET",
        18 => "NumericString",
        19 => "PrintableString",
        20 => "TeletexString",
        21 => "VideotexString",
        22 => "IA5String",
        23 => "UTCTime",
        24 => "GeneralizedTime",
        25 => "GraphicString",
        26 => "VisibleString",
        27 => "GeneralString",
        28 => "UniversalString",
        29 => "CHARACTER STRING",
        30 => "BMPString",
        _ => return None,
    };
    Some(name)
}

const fn primitive(tag: u32) -> TagHeader {
    TagHeader::universal(tag, false)
}

pub static BOOLEAN: Schema = Schema {
    name: "BOOLEAN",
    alternatives: &[Alternative::leaf("BOOLEAN", primitive(BOOLEAN_TAG), Leaf::Bool)],
};

pub static INTEGER: Schema = Schema {
    name: "INTEGER",
    alternatives: &[Alternative::leaf("INTEGER", primitive(INTEGER_TAG), Leaf::Int)],
};

/// INTEGER known to be non-negative
pub static UINT: Schema = Schema {
    name: "INTEGER",
    alternatives: &[Alternative::leaf("INTEGER", primitive(INTEGER_TAG), Leaf::Uint)],
};

pub static NULL: Schema = Schema {
    name: "NULL",
    alternatives: &[Alternative::leaf("NULL", primitive(NULL_TAG), Leaf::Null)],
};

pub static OCTET_STRING: Schema = Schema {
    name: "OCTET STRING",
    alternatives: &[Alternative::leaf(
        "OCTET STRING",
        primitive(OCTET_STRING_TAG),
        Leaf::OctetString,
    )],
};

pub static OID: Schema = Schema {
    name: "OBJECT IDENTIFIER",
    alternatives: &[Alternative::leaf("OBJECT IDENTIFIER", primitive(OID_TAG), Leaf::Oid)],
};

pub static BIT_STRING: Schema = Schema {
    name: "BIT STRING",
    alternatives: &[Alternative::leaf("BIT STRING", primitive(BIT_STRING_TAG), Leaf::BitString)],
};

pub static ENUMERATED: Schema = Schema {
    name: "ENUMERATED",
    alternatives: &[Alternative::leaf(
        "ENUMERATED",
        primitive(ENUMERATED_TAG),
        Leaf::Enumerated(&[]),
    )],
};

pub static GENERAL_STRING: Schema = Schema {
    name: "GeneralString",
    alternatives: &[Alternative::leaf("GeneralString", primitive(GENERAL_STRING_TAG), Leaf::Text)],
};

pub static IA5_STRING: Schema = Schema {
    name: "IA5String",
    alternatives: &[Alternative::leaf("IA5String", primitive(IA5_STRING_TAG), Leaf::Text)],
};

pub static UTF8_STRING: Schema = Schema {
    name: "UTF8String",
    alternatives: &[Alternative::leaf("UTF8String", primitive(UTF8_STRING_TAG), Leaf::Text)],
};

pub static GENERALIZED_TIME: Schema = Schema {
    name: "GeneralizedTime",
    alternatives: &[Alternative::leaf(
        "GeneralizedTime",
        primitive(GENERALIZED_TIME_TAG),
        Leaf::Text,
    )],
};

/// Any single value, decoded by its identifier
pub static ANY: Schema = Schema {
    name: "ANY",
    alternatives: &[Alternative {
        name: "ANY",
        tag: TagMatch::Any,
        body: Body::Leaf(Leaf::Any),
    }],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::{decode_by_schema, Cursor, Value};
    use berdissect_api::config::DecodeOptions;
    use berdissect_api::tvb::Tvb;

    #[test]
    fn names() {
        assert_eq!(tag_name(SEQUENCE_TAG), Some("SEQUENCE"));
        assert_eq!(tag_name(OID_TAG), Some("OBJECT IDENTIFIER"));
        assert_eq!(tag_name(14), None);
        assert_eq!(tag_name(u32::MAX), None);
    }

    #[test]
    fn leaf_schemas() {
        let buf = [0x0a, 0x01, 0x03, 0x18, 0x02, 0x32, 0x30];
        let opts = DecodeOptions::default();
        let mut cur = Cursor::new(Tvb::new(&buf));
        let e = decode_by_schema(&mut cur, &ENUMERATED, buf.len(), &opts).unwrap();
        assert_eq!(e.value, Value::Enumerated(3, None));
        let t = decode_by_schema(&mut cur, &GENERALIZED_TIME, buf.len(), &opts).unwrap();
        assert_eq!(t.as_str(), Some("20"));
        assert!(cur.is_exhausted());
    }
}
