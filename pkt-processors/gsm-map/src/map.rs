//! MAP operation arguments and results, 3GPP TS 29.002

use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{Alternative, Body, Field, Leaf, Schema, TagHeader, TagMatch};

const OCTET_STRING: TagHeader = TagHeader::universal(universal::OCTET_STRING_TAG, false);
const INTEGER: TagHeader = TagHeader::universal(universal::INTEGER_TAG, false);
const ENUMERATED: TagHeader = TagHeader::universal(universal::ENUMERATED_TAG, false);

pub const UPDATE_LOCATION: i64 = 2;
pub const CANCEL_LOCATION: i64 = 3;
pub const MT_FORWARD_SM: i64 = 44;
pub const SEND_ROUTING_INFO_FOR_SM: i64 = 45;
pub const MO_FORWARD_SM: i64 = 46;
pub const SEND_AUTHENTICATION_INFO: i64 = 56;
pub const PROCESS_UNSTRUCTURED_SS_REQUEST: i64 = 59;
pub const UNSTRUCTURED_SS_REQUEST: i64 = 60;
pub const UNSTRUCTURED_SS_NOTIFY: i64 = 61;
pub const PURGE_MS: i64 = 67;

pub const OPERATIONS: &[(i64, &str)] = &[
    (UPDATE_LOCATION, "updateLocation"),
    (CANCEL_LOCATION, "cancelLocation"),
    (4, "provideRoamingNumber"),
    (7, "insertSubscriberData"),
    (8, "deleteSubscriberData"),
    (22, "sendRoutingInfo"),
    (23, "updateGprsLocation"),
    (37, "reset"),
    (43, "checkIMEI"),
    (MT_FORWARD_SM, "mt-forwardSM"),
    (SEND_ROUTING_INFO_FOR_SM, "sendRoutingInfoForSM"),
    (MO_FORWARD_SM, "mo-forwardSM"),
    (47, "reportSM-DeliveryStatus"),
    (SEND_AUTHENTICATION_INFO, "sendAuthenticationInfo"),
    (PROCESS_UNSTRUCTURED_SS_REQUEST, "processUnstructuredSS-Request"),
    (UNSTRUCTURED_SS_REQUEST, "unstructuredSS-Request"),
    (UNSTRUCTURED_SS_NOTIFY, "unstructuredSS-Notify"),
    (PURGE_MS, "purgeMS"),
    (70, "provideSubscriberInfo"),
    (71, "anyTimeInterrogation"),
];

pub fn operation_name(code: i64) -> Option<&'static str> {
    OPERATIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Schema of an Invoke parameter
pub fn argument_schema(code: i64) -> Option<&'static Schema> {
    let schema = match code {
        UPDATE_LOCATION => &UPDATE_LOCATION_ARG,
        CANCEL_LOCATION => &CANCEL_LOCATION_ARG,
        SEND_ROUTING_INFO_FOR_SM => &ROUTING_INFO_FOR_SM_ARG,
        MO_FORWARD_SM | MT_FORWARD_SM => &FORWARD_SM_ARG,
        SEND_AUTHENTICATION_INFO => &SEND_AUTHENTICATION_INFO_ARG,
        PROCESS_UNSTRUCTURED_SS_REQUEST | UNSTRUCTURED_SS_REQUEST | UNSTRUCTURED_SS_NOTIFY => {
            &USSD_ARG
        }
        PURGE_MS => &PURGE_MS_ARG,
        _ => return None,
    };
    Some(schema)
}

/// Schema of a ReturnResult parameter
pub fn result_schema(code: i64) -> Option<&'static Schema> {
    let schema = match code {
        UPDATE_LOCATION => &UPDATE_LOCATION_RES,
        SEND_ROUTING_INFO_FOR_SM => &ROUTING_INFO_FOR_SM_RES,
        PROCESS_UNSTRUCTURED_SS_REQUEST | UNSTRUCTURED_SS_REQUEST => &USSD_RES,
        _ => return None,
    };
    Some(schema)
}

/// Telephony BCD digits, low nibble first, 0xF fills the last octet
pub fn tbcd(raw: &[u8]) -> String {
    const DIGITS: &[u8; 15] = b"0123456789*#abc";
    let mut out = String::with_capacity(raw.len() * 2);
    for octet in raw {
        for nibble in [octet & 0x0f, octet >> 4].iter() {
            match DIGITS.get(*nibble as usize) {
                Some(d) => out.push(*d as char),
                None => return out,
            }
        }
    }
    out
}

fn nature_of_address(octet: u8) -> &'static str {
    match (octet >> 4) & 0x07 {
        0 => "unknown",
        1 => "international",
        2 => "national",
        3 => "network specific",
        4 => "subscriber",
        6 => "abbreviated",
        _ => "reserved",
    }
}

fn numbering_plan(octet: u8) -> &'static str {
    match octet & 0x0f {
        0 => "unknown",
        1 => "E.164",
        3 => "X.121",
        4 => "F.69",
        6 => "E.212",
        8 => "national",
        9 => "private",
        _ => "reserved",
    }
}

/// AddressString: one octet of nature and numbering plan, then TBCD digits
pub fn address_string(raw: &[u8]) -> String {
    match raw.split_first() {
        Some((kind, digits)) => format!(
            "{} ({}, {})",
            tbcd(digits),
            nature_of_address(*kind),
            numbering_plan(*kind)
        ),
        None => String::new(),
    }
}

const IMSI: Leaf = Leaf::Formatted(tbcd);
const ADDRESS: Leaf = Leaf::Formatted(address_string);

const fn prim(tag: u32) -> TagHeader {
    TagHeader::context(tag, false)
}

const fn cons(tag: u32) -> TagMatch {
    TagMatch::Exact(TagHeader::context(tag, true))
}

const IMSI_FIELD: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf("imsi", OCTET_STRING, IMSI)],
};

const LMSI_FIELD: Field = Field {
    optional: true,
    alternatives: &[Alternative::leaf("lmsi", OCTET_STRING, Leaf::OctetString)],
};

pub static UPDATE_LOCATION_ARG: Schema = Schema {
    name: "UpdateLocationArg",
    alternatives: &[Alternative {
        name: "updateLocationArg",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                IMSI_FIELD,
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("msc-Number", prim(1), ADDRESS)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("vlr-Number", OCTET_STRING, ADDRESS)],
                },
                Field {
                    optional: true,
                    alternatives: &[Alternative::leaf("lmsi", prim(10), Leaf::OctetString)],
                },
            ],
        },
    }],
};

pub static UPDATE_LOCATION_RES: Schema = Schema {
    name: "UpdateLocationRes",
    alternatives: &[Alternative {
        name: "updateLocationRes",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[Field {
                optional: false,
                alternatives: &[Alternative::leaf("hlr-Number", OCTET_STRING, ADDRESS)],
            }],
        },
    }],
};

const CANCELLATION_TYPES: &[(i64, &str)] = &[
    (0, "updateProcedure"),
    (1, "subscriptionWithdraw"),
    (2, "initialAttachProcedure"),
];

const IMSI_WITH_LMSI: Alternative = Alternative {
    name: "imsi-WithLMSI",
    tag: TagMatch::Exact(SEQUENCE),
    body: Body::Sequence {
        fields: &[IMSI_FIELD, LMSI_FIELD],
    },
};

/// Version 3 wraps the identity in `[3] SEQUENCE`, earlier versions send
/// the identity alone
pub static CANCEL_LOCATION_ARG: Schema = Schema {
    name: "CancelLocationArg",
    alternatives: &[
        Alternative {
            name: "cancelLocationArg",
            tag: cons(3),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[
                            Alternative::leaf("imsi", OCTET_STRING, IMSI),
                            IMSI_WITH_LMSI,
                        ],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "cancellationType",
                            ENUMERATED,
                            Leaf::Enumerated(CANCELLATION_TYPES),
                        )],
                    },
                ],
            },
        },
        Alternative::leaf("imsi", OCTET_STRING, IMSI),
        IMSI_WITH_LMSI,
    ],
};

pub static ROUTING_INFO_FOR_SM_ARG: Schema = Schema {
    name: "RoutingInfoForSM-Arg",
    alternatives: &[Alternative {
        name: "routingInfoForSM-Arg",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("msisdn", prim(0), ADDRESS)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("sm-RP-PRI", prim(1), Leaf::Bool)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("serviceCentreAddress", prim(2), ADDRESS)],
                },
            ],
        },
    }],
};

pub static ROUTING_INFO_FOR_SM_RES: Schema = Schema {
    name: "RoutingInfoForSM-Res",
    alternatives: &[Alternative {
        name: "routingInfoForSM-Res",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                IMSI_FIELD,
                Field {
                    optional: false,
                    alternatives: &[Alternative {
                        name: "locationInfoWithLMSI",
                        tag: cons(0),
                        body: Body::Sequence {
                            fields: &[
                                Field {
                                    optional: false,
                                    alternatives: &[Alternative::leaf(
                                        "networkNode-Number",
                                        prim(1),
                                        ADDRESS,
                                    )],
                                },
                                LMSI_FIELD,
                            ],
                        },
                    }],
                },
            ],
        },
    }],
};

const SM_RP_DA: Schema = Schema {
    name: "SM-RP-DA",
    alternatives: &[
        Alternative::leaf("imsi", prim(0), IMSI),
        Alternative::leaf("lmsi", prim(1), Leaf::OctetString),
        Alternative::leaf("serviceCentreAddressDA", prim(4), ADDRESS),
        Alternative::leaf("noSM-RP-DA", prim(5), Leaf::Null),
    ],
};

const SM_RP_OA: Schema = Schema {
    name: "SM-RP-OA",
    alternatives: &[
        Alternative::leaf("msisdn", prim(2), ADDRESS),
        Alternative::leaf("serviceCentreAddressOA", prim(4), ADDRESS),
        Alternative::leaf("noSM-RP-OA", prim(5), Leaf::Null),
    ],
};

/// Covers MO-ForwardSM, MT-ForwardSM and the version 1 and 2 ForwardSM
pub static FORWARD_SM_ARG: Schema = Schema {
    name: "ForwardSM-Arg",
    alternatives: &[Alternative {
        name: "forwardSM-Arg",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("sm-RP-DA", &SM_RP_DA)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("sm-RP-OA", &SM_RP_OA)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("sm-RP-UI", OCTET_STRING, Leaf::OctetString)],
                },
            ],
        },
    }],
};

/// Version 3 sends a SEQUENCE, version 2 the bare IMSI
pub static SEND_AUTHENTICATION_INFO_ARG: Schema = Schema {
    name: "SendAuthenticationInfoArg",
    alternatives: &[
        Alternative {
            name: "sendAuthenticationInfoArg",
            tag: TagMatch::Exact(SEQUENCE),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("imsi", prim(0), IMSI)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf(
                            "numberOfRequestedVectors",
                            INTEGER,
                            Leaf::Uint,
                        )],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "segmentationProhibited",
                            TagHeader::universal(universal::NULL_TAG, false),
                            Leaf::Null,
                        )],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "immediateResponsePreferred",
                            prim(1),
                            Leaf::Null,
                        )],
                    },
                ],
            },
        },
        Alternative::leaf("imsi", OCTET_STRING, IMSI),
    ],
};

const USSD_DATA_CODING_SCHEME: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf(
        "ussd-DataCodingScheme",
        OCTET_STRING,
        Leaf::OctetString,
    )],
};

const USSD_STRING: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf("ussd-String", OCTET_STRING, Leaf::OctetString)],
};

pub static USSD_ARG: Schema = Schema {
    name: "USSD-Arg",
    alternatives: &[Alternative {
        name: "ussd-Arg",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                USSD_DATA_CODING_SCHEME,
                USSD_STRING,
                Field {
                    optional: true,
                    alternatives: &[Alternative::leaf(
                        "alertingPattern",
                        OCTET_STRING,
                        Leaf::OctetString,
                    )],
                },
                Field {
                    optional: true,
                    alternatives: &[Alternative::leaf("msisdn", prim(0), ADDRESS)],
                },
            ],
        },
    }],
};

pub static USSD_RES: Schema = Schema {
    name: "USSD-Res",
    alternatives: &[Alternative {
        name: "ussd-Res",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[USSD_DATA_CODING_SCHEME, USSD_STRING],
        },
    }],
};

/// Version 3 is `[3] SEQUENCE` with optional node numbers, version 2 a plain
/// SEQUENCE
pub static PURGE_MS_ARG: Schema = Schema {
    name: "PurgeMS-Arg",
    alternatives: &[
        Alternative {
            name: "purgeMS-Arg",
            tag: cons(3),
            body: Body::Sequence {
                fields: &[
                    IMSI_FIELD,
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("vlr-Number", prim(0), ADDRESS)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("sgsn-Number", prim(1), ADDRESS)],
                    },
                ],
            },
        },
        Alternative {
            name: "purgeMS-Arg",
            tag: TagMatch::Exact(SEQUENCE),
            body: Body::Sequence {
                fields: &[
                    IMSI_FIELD,
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("vlr-Number", OCTET_STRING, ADDRESS)],
                    },
                ],
            },
        },
    ],
};

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tbcd_digits() {
        assert_eq!(tbcd(&[0x21, 0x43, 0xf5]), "12345");
        assert_eq!(tbcd(&[0x62, 0x02, 0x11, 0x32, 0x54, 0x76, 0x98, 0xf0]), "262011234567890");
        assert_eq!(tbcd(&[0xba]), "*#");
        assert_eq!(tbcd(&[]), "");
    }

    #[test]
    fn address_strings() {
        assert_eq!(
            address_string(&[0x91, 0x94, 0x71, 0x02, 0x00, 0x00, 0x10]),
            "491720000001 (international, E.164)"
        );
        assert_eq!(address_string(&[0xa1, 0x21]), "12 (national, E.164)");
        assert_eq!(address_string(&[]), "");
    }

    #[test]
    fn operation_lookup() {
        assert_eq!(operation_name(2), Some("updateLocation"));
        assert_eq!(operation_name(99), None);
        for code in &[2, 3, 44, 45, 46, 56, 59, 60, 61, 67] {
            assert!(argument_schema(*code).is_some(), "opcode {}", code);
        }
        assert!(argument_schema(99).is_none());
        assert!(result_schema(56).is_none());
    }
}
