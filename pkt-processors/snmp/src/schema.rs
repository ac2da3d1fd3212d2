//! SNMP message grammar: RFC 1157 (v1), RFC 3416 (v2c PDUs), RFC 3412 and
//! RFC 3414 (v3 and USM)

use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{Alternative, Body, Field, Leaf, Schema, TagHeader, TagMatch};

use crate::{ip_address, printable};

pub const VERSIONS: &[(i64, &str)] = &[(0, "version-1"), (1, "v2c"), (2, "v2u"), (3, "snmpv3")];

pub const ERROR_STATUS: &[(i64, &str)] = &[
    (0, "noError"),
    (1, "tooBig"),
    (2, "noSuchName"),
    (3, "badValue"),
    (4, "readOnly"),
    (5, "genErr"),
    (6, "noAccess"),
    (7, "wrongType"),
    (8, "wrongLength"),
    (9, "wrongEncoding"),
    (10, "wrongValue"),
    (11, "noCreation"),
    (12, "inconsistentValue"),
    (13, "resourceUnavailable"),
    (14, "commitFailed"),
    (15, "undoFailed"),
    (16, "authorizationError"),
    (17, "notWritable"),
    (18, "inconsistentName"),
];

const GENERIC_TRAPS: &[(i64, &str)] = &[
    (0, "coldStart"),
    (1, "warmStart"),
    (2, "linkDown"),
    (3, "linkUp"),
    (4, "authenticationFailure"),
    (5, "egpNeighborLoss"),
    (6, "enterpriseSpecific"),
];

pub const USM_SECURITY_MODEL: u64 = 3;

const SECURITY_MODELS: &[(i64, &str)] = &[(0, "any"), (1, "SNMPv1"), (2, "SNMPv2c"), (3, "USM")];

const INTEGER: TagHeader = TagHeader::universal(universal::INTEGER_TAG, false);
const OCTET_STRING: TagHeader = TagHeader::universal(universal::OCTET_STRING_TAG, false);
const OID: TagHeader = TagHeader::universal(universal::OID_TAG, false);
const NULL: TagHeader = TagHeader::universal(universal::NULL_TAG, false);

// Application types, RFC 2578 section 7.1
const IP_ADDRESS: TagHeader = TagHeader::application(0, false);
const COUNTER32: TagHeader = TagHeader::application(1, false);
const GAUGE32: TagHeader = TagHeader::application(2, false);
const TIME_TICKS: TagHeader = TagHeader::application(3, false);
const OPAQUE: TagHeader = TagHeader::application(4, false);
const NSAP_ADDRESS: TagHeader = TagHeader::application(5, false);
const COUNTER64: TagHeader = TagHeader::application(6, false);
const UINTEGER32: TagHeader = TagHeader::application(7, false);

/// A 32 bit unsigned value needs a fifth octet when its top bit is set
const U32: Leaf = Leaf::UintWide(5);

const fn pdu(tag: u32) -> TagMatch {
    TagMatch::Exact(TagHeader::context(tag, true))
}

const VALUE: Schema = Schema {
    name: "ObjectSyntax",
    alternatives: &[
        Alternative::leaf("integer", INTEGER, Leaf::Int),
        Alternative::leaf("string", OCTET_STRING, Leaf::Formatted(printable)),
        Alternative::leaf("objectID", OID, Leaf::Oid),
        Alternative::leaf("unSpecified", NULL, Leaf::Null),
        Alternative::leaf("ipAddress", IP_ADDRESS, Leaf::Formatted(ip_address)),
        Alternative::leaf("counter", COUNTER32, U32),
        Alternative::leaf("gauge", GAUGE32, U32),
        Alternative::leaf("ticks", TIME_TICKS, U32),
        Alternative::leaf("arbitrary", OPAQUE, Leaf::OctetString),
        Alternative::leaf("nsapAddress", NSAP_ADDRESS, Leaf::OctetString),
        Alternative::leaf("counter64", COUNTER64, Leaf::UintWide(9)),
        Alternative::leaf("uinteger32", UINTEGER32, U32),
        Alternative::leaf("noSuchObject", TagHeader::context(0, false), Leaf::Null),
        Alternative::leaf("noSuchInstance", TagHeader::context(1, false), Leaf::Null),
        Alternative::leaf("endOfMibView", TagHeader::context(2, false), Leaf::Null),
    ],
};

const VAR_BIND: Schema = Schema {
    name: "VarBind",
    alternatives: &[Alternative {
        name: "varbind",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("name", OID, Leaf::Oid)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("value", &VALUE)],
                },
            ],
        },
    }],
};

const REQUEST_ID: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf("request-id", INTEGER, Leaf::Int)],
};

const VARIABLE_BINDINGS: Field = Field {
    optional: false,
    alternatives: &[Alternative {
        name: "variable-bindings",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf { item: &VAR_BIND },
    }],
};

const PDU_FIELDS: &[Field] = &[
    REQUEST_ID,
    Field {
        optional: false,
        alternatives: &[Alternative::leaf(
            "error-status",
            INTEGER,
            Leaf::Enumerated(ERROR_STATUS),
        )],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("error-index", INTEGER, Leaf::Uint)],
    },
    VARIABLE_BINDINGS,
];

const BULK_PDU_FIELDS: &[Field] = &[
    REQUEST_ID,
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("non-repeaters", INTEGER, Leaf::Uint)],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("max-repetitions", INTEGER, Leaf::Uint)],
    },
    VARIABLE_BINDINGS,
];

const TRAP_PDU_FIELDS: &[Field] = &[
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("enterprise", OID, Leaf::Oid)],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("agent-addr", IP_ADDRESS, Leaf::Formatted(ip_address))],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf(
            "generic-trap",
            INTEGER,
            Leaf::Enumerated(GENERIC_TRAPS),
        )],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("specific-trap", INTEGER, Leaf::Int)],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("time-stamp", TIME_TICKS, U32)],
    },
    VARIABLE_BINDINGS,
];

pub static PDUS: Schema = Schema {
    name: "PDUs",
    alternatives: &[
        Alternative {
            name: "get-request",
            tag: pdu(0),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "get-next-request",
            tag: pdu(1),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "get-response",
            tag: pdu(2),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "set-request",
            tag: pdu(3),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "trap",
            tag: pdu(4),
            body: Body::Sequence {
                fields: TRAP_PDU_FIELDS,
            },
        },
        Alternative {
            name: "getBulkRequest",
            tag: pdu(5),
            body: Body::Sequence {
                fields: BULK_PDU_FIELDS,
            },
        },
        Alternative {
            name: "informRequest",
            tag: pdu(6),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "snmpV2-trap",
            tag: pdu(7),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
        Alternative {
            name: "report",
            tag: pdu(8),
            body: Body::Sequence { fields: PDU_FIELDS },
        },
    ],
};

const VERSION: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf("version", INTEGER, Leaf::Enumerated(VERSIONS))],
};

/// v1 and v2c messages, authenticated by community string
pub static COMMUNITY_MESSAGE: Schema = Schema {
    name: "Message",
    alternatives: &[Alternative {
        name: "snmp",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                VERSION,
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "community",
                        OCTET_STRING,
                        Leaf::Formatted(printable),
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("data", &PDUS)],
                },
            ],
        },
    }],
};

pub static V3_MESSAGE: Schema = Schema {
    name: "SNMPv3Message",
    alternatives: &[Alternative {
        name: "snmp",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                VERSION,
                Field {
                    optional: false,
                    alternatives: &[Alternative {
                        name: "msgGlobalData",
                        tag: TagMatch::Exact(SEQUENCE),
                        body: Body::Sequence {
                            fields: &[
                                Field {
                                    optional: false,
                                    alternatives: &[Alternative::leaf("msgID", INTEGER, Leaf::Uint)],
                                },
                                Field {
                                    optional: false,
                                    alternatives: &[Alternative::leaf(
                                        "msgMaxSize",
                                        INTEGER,
                                        Leaf::Uint,
                                    )],
                                },
                                Field {
                                    optional: false,
                                    alternatives: &[Alternative::leaf(
                                        "msgFlags",
                                        OCTET_STRING,
                                        Leaf::OctetString,
                                    )],
                                },
                                Field {
                                    optional: false,
                                    alternatives: &[Alternative::leaf(
                                        "msgSecurityModel",
                                        INTEGER,
                                        Leaf::Enumerated(SECURITY_MODELS),
                                    )],
                                },
                            ],
                        },
                    }],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgSecurityParameters",
                        OCTET_STRING,
                        Leaf::OctetString,
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[
                        Alternative {
                            name: "plaintext",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::Sequence {
                                fields: &[
                                    Field {
                                        optional: false,
                                        alternatives: &[Alternative::leaf(
                                            "contextEngineID",
                                            OCTET_STRING,
                                            Leaf::OctetString,
                                        )],
                                    },
                                    Field {
                                        optional: false,
                                        alternatives: &[Alternative::leaf(
                                            "contextName",
                                            OCTET_STRING,
                                            Leaf::Formatted(printable),
                                        )],
                                    },
                                    Field {
                                        optional: false,
                                        alternatives: &[Alternative::choice("data", &PDUS)],
                                    },
                                ],
                            },
                        },
                        Alternative::leaf("encryptedPDU", OCTET_STRING, Leaf::OctetString),
                    ],
                },
            ],
        },
    }],
};

/// UsmSecurityParameters, carried BER encoded inside msgSecurityParameters
pub static USM_PARAMETERS: Schema = Schema {
    name: "UsmSecurityParameters",
    alternatives: &[Alternative {
        name: "usm",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgAuthoritativeEngineID",
                        OCTET_STRING,
                        Leaf::OctetString,
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgAuthoritativeEngineBoots",
                        INTEGER,
                        Leaf::Uint,
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgAuthoritativeEngineTime",
                        INTEGER,
                        Leaf::Uint,
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("msgUserName", OCTET_STRING, Leaf::Text)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgAuthenticationParameters",
                        OCTET_STRING,
                        Leaf::OctetString,
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "msgPrivacyParameters",
                        OCTET_STRING,
                        Leaf::OctetString,
                    )],
                },
            ],
        },
    }],
};
