//! LDAPv3 message grammar, RFC 4511 section 4

use berdissect_utils::ber::universal::{self, SEQUENCE, SET};
use berdissect_utils::ber::{Alternative, Body, Field, Leaf, Schema, TagHeader, TagMatch};

use crate::printable;

pub const RESULT_CODES: &[(i64, &str)] = &[
    (0, "success"),
    (1, "operationsError"),
    (2, "protocolError"),
    (3, "timeLimitExceeded"),
    (4, "sizeLimitExceeded"),
    (5, "compareFalse"),
    (6, "compareTrue"),
    (7, "authMethodNotSupported"),
    (8, "strongerAuthRequired"),
    (10, "referral"),
    (11, "adminLimitExceeded"),
    (12, "unavailableCriticalExtension"),
    (13, "confidentialityRequired"),
    (14, "saslBindInProgress"),
    (16, "noSuchAttribute"),
    (17, "undefinedAttributeType"),
    (18, "inappropriateMatching"),
    (19, "constraintViolation"),
    (20, "attributeOrValueExists"),
    (21, "invalidAttributeSyntax"),
    (32, "noSuchObject"),
    (33, "aliasProblem"),
    (34, "invalidDNSyntax"),
    (36, "aliasDereferencingProblem"),
    (48, "inappropriateAuthentication"),
    (49, "invalidCredentials"),
    (50, "insufficientAccessRights"),
    (51, "busy"),
    (52, "unavailable"),
    (53, "unwillingToPerform"),
    (54, "loopDetect"),
    (64, "namingViolation"),
    (65, "objectClassViolation"),
    (66, "notAllowedOnNonLeaf"),
    (67, "notAllowedOnRDN"),
    (68, "entryAlreadyExists"),
    (69, "objectClassModsProhibited"),
    (71, "affectsMultipleDSAs"),
    (80, "other"),
];

const SCOPES: &[(i64, &str)] = &[(0, "baseObject"), (1, "singleLevel"), (2, "wholeSubtree")];

const DEREF_ALIASES: &[(i64, &str)] = &[
    (0, "neverDerefAliases"),
    (1, "derefInSearching"),
    (2, "derefFindingBaseObj"),
    (3, "derefAlways"),
];

const MODIFY_OPERATIONS: &[(i64, &str)] = &[(0, "add"), (1, "delete"), (2, "replace")];

const OCTET_STRING: TagHeader = TagHeader::universal(universal::OCTET_STRING_TAG, false);
const INTEGER: TagHeader = TagHeader::universal(universal::INTEGER_TAG, false);
const ENUMERATED: TagHeader = TagHeader::universal(universal::ENUMERATED_TAG, false);
const BOOLEAN: TagHeader = TagHeader::universal(universal::BOOLEAN_TAG, false);

const fn app(tag: u32, constructed: bool) -> TagHeader {
    TagHeader::application(tag, constructed)
}

const fn ctx(tag: u32) -> TagHeader {
    TagHeader::context(tag, false)
}

const fn ctx_c(tag: u32) -> TagHeader {
    TagHeader::context(tag, true)
}

const LDAP_STRING: Schema = Schema {
    name: "LDAPString",
    alternatives: &[Alternative::leaf("value", OCTET_STRING, Leaf::Text)],
};

const ATTRIBUTE_VALUE: Schema = Schema {
    name: "AttributeValue",
    alternatives: &[Alternative::leaf("value", OCTET_STRING, Leaf::Formatted(printable))],
};

const LDAP_RESULT: &[Field] = &[
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("resultCode", ENUMERATED, Leaf::Enumerated(RESULT_CODES))],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("matchedDN", OCTET_STRING, Leaf::Text)],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("diagnosticMessage", OCTET_STRING, Leaf::Text)],
    },
    Field {
        optional: true,
        alternatives: &[Alternative {
            name: "referral",
            tag: TagMatch::Exact(ctx_c(3)),
            body: Body::SequenceOf { item: &LDAP_STRING },
        }],
    },
];

const ATTRIBUTE_VALUE_ASSERTION: &[Field] = &[
    Field {
        optional: false,
        alternatives: &[Alternative::leaf("attributeDesc", OCTET_STRING, Leaf::Text)],
    },
    Field {
        optional: false,
        alternatives: &[Alternative::leaf(
            "assertionValue",
            OCTET_STRING,
            Leaf::Formatted(printable),
        )],
    },
];

const PARTIAL_ATTRIBUTE: Schema = Schema {
    name: "PartialAttribute",
    alternatives: &[Alternative {
        name: "attribute",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("type", OCTET_STRING, Leaf::Text)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative {
                        name: "vals",
                        tag: TagMatch::Exact(SET),
                        body: Body::SequenceOf {
                            item: &ATTRIBUTE_VALUE,
                        },
                    }],
                },
            ],
        },
    }],
};

const CHANGE: Schema = Schema {
    name: "Change",
    alternatives: &[Alternative {
        name: "change",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf(
                        "operation",
                        ENUMERATED,
                        Leaf::Enumerated(MODIFY_OPERATIONS),
                    )],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("modification", &PARTIAL_ATTRIBUTE)],
                },
            ],
        },
    }],
};

const SUBSTRING: Schema = Schema {
    name: "Substring",
    alternatives: &[
        Alternative::leaf("initial", ctx(0), Leaf::Formatted(printable)),
        Alternative::leaf("any", ctx(1), Leaf::Formatted(printable)),
        Alternative::leaf("final", ctx(2), Leaf::Formatted(printable)),
    ],
};

const CONTROL: Schema = Schema {
    name: "Control",
    alternatives: &[Alternative {
        name: "control",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("controlType", OCTET_STRING, Leaf::Text)],
                },
                Field {
                    optional: true,
                    alternatives: &[Alternative::leaf("criticality", BOOLEAN, Leaf::Bool)],
                },
                Field {
                    optional: true,
                    alternatives: &[Alternative::leaf("controlValue", OCTET_STRING, Leaf::OctetString)],
                },
            ],
        },
    }],
};

/// Search filter, RFC 4511 section 4.5.1.7
pub static FILTER: Schema = Schema {
    name: "Filter",
    alternatives: &[
        Alternative {
            name: "and",
            tag: TagMatch::Exact(ctx_c(0)),
            body: Body::SequenceOf { item: &FILTER },
        },
        Alternative {
            name: "or",
            tag: TagMatch::Exact(ctx_c(1)),
            body: Body::SequenceOf { item: &FILTER },
        },
        Alternative::explicit("not", ctx_c(2), &FILTER),
        Alternative {
            name: "equalityMatch",
            tag: TagMatch::Exact(ctx_c(3)),
            body: Body::Sequence {
                fields: ATTRIBUTE_VALUE_ASSERTION,
            },
        },
        Alternative {
            name: "substrings",
            tag: TagMatch::Exact(ctx_c(4)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("type", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "substrings",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::SequenceOf { item: &SUBSTRING },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "greaterOrEqual",
            tag: TagMatch::Exact(ctx_c(5)),
            body: Body::Sequence {
                fields: ATTRIBUTE_VALUE_ASSERTION,
            },
        },
        Alternative {
            name: "lessOrEqual",
            tag: TagMatch::Exact(ctx_c(6)),
            body: Body::Sequence {
                fields: ATTRIBUTE_VALUE_ASSERTION,
            },
        },
        Alternative::leaf("present", ctx(7), Leaf::Text),
        Alternative {
            name: "approxMatch",
            tag: TagMatch::Exact(ctx_c(8)),
            body: Body::Sequence {
                fields: ATTRIBUTE_VALUE_ASSERTION,
            },
        },
        Alternative {
            name: "extensibleMatch",
            tag: TagMatch::Exact(ctx_c(9)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("matchingRule", ctx(1), Leaf::Text)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("type", ctx(2), Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf(
                            "matchValue",
                            ctx(3),
                            Leaf::Formatted(printable),
                        )],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("dnAttributes", ctx(4), Leaf::Bool)],
                    },
                ],
            },
        },
    ],
};

static PROTOCOL_OP: Schema = Schema {
    name: "protocolOp",
    alternatives: &[
        Alternative {
            name: "bindRequest",
            tag: TagMatch::Exact(app(0, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("version", INTEGER, Leaf::Uint)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("name", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[
                            Alternative::leaf("simple", ctx(0), Leaf::OctetString),
                            Alternative {
                                name: "sasl",
                                tag: TagMatch::Exact(ctx_c(3)),
                                body: Body::Sequence {
                                    fields: &[
                                        Field {
                                            optional: false,
                                            alternatives: &[Alternative::leaf(
                                                "mechanism",
                                                OCTET_STRING,
                                                Leaf::Text,
                                            )],
                                        },
                                        Field {
                                            optional: true,
                                            alternatives: &[Alternative::leaf(
                                                "credentials",
                                                OCTET_STRING,
                                                Leaf::OctetString,
                                            )],
                                        },
                                    ],
                                },
                            },
                        ],
                    },
                ],
            },
        },
        Alternative {
            name: "bindResponse",
            tag: TagMatch::Exact(app(1, true)),
            body: Body::Sequence {
                fields: &[
                    LDAP_RESULT[0],
                    LDAP_RESULT[1],
                    LDAP_RESULT[2],
                    LDAP_RESULT[3],
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "serverSaslCreds",
                            ctx(7),
                            Leaf::OctetString,
                        )],
                    },
                ],
            },
        },
        Alternative::leaf("unbindRequest", app(2, false), Leaf::Null),
        Alternative {
            name: "searchRequest",
            tag: TagMatch::Exact(app(3, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("baseObject", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf(
                            "scope",
                            ENUMERATED,
                            Leaf::Enumerated(SCOPES),
                        )],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf(
                            "derefAliases",
                            ENUMERATED,
                            Leaf::Enumerated(DEREF_ALIASES),
                        )],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("sizeLimit", INTEGER, Leaf::Uint)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("timeLimit", INTEGER, Leaf::Uint)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("typesOnly", BOOLEAN, Leaf::Bool)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::choice("filter", &FILTER)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "attributes",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::SequenceOf { item: &LDAP_STRING },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "searchResEntry",
            tag: TagMatch::Exact(app(4, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("objectName", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "attributes",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::SequenceOf {
                                item: &PARTIAL_ATTRIBUTE,
                            },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "searchResDone",
            tag: TagMatch::Exact(app(5, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative {
            name: "modifyRequest",
            tag: TagMatch::Exact(app(6, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("object", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "changes",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::SequenceOf { item: &CHANGE },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "modifyResponse",
            tag: TagMatch::Exact(app(7, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative {
            name: "addRequest",
            tag: TagMatch::Exact(app(8, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("entry", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "attributes",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::SequenceOf {
                                item: &PARTIAL_ATTRIBUTE,
                            },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "addResponse",
            tag: TagMatch::Exact(app(9, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative::leaf("delRequest", app(10, false), Leaf::Text),
        Alternative {
            name: "delResponse",
            tag: TagMatch::Exact(app(11, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative {
            name: "modDNRequest",
            tag: TagMatch::Exact(app(12, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("entry", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("newrdn", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("deleteoldrdn", BOOLEAN, Leaf::Bool)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("newSuperior", ctx(0), Leaf::Text)],
                    },
                ],
            },
        },
        Alternative {
            name: "modDNResponse",
            tag: TagMatch::Exact(app(13, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative {
            name: "compareRequest",
            tag: TagMatch::Exact(app(14, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("entry", OCTET_STRING, Leaf::Text)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative {
                            name: "ava",
                            tag: TagMatch::Exact(SEQUENCE),
                            body: Body::Sequence {
                                fields: ATTRIBUTE_VALUE_ASSERTION,
                            },
                        }],
                    },
                ],
            },
        },
        Alternative {
            name: "compareResponse",
            tag: TagMatch::Exact(app(15, true)),
            body: Body::Sequence { fields: LDAP_RESULT },
        },
        Alternative::leaf("abandonRequest", app(16, false), Leaf::Uint),
        Alternative {
            name: "searchResRef",
            tag: TagMatch::Exact(app(19, true)),
            body: Body::SequenceOf { item: &LDAP_STRING },
        },
        Alternative {
            name: "extendedReq",
            tag: TagMatch::Exact(app(23, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::leaf("requestName", ctx(0), Leaf::Text)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("requestValue", ctx(1), Leaf::OctetString)],
                    },
                ],
            },
        },
        Alternative {
            name: "extendedResp",
            tag: TagMatch::Exact(app(24, true)),
            body: Body::Sequence {
                fields: &[
                    LDAP_RESULT[0],
                    LDAP_RESULT[1],
                    LDAP_RESULT[2],
                    LDAP_RESULT[3],
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("responseName", ctx(10), Leaf::Text)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "responseValue",
                            ctx(11),
                            Leaf::OctetString,
                        )],
                    },
                ],
            },
        },
        Alternative {
            name: "intermediateResponse",
            tag: TagMatch::Exact(app(25, true)),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf("responseName", ctx(0), Leaf::Text)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "responseValue",
                            ctx(1),
                            Leaf::OctetString,
                        )],
                    },
                ],
            },
        },
    ],
};

pub static LDAP_MESSAGE: Schema = Schema {
    name: "LDAPMessage",
    alternatives: &[Alternative {
        name: "LDAPMessage",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                Field {
                    optional: false,
                    alternatives: &[Alternative::leaf("messageID", INTEGER, Leaf::Uint)],
                },
                Field {
                    optional: false,
                    alternatives: &[Alternative::choice("protocolOp", &PROTOCOL_OP)],
                },
                Field {
                    optional: true,
                    alternatives: &[Alternative {
                        name: "controls",
                        tag: TagMatch::Exact(ctx_c(0)),
                        body: Body::SequenceOf { item: &CONTROL },
                    }],
                },
            ],
        },
    }],
};
