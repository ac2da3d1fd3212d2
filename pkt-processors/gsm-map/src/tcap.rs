//! TCAP transaction and component grammar, ITU-T Q.773
//!
//! Component parameters are kept as raw bytes here. Their type depends on
//! the operation code, so they are decoded in a second step.

use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{Alternative, Body, Field, Leaf, Schema, TagHeader, TagMatch};

const INTEGER: TagHeader = TagHeader::universal(universal::INTEGER_TAG, false);
const OID: TagHeader = TagHeader::universal(universal::OID_TAG, false);
const NULL: TagHeader = TagHeader::universal(universal::NULL_TAG, false);

const fn app(tag: u32, constructed: bool) -> TagMatch {
    TagMatch::Exact(TagHeader::application(tag, constructed))
}

const fn ctx(tag: u32) -> TagMatch {
    TagMatch::Exact(TagHeader::context(tag, true))
}

const OTID: Field = Field {
    optional: false,
    alternatives: &[Alternative {
        name: "otid",
        tag: app(8, false),
        body: Body::Leaf(Leaf::OctetString),
    }],
};

const DTID: Field = Field {
    optional: false,
    alternatives: &[Alternative {
        name: "dtid",
        tag: app(9, false),
        body: Body::Leaf(Leaf::OctetString),
    }],
};

const DIALOGUE_PORTION: Field = Field {
    optional: true,
    alternatives: &[Alternative {
        name: "dialoguePortion",
        tag: app(11, true),
        body: Body::Leaf(Leaf::Any),
    }],
};

const COMPONENTS_ALTERNATIVES: &[Alternative] = &[Alternative {
    name: "components",
    tag: app(12, true),
    body: Body::SequenceOf { item: &COMPONENT },
}];

const COMPONENTS: Field = Field {
    optional: false,
    alternatives: COMPONENTS_ALTERNATIVES,
};

const OPTIONAL_COMPONENTS: Field = Field {
    optional: true,
    alternatives: COMPONENTS_ALTERNATIVES,
};

const INVOKE_ID: Field = Field {
    optional: false,
    alternatives: &[Alternative::leaf("invokeID", INTEGER, Leaf::Int)],
};

const OPERATION_CODE: Schema = Schema {
    name: "OPERATION",
    alternatives: &[
        Alternative::leaf("localValue", INTEGER, Leaf::Int),
        Alternative::leaf("globalValue", OID, Leaf::Oid),
    ],
};

const OP_CODE: Field = Field {
    optional: false,
    alternatives: &[Alternative::choice("opCode", &OPERATION_CODE)],
};

const PARAMETER: Field = Field {
    optional: true,
    alternatives: &[Alternative {
        name: "parameter",
        tag: TagMatch::Any,
        body: Body::Leaf(Leaf::Raw),
    }],
};

const RESULT_FIELDS: &[Field] = &[
    INVOKE_ID,
    Field {
        optional: true,
        alternatives: &[Alternative {
            name: "resultretres",
            tag: TagMatch::Exact(SEQUENCE),
            body: Body::Sequence {
                fields: &[OP_CODE, PARAMETER],
            },
        }],
    },
];

const INVOKE_ID_TYPE: Schema = Schema {
    name: "InvokeIdType",
    alternatives: &[
        Alternative::leaf("derivable", INTEGER, Leaf::Int),
        Alternative::leaf("not-derivable", NULL, Leaf::Null),
    ],
};

const GENERAL_PROBLEMS: &[(i64, &str)] = &[
    (0, "unrecognizedComponent"),
    (1, "mistypedComponent"),
    (2, "badlyStructuredComponent"),
];

const INVOKE_PROBLEMS: &[(i64, &str)] = &[
    (0, "duplicateInvokeID"),
    (1, "unrecognizedOperation"),
    (2, "mistypedParameter"),
    (3, "resourceLimitation"),
    (4, "initiatingRelease"),
    (5, "unrecognizedLinkedID"),
    (6, "linkedResponseUnexpected"),
    (7, "unexpectedLinkedOperation"),
];

const RETURN_RESULT_PROBLEMS: &[(i64, &str)] = &[
    (0, "unrecognizedInvokeID"),
    (1, "returnResultUnexpected"),
    (2, "mistypedParameter"),
];

const RETURN_ERROR_PROBLEMS: &[(i64, &str)] = &[
    (0, "unrecognizedInvokeID"),
    (1, "returnErrorUnexpected"),
    (2, "unrecognizedError"),
    (3, "unexpectedError"),
    (4, "mistypedParameter"),
];

const PROBLEM: Schema = Schema {
    name: "Problem",
    alternatives: &[
        Alternative::leaf(
            "generalProblem",
            TagHeader::context(0, false),
            Leaf::Enumerated(GENERAL_PROBLEMS),
        ),
        Alternative::leaf(
            "invokeProblem",
            TagHeader::context(1, false),
            Leaf::Enumerated(INVOKE_PROBLEMS),
        ),
        Alternative::leaf(
            "returnResultProblem",
            TagHeader::context(2, false),
            Leaf::Enumerated(RETURN_RESULT_PROBLEMS),
        ),
        Alternative::leaf(
            "returnErrorProblem",
            TagHeader::context(3, false),
            Leaf::Enumerated(RETURN_ERROR_PROBLEMS),
        ),
    ],
};

pub const COMPONENT: Schema = Schema {
    name: "Component",
    alternatives: &[
        Alternative {
            name: "invoke",
            tag: ctx(1),
            body: Body::Sequence {
                fields: &[
                    INVOKE_ID,
                    Field {
                        optional: true,
                        alternatives: &[Alternative::leaf(
                            "linkedID",
                            TagHeader::context(0, false),
                            Leaf::Int,
                        )],
                    },
                    OP_CODE,
                    PARAMETER,
                ],
            },
        },
        Alternative {
            name: "returnResultLast",
            tag: ctx(2),
            body: Body::Sequence {
                fields: RESULT_FIELDS,
            },
        },
        Alternative {
            name: "returnError",
            tag: ctx(3),
            body: Body::Sequence {
                fields: &[
                    INVOKE_ID,
                    Field {
                        optional: false,
                        alternatives: &[Alternative::choice("errorCode", &OPERATION_CODE)],
                    },
                    Field {
                        optional: true,
                        alternatives: &[Alternative::any("parameter")],
                    },
                ],
            },
        },
        Alternative {
            name: "reject",
            tag: ctx(4),
            body: Body::Sequence {
                fields: &[
                    Field {
                        optional: false,
                        alternatives: &[Alternative::choice("invokeID", &INVOKE_ID_TYPE)],
                    },
                    Field {
                        optional: false,
                        alternatives: &[Alternative::choice("problem", &PROBLEM)],
                    },
                ],
            },
        },
        Alternative {
            name: "returnResultNotLast",
            tag: ctx(7),
            body: Body::Sequence {
                fields: RESULT_FIELDS,
            },
        },
    ],
};

const P_ABORT_CAUSES: &[(i64, &str)] = &[
    (0, "unrecognizedMessageType"),
    (1, "unrecognizedTransactionID"),
    (2, "badlyFormattedTransactionPortion"),
    (3, "incorrectTransactionPortion"),
    (4, "resourceLimitation"),
];

pub static TCAP_MESSAGE: Schema = Schema {
    name: "TCMessage",
    alternatives: &[
        Alternative {
            name: "unidirectional",
            tag: app(1, true),
            body: Body::Sequence {
                fields: &[DIALOGUE_PORTION, COMPONENTS],
            },
        },
        Alternative {
            name: "begin",
            tag: app(2, true),
            body: Body::Sequence {
                fields: &[OTID, DIALOGUE_PORTION, OPTIONAL_COMPONENTS],
            },
        },
        Alternative {
            name: "end",
            tag: app(4, true),
            body: Body::Sequence {
                fields: &[DTID, DIALOGUE_PORTION, OPTIONAL_COMPONENTS],
            },
        },
        Alternative {
            name: "continue",
            tag: app(5, true),
            body: Body::Sequence {
                fields: &[OTID, DTID, DIALOGUE_PORTION, OPTIONAL_COMPONENTS],
            },
        },
        Alternative {
            name: "abort",
            tag: app(7, true),
            body: Body::Sequence {
                fields: &[
                    DTID,
                    Field {
                        optional: true,
                        alternatives: &[
                            Alternative::leaf(
                                "p-abortCause",
                                TagHeader::application(10, false),
                                Leaf::Enumerated(P_ABORT_CAUSES),
                            ),
                            Alternative::any("u-abortCause"),
                        ],
                    },
                ],
            },
        },
    ],
};
