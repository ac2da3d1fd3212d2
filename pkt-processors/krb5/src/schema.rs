//! Kerberos V5 messages, RFC 4120 section 5
//!
//! Every field is explicitly context tagged, so most of the grammar is
//! `[n] EXPLICIT` wrappers around a handful of basic types.

use berdissect_utils::ber::universal::{self, SEQUENCE};
use berdissect_utils::ber::{Alternative, Body, Field, Leaf, Schema, TagHeader, TagMatch};

/// `name [tag] EXPLICIT inner`
macro_rules! field {
    ($name:literal, $tag:literal, $inner:expr) => {
        Field {
            optional: false,
            alternatives: &[Alternative::explicit($name, ctx($tag), &$inner)],
        }
    };
    (optional $name:literal, $tag:literal, $inner:expr) => {
        Field {
            optional: true,
            alternatives: &[Alternative::explicit($name, ctx($tag), &$inner)],
        }
    };
}

pub const PA_TGS_REQ: i64 = 1;

const INTEGER: TagHeader = TagHeader::universal(universal::INTEGER_TAG, false);
const OCTET_STRING: TagHeader = TagHeader::universal(universal::OCTET_STRING_TAG, false);
const BIT_STRING: TagHeader = TagHeader::universal(universal::BIT_STRING_TAG, false);
const GENERAL_STRING: TagHeader = TagHeader::universal(universal::GENERAL_STRING_TAG, false);
const GENERALIZED_TIME: TagHeader = TagHeader::universal(universal::GENERALIZED_TIME_TAG, false);

const fn app(tag: u32) -> TagHeader {
    TagHeader::application(tag, true)
}

const fn ctx(tag: u32) -> TagHeader {
    TagHeader::context(tag, true)
}

const INT32: Schema = Schema {
    name: "Int32",
    alternatives: &[Alternative::leaf("value", INTEGER, Leaf::Int)],
};

const UINT32: Schema = Schema {
    name: "UInt32",
    alternatives: &[Alternative::leaf("value", INTEGER, Leaf::UintWide(5))],
};

const ETYPE: Schema = Schema {
    name: "EncryptionType",
    alternatives: &[Alternative::leaf("etype", INTEGER, Leaf::Int)],
};

const KERBEROS_STRING: Schema = Schema {
    name: "KerberosString",
    alternatives: &[Alternative::leaf("value", GENERAL_STRING, Leaf::Text)],
};

const NAME_COMPONENT: Schema = Schema {
    name: "KerberosString",
    alternatives: &[Alternative::leaf("name", GENERAL_STRING, Leaf::Text)],
};

const KERBEROS_TIME: Schema = Schema {
    name: "KerberosTime",
    alternatives: &[Alternative::leaf("value", GENERALIZED_TIME, Leaf::Text)],
};

const OCTETS: Schema = Schema {
    name: "OCTET STRING",
    alternatives: &[Alternative::leaf("value", OCTET_STRING, Leaf::OctetString)],
};

const FLAGS: Schema = Schema {
    name: "KerberosFlags",
    alternatives: &[Alternative::leaf("value", BIT_STRING, Leaf::BitString)],
};

const PRINCIPAL_NAME: Schema = Schema {
    name: "PrincipalName",
    alternatives: &[Alternative {
        name: "PrincipalName",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("name-type", 0, INT32),
                field!("name-string", 1, NAME_STRINGS),
            ],
        },
    }],
};

const NAME_STRINGS: Schema = Schema {
    name: "SEQUENCE OF KerberosString",
    alternatives: &[Alternative {
        name: "names",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf {
            item: &NAME_COMPONENT,
        },
    }],
};

const HOST_ADDRESS: Schema = Schema {
    name: "HostAddress",
    alternatives: &[Alternative {
        name: "address",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[field!("addr-type", 0, INT32), field!("address", 1, OCTETS)],
        },
    }],
};

const HOST_ADDRESSES: Schema = Schema {
    name: "HostAddresses",
    alternatives: &[Alternative {
        name: "addresses",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf {
            item: &HOST_ADDRESS,
        },
    }],
};

const ENCRYPTED_DATA: Schema = Schema {
    name: "EncryptedData",
    alternatives: &[Alternative {
        name: "EncryptedData",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("etype", 0, ETYPE),
                field!(optional "kvno", 1, UINT32),
                field!("cipher", 2, OCTETS),
            ],
        },
    }],
};

const CHECKSUM: Schema = Schema {
    name: "Checksum",
    alternatives: &[Alternative {
        name: "Checksum",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[field!("cksumtype", 0, INT32), field!("checksum", 1, OCTETS)],
        },
    }],
};

const TICKET: Schema = Schema {
    name: "Ticket",
    alternatives: &[Alternative::explicit("Ticket", app(1), &TICKET_BODY)],
};

const TICKET_BODY: Schema = Schema {
    name: "Ticket",
    alternatives: &[Alternative {
        name: "Ticket",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("tkt-vno", 0, INT32),
                field!("realm", 1, KERBEROS_STRING),
                field!("sname", 2, PRINCIPAL_NAME),
                field!("enc-part", 3, ENCRYPTED_DATA),
            ],
        },
    }],
};

const TICKETS: Schema = Schema {
    name: "SEQUENCE OF Ticket",
    alternatives: &[Alternative {
        name: "tickets",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf { item: &TICKET },
    }],
};

const ETYPES: Schema = Schema {
    name: "SEQUENCE OF Int32",
    alternatives: &[Alternative {
        name: "etypes",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf { item: &ETYPE },
    }],
};

const PA_DATA: Schema = Schema {
    name: "PA-DATA",
    alternatives: &[Alternative {
        name: "PA-DATA",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("padata-type", 1, INT32),
                field!("padata-value", 2, OCTETS),
            ],
        },
    }],
};

const PA_DATA_LIST: Schema = Schema {
    name: "SEQUENCE OF PA-DATA",
    alternatives: &[Alternative {
        name: "padata",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::SequenceOf { item: &PA_DATA },
    }],
};

const KDC_REQ_BODY: Schema = Schema {
    name: "KDC-REQ-BODY",
    alternatives: &[Alternative {
        name: "KDC-REQ-BODY",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("kdc-options", 0, FLAGS),
                field!(optional "cname", 1, PRINCIPAL_NAME),
                field!("realm", 2, KERBEROS_STRING),
                field!(optional "sname", 3, PRINCIPAL_NAME),
                field!(optional "from", 4, KERBEROS_TIME),
                field!("till", 5, KERBEROS_TIME),
                field!(optional "rtime", 6, KERBEROS_TIME),
                field!("nonce", 7, UINT32),
                field!("etype", 8, ETYPES),
                field!(optional "addresses", 9, HOST_ADDRESSES),
                field!(optional "enc-authorization-data", 10, ENCRYPTED_DATA),
                field!(optional "additional-tickets", 11, TICKETS),
            ],
        },
    }],
};

const KDC_REQ: Schema = Schema {
    name: "KDC-REQ",
    alternatives: &[Alternative {
        name: "KDC-REQ",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 1, INT32),
                field!("msg-type", 2, INT32),
                field!(optional "padata", 3, PA_DATA_LIST),
                field!("req-body", 4, KDC_REQ_BODY),
            ],
        },
    }],
};

const KDC_REP: Schema = Schema {
    name: "KDC-REP",
    alternatives: &[Alternative {
        name: "KDC-REP",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!(optional "padata", 2, PA_DATA_LIST),
                field!("crealm", 3, KERBEROS_STRING),
                field!("cname", 4, PRINCIPAL_NAME),
                field!("ticket", 5, TICKET),
                field!("enc-part", 6, ENCRYPTED_DATA),
            ],
        },
    }],
};

const AP_REQ_BODY: Schema = Schema {
    name: "AP-REQ",
    alternatives: &[Alternative {
        name: "AP-REQ",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!("ap-options", 2, FLAGS),
                field!("ticket", 3, TICKET),
                field!("authenticator", 4, ENCRYPTED_DATA),
            ],
        },
    }],
};

const AP_REP_BODY: Schema = Schema {
    name: "AP-REP",
    alternatives: &[Alternative {
        name: "AP-REP",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!("enc-part", 2, ENCRYPTED_DATA),
            ],
        },
    }],
};

const KRB_SAFE_BODY: Schema = Schema {
    name: "KRB-SAFE-BODY",
    alternatives: &[Alternative {
        name: "KRB-SAFE-BODY",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("user-data", 0, OCTETS),
                field!(optional "timestamp", 1, KERBEROS_TIME),
                field!(optional "usec", 2, INT32),
                field!(optional "seq-number", 3, UINT32),
                field!("s-address", 4, HOST_ADDRESS),
                field!(optional "r-address", 5, HOST_ADDRESS),
            ],
        },
    }],
};

const KRB_SAFE: Schema = Schema {
    name: "KRB-SAFE",
    alternatives: &[Alternative {
        name: "KRB-SAFE",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!("safe-body", 2, KRB_SAFE_BODY),
                field!("cksum", 3, CHECKSUM),
            ],
        },
    }],
};

const KRB_PRIV: Schema = Schema {
    name: "KRB-PRIV",
    alternatives: &[Alternative {
        name: "KRB-PRIV",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!("enc-part", 3, ENCRYPTED_DATA),
            ],
        },
    }],
};

const KRB_CRED: Schema = Schema {
    name: "KRB-CRED",
    alternatives: &[Alternative {
        name: "KRB-CRED",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!("tickets", 2, TICKETS),
                field!("enc-part", 3, ENCRYPTED_DATA),
            ],
        },
    }],
};

const KRB_ERROR: Schema = Schema {
    name: "KRB-ERROR",
    alternatives: &[Alternative {
        name: "KRB-ERROR",
        tag: TagMatch::Exact(SEQUENCE),
        body: Body::Sequence {
            fields: &[
                field!("pvno", 0, INT32),
                field!("msg-type", 1, INT32),
                field!(optional "ctime", 2, KERBEROS_TIME),
                field!(optional "cusec", 3, INT32),
                field!("stime", 4, KERBEROS_TIME),
                field!("susec", 5, INT32),
                field!("error-code", 6, INT32),
                field!(optional "crealm", 7, KERBEROS_STRING),
                field!(optional "cname", 8, PRINCIPAL_NAME),
                field!("realm", 9, KERBEROS_STRING),
                field!("sname", 10, PRINCIPAL_NAME),
                field!(optional "e-text", 11, KERBEROS_STRING),
                field!(optional "e-data", 12, OCTETS),
            ],
        },
    }],
};

pub static AP_REQ: Schema = Schema {
    name: "AP-REQ",
    alternatives: &[Alternative::explicit("ap-req", app(14), &AP_REQ_BODY)],
};

/// Any Kerberos message, told apart by its application tag
pub static KRB5_MESSAGE: Schema = Schema {
    name: "Kerberos",
    alternatives: &[
        Alternative::explicit("as-req", app(10), &KDC_REQ),
        Alternative::explicit("as-rep", app(11), &KDC_REP),
        Alternative::explicit("tgs-req", app(12), &KDC_REQ),
        Alternative::explicit("tgs-rep", app(13), &KDC_REP),
        Alternative::explicit("ap-req", app(14), &AP_REQ_BODY),
        Alternative::explicit("ap-rep", app(15), &AP_REP_BODY),
        Alternative::explicit("krb-safe", app(20), &KRB_SAFE),
        Alternative::explicit("krb-priv", app(21), &KRB_PRIV),
        Alternative::explicit("krb-cred", app(22), &KRB_CRED),
        Alternative::explicit("krb-error", app(30), &KRB_ERROR),
    ],
};
