use strum::IntoStaticStr;

pub const VERSION: u8 = 1;
pub const CLIENT_TYPE_COPS_PR: u16 = 2;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Primitive, IntoStaticStr)]
pub enum OpCode {
    #[strum(serialize = "REQ")]
    Request = 1,
    #[strum(serialize = "DEC")]
    Decision = 2,
    #[strum(serialize = "RPT")]
    Report = 3,
    #[strum(serialize = "DRQ")]
    DeleteRequest = 4,
    #[strum(serialize = "SSQ")]
    SyncRequest = 5,
    #[strum(serialize = "OPN")]
    ClientOpen = 6,
    #[strum(serialize = "CAT")]
    ClientAccept = 7,
    #[strum(serialize = "CC")]
    ClientClose = 8,
    #[strum(serialize = "KA")]
    KeepAlive = 9,
    #[strum(serialize = "SSC")]
    SyncComplete = 10,
}

/// Object classes
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Primitive, IntoStaticStr)]
pub enum CNum {
    #[strum(serialize = "handle")]
    Handle = 1,
    #[strum(serialize = "context")]
    Context = 2,
    #[strum(serialize = "in-interface")]
    InInterface = 3,
    #[strum(serialize = "out-interface")]
    OutInterface = 4,
    #[strum(serialize = "reason")]
    Reason = 5,
    #[strum(serialize = "decision")]
    Decision = 6,
    #[strum(serialize = "lpdp-decision")]
    LpdpDecision = 7,
    #[strum(serialize = "error")]
    Error = 8,
    #[strum(serialize = "client-si")]
    ClientSi = 9,
    #[strum(serialize = "keep-alive-timer")]
    KeepAliveTimer = 10,
    #[strum(serialize = "pep-id")]
    PepId = 11,
    #[strum(serialize = "report-type")]
    ReportType = 12,
    #[strum(serialize = "pdp-redirect-address")]
    PdpRedirectAddress = 13,
    #[strum(serialize = "last-pdp-address")]
    LastPdpAddress = 14,
    #[strum(serialize = "accounting-timer")]
    AccountingTimer = 15,
    #[strum(serialize = "integrity")]
    Integrity = 16,
}

/// COPS-PR sub-object classes, RFC 3084 section 4
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Primitive, IntoStaticStr)]
pub enum SNum {
    #[strum(serialize = "prid")]
    Prid = 1,
    #[strum(serialize = "pprid")]
    PrefixPrid = 2,
    #[strum(serialize = "epd")]
    Epd = 3,
    #[strum(serialize = "gperr")]
    GlobalError = 4,
    #[strum(serialize = "cperr")]
    ClassError = 5,
    #[strum(serialize = "error-prid")]
    ErrorPrid = 6,
}

/// Decision C-Types
pub const DECISION_FLAGS: u8 = 1;
pub const DECISION_NAMED: u8 = 5;
/// ClientSI C-Type carrying COPS-PR data
pub const CLIENT_SI_NAMED: u8 = 2;

pub const CLIENT_TYPES: &[(u16, &str)] = &[(1, "RSVP"), (CLIENT_TYPE_COPS_PR, "COPS-PR")];

pub const CONTEXT_TYPES: &[(u16, &str)] = &[
    (0x01, "Incoming-Message"),
    (0x02, "Resource-Allocation"),
    (0x04, "Outgoing-Message"),
    (0x08, "Configuration"),
];

pub const REASONS: &[(u16, &str)] = &[
    (1, "Unspecified"),
    (2, "Management"),
    (3, "Preempted"),
    (4, "Tear"),
    (5, "Timeout"),
    (6, "Route Change"),
    (7, "Insufficient Resources"),
    (8, "PDP's Directive"),
    (9, "Unsupported decision"),
    (10, "Synchronize Handle Unknown"),
    (11, "Transient Handle"),
    (12, "Malformed Decision"),
    (13, "Unknown COPS Object from PDP"),
];

pub const DECISION_COMMANDS: &[(u16, &str)] = &[(0, "NULL Decision"), (1, "Install"), (2, "Remove")];

pub const ERRORS: &[(u16, &str)] = &[
    (1, "Bad handle"),
    (2, "Invalid handle reference"),
    (3, "Bad message format"),
    (4, "Unable to process"),
    (5, "Mandatory client-specific info missing"),
    (6, "Unsupported client"),
    (7, "Mandatory COPS object missing"),
    (8, "Client Failure"),
    (9, "Communication Failure"),
    (10, "Unspecified"),
    (11, "Shutting down"),
    (12, "Redirect to Preferred Server"),
    (13, "Unknown COPS Object"),
    (14, "Authentication Failure"),
    (15, "Authentication Required"),
];

pub const REPORT_TYPES: &[(u16, &str)] = &[(1, "Success"), (2, "Failure"), (3, "Accounting")];

pub const GLOBAL_ERRORS: &[(u16, &str)] = &[
    (1, "availMemLow"),
    (2, "availMemExhausted"),
    (3, "unknownASN.1Tag"),
    (4, "maxMsgSizeExceeded"),
    (5, "unknownError"),
    (6, "maxRequestStatesOpen"),
    (7, "invalidASN.1Length"),
    (8, "invalidObjectPad"),
    (9, "unknownPIBData"),
    (10, "unknownCOPSPRObject"),
    (11, "malformedDecision"),
];

pub const CLASS_ERRORS: &[(u16, &str)] = &[
    (1, "priSpaceExhausted"),
    (2, "priInstanceInvalid"),
    (3, "attrValueInvalid"),
    (4, "attrValueSupported"),
    (5, "attrEnumSupported"),
    (6, "attrMaxLengthExceeded"),
    (7, "attrReferenceUnknown"),
    (8, "priNotifyOnly"),
    (9, "unknownPrc"),
    (10, "tooFewAttrs"),
    (11, "invalidAttrType"),
    (12, "deletedInRef"),
    (13, "priSpecificError"),
];

pub fn label(table: &[(u16, &'static str)], code: u16) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}
