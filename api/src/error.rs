use std::fmt::{Display, Formatter};

use strum::{AsRefStr, Display as StrumDisplay};

/// Every way a decode can fail
///
/// These are ordinary return values: none of them is ever raised by panicking,
/// whatever the input bytes look like.
#[derive(AsRefStr, Clone, Copy, Debug, Eq, Hash, PartialEq, StrumDisplay)]
pub enum ErrorKind {
    /// A read would end past the reported length of the packet, or past the end
    /// of the enclosing container
    #[strum(serialize = "bounds")]
    Bounds,
    /// A read would end past the captured bytes but inside the reported length:
    /// the value exists on the wire but was not captured
    #[strum(serialize = "reported bounds")]
    ReportedBounds,
    /// Not enough bytes to complete a multi-octet identifier, length or
    /// indefinite-length content
    #[strum(serialize = "truncated")]
    Truncated,
    /// Class, constructed flag or tag number differs from the expected ones
    #[strum(serialize = "wrong type")]
    WrongType,
    /// A fixed shape type was encoded with an invalid length
    #[strum(serialize = "wrong length for type")]
    WrongLengthForType,
    /// A definite length is required here
    #[strum(serialize = "length not definite")]
    LengthNotDefinite,
    /// No schema alternative matched the decoded tag
    #[strum(serialize = "unexpected tag")]
    UnexpectedTag,
    /// Nesting depth or element count guard tripped
    #[strum(serialize = "too deep")]
    TooDeep,
}

impl ErrorKind {
    /// Whether the failure comes from missing bytes rather than from bytes that
    /// are present but wrong
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            ErrorKind::Bounds | ErrorKind::ReportedBounds | ErrorKind::Truncated
        )
    }
}

/// A decode failure located at the byte offset where the failing read began
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub offset: usize,
}

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Same error, with the offset shifted by `base`
    ///
    /// Used when an error raised inside a subset view is reported in the
    /// parent's coordinates.
    #[inline]
    pub fn rebase(self, base: usize) -> Self {
        Self {
            kind: self.kind,
            offset: self.offset.saturating_add(base),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
