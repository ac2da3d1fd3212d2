//! Indefinite length contents and their end-of-contents marker.
//!
//! An indefinite length constructed value has no length octets to tell where
//! it stops: its contents run until a matching `00 00` marker. Every length
//! computed here is the content length only. Callers that need the span on
//! the wire add [`EOC_LEN`] themselves.

use berdissect_api::config::DecodeOptions;
use berdissect_api::error::{Error, ErrorKind, Result};

use super::identifier::continuation_error;
use super::{decode_header, Cursor, Length};

/// Bytes taken by the end-of-contents marker
pub const EOC_LEN: usize = 2;

/// Scan indefinite length contents starting at the cursor
///
/// Nested values with a definite length are skipped without being
/// interpreted; nested indefinite values are scanned recursively, `depth`
/// counting how many indefinite values enclose the current one. On success
/// the cursor sits right after the terminating marker and the content length,
/// marker excluded, is returned.
pub fn find_eoc(cur: &mut Cursor<'_>, depth: usize, opts: &DecodeOptions) -> Result<usize> {
    let start = cur.offset();
    if depth >= opts.max_depth {
        return Err(Error::new(ErrorKind::TooDeep, start));
    }

    loop {
        if cur.is_exhausted() {
            return Err(Error::new(ErrorKind::Truncated, cur.offset()));
        }
        let at = cur.offset();
        let (tag, length) = decode_header(cur).map_err(continuation_error)?;

        if tag.is_eoc() {
            return match length {
                Length::Definite(0) => Ok(at - start),
                _ => Err(Error::new(ErrorKind::WrongLengthForType, at)),
            };
        }

        match length {
            Length::Definite(n) => cur.skip(n as usize)?,
            Length::Indefinite if !tag.constructed => {
                return Err(Error::new(ErrorKind::LengthNotDefinite, at));
            }
            Length::Indefinite => {
                find_eoc(cur, depth + 1, opts)?;
            }
        }
    }
}

/// Content length of a value whose header has just been decoded
///
/// The cursor does not move.
pub fn content_length(
    cur: &Cursor<'_>,
    length: Length,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<usize> {
    match length {
        Length::Definite(n) => Ok(n as usize),
        Length::Indefinite => {
            let mut scan = *cur;
            find_eoc(&mut scan, depth, opts)
        }
    }
}

/// Consume an end-of-contents marker
pub fn consume_eoc(cur: &mut Cursor<'_>) -> Result<()> {
    let at = cur.offset();
    let (tag, length) = decode_header(cur).map_err(continuation_error)?;
    if !tag.is_eoc() {
        return Err(Error::new(ErrorKind::WrongType, at));
    }
    if length != Length::Definite(0) {
        return Err(Error::new(ErrorKind::WrongLengthForType, at));
    }
    Ok(())
}

/// Contents of one constructed value
#[derive(Clone, Copy, Debug)]
pub struct Contents<'a> {
    /// Cursor over the contents only, end-of-contents marker excluded
    pub cursor: Cursor<'a>,
    pub indefinite: bool,
    start: usize,
}

impl<'a> Contents<'a> {
    /// Offset of the first content byte
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.cursor.end() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes between the end of the header and the end of the value
    pub fn span(&self) -> usize {
        if self.indefinite {
            self.len() + EOC_LEN
        } else {
            self.len()
        }
    }
}

/// Bound the contents of the value whose header was just decoded
///
/// Definite and indefinite contents look the same to the caller: a cursor
/// that stops where the contents stop. The parent cursor does not move until
/// [`close_contents`].
pub fn open_contents<'a>(
    cur: &Cursor<'a>,
    length: Length,
    depth: usize,
    opts: &DecodeOptions,
) -> Result<Contents<'a>> {
    let len = content_length(cur, length, depth, opts)?;
    Ok(Contents {
        cursor: cur.bounded(len)?,
        indefinite: length == Length::Indefinite,
        start: cur.offset(),
    })
}

/// Move the parent cursor past contents opened by [`open_contents`]
///
/// Indefinite contents are followed by their end-of-contents marker, which is
/// consumed here.
pub fn close_contents(cur: &mut Cursor<'_>, contents: &Contents<'_>) -> Result<()> {
    cur.seek(contents.cursor.end())?;
    if contents.indefinite {
        consume_eoc(cur)?;
    }
    Ok(())
}
