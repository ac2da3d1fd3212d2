use berdissect_api::error::{Error, ErrorKind, Result};
use berdissect_api::tvb::Tvb;

/// Parse position inside a [`Tvb`], limited to an end offset
///
/// A cursor created by [`Cursor::bounded`] covers the content of one
/// container: whatever the bytes claim, no read through it can go past that
/// container's end.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Cursor<'a> {
    tvb: Tvb<'a>,
    offset: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tvb: Tvb<'a>) -> Self {
        Self::at(tvb, 0)
    }

    pub fn at(tvb: Tvb<'a>, offset: usize) -> Self {
        Self {
            tvb,
            offset,
            end: tvb.reported_len(),
        }
    }

    #[inline]
    pub fn tvb(&self) -> Tvb<'a> {
        self.tvb
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.end.saturating_sub(self.offset)
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.end
    }

    /// Offset right after `len` more bytes, if they fit before `end`
    fn stop(&self, len: usize) -> Result<usize> {
        match self.offset.checked_add(len) {
            Some(stop) if stop <= self.end => Ok(stop),
            _ => Err(Error::new(ErrorKind::Bounds, self.offset)),
        }
    }

    pub fn read(&mut self, len: usize) -> Result<&'a [u8]> {
        let stop = self.stop(len)?;
        let bytes = self.tvb.read(self.offset, len)?;
        self.offset = stop;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        let mut peek = *self;
        peek.read_u8()
    }

    /// Move past `len` bytes without looking at them
    ///
    /// The skipped bytes still have to be captured: skipping content that
    /// was not captured fails with `ReportedBounds`.
    pub fn skip(&mut self, len: usize) -> Result<()> {
        let stop = self.stop(len)?;
        self.tvb.check(self.offset, len)?;
        self.offset = stop;
        Ok(())
    }

    /// Cursor over the next `len` bytes only
    ///
    /// `self` does not move; callers skip the span once they are done with it.
    pub fn bounded(&self, len: usize) -> Result<Cursor<'a>> {
        let stop = self.stop(len)?;
        Ok(Cursor {
            tvb: self.tvb,
            offset: self.offset,
            end: stop,
        })
    }

    /// Narrow this cursor's end to `end`
    pub fn limit(&self, end: usize) -> Result<Cursor<'a>> {
        if end < self.offset || end > self.end {
            return Err(Error::new(ErrorKind::Bounds, self.offset));
        }
        Ok(Cursor {
            tvb: self.tvb,
            offset: self.offset,
            end,
        })
    }

    /// Catch up with a child cursor derived from this one
    pub fn advance_to(&mut self, child: &Cursor<'a>) -> Result<()> {
        self.seek(child.offset)
    }

    /// Move forward to `offset`, which must not be past `end`
    ///
    /// Unlike [`Cursor::skip`] the bytes in between need not be captured.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset < self.offset || offset > self.end {
            return Err(Error::new(ErrorKind::Bounds, self.offset));
        }
        self.offset = offset;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut cur = Cursor::new(Tvb::new(&buf));
        assert_eq!(cur.read_u8().unwrap(), 1);
        assert_eq!(cur.peek_u8().unwrap(), 2);
        assert_eq!(cur.read(2).unwrap(), &[2, 3]);
        assert_eq!(cur.offset(), 3);
        assert_eq!(cur.remaining(), 2);
        cur.skip(2).unwrap();
        assert!(cur.is_exhausted());
        let err = cur.read_u8().unwrap_err();
        assert_eq!(err, Error::new(ErrorKind::Bounds, 5));
    }

    #[test]
    fn bounded_cannot_escape() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut cur = Cursor::new(Tvb::new(&buf));
        cur.skip(1).unwrap();
        let mut inner = cur.bounded(2).unwrap();
        assert_eq!(inner.end(), 3);
        assert_eq!(inner.read(2).unwrap(), &[2, 3]);
        assert_eq!(inner.read_u8().unwrap_err().kind, ErrorKind::Bounds);
        cur.advance_to(&inner).unwrap();
        assert_eq!(cur.offset(), 3);
        assert!(cur.bounded(3).is_err());
        assert!(cur.limit(6).is_err());
        assert_eq!(cur.limit(4).unwrap().remaining(), 1);
        assert!(cur.seek(2).is_err());
        cur.seek(5).unwrap();
        assert!(cur.is_exhausted());
    }

    #[test]
    fn skip_uncaptured() {
        let buf = [1u8, 2, 3, 4, 5];
        let mut cur = Cursor::new(Tvb::with_snaplen(&buf, 2));
        assert_eq!(cur.skip(4).unwrap_err().kind, ErrorKind::ReportedBounds);
        assert_eq!(cur.skip(6).unwrap_err().kind, ErrorKind::Bounds);
    }
}
