//! Bounds checked, read only view over the bytes of one packet.
//!
//! A capture may hold fewer bytes than the packet really had on the wire: the
//! snapshot length cut it short. `Tvb` keeps both numbers around, so a read
//! that runs past the captured bytes can be told apart from a read that runs
//! past what the packet itself claims to contain.

use std::cmp::min;

use crate::error::{Error, ErrorKind, Result};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tvb<'a> {
    /// Captured bytes, never longer than `reported_len`
    data: &'a [u8],
    reported_len: usize,
    /// Position of this view inside the top level packet
    base_offset: usize,
}

impl<'a> Tvb<'a> {
    /// A fully captured packet
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            reported_len: data.len(),
            base_offset: 0,
        }
    }

    /// A packet whose header claims `reported_len` bytes
    ///
    /// If fewer bytes were claimed than captured, the extra captured bytes are
    /// not part of the packet and are dropped.
    pub fn with_reported_len(data: &'a [u8], reported_len: usize) -> Self {
        let captured = min(data.len(), reported_len);
        Self {
            data: &data[..captured],
            reported_len,
            base_offset: 0,
        }
    }

    /// A packet captured with a snapshot length
    pub fn with_snaplen(data: &'a [u8], snaplen: usize) -> Self {
        let captured = min(data.len(), snaplen);
        Self {
            data: &data[..captured],
            reported_len: data.len(),
            base_offset: 0,
        }
    }

    #[inline]
    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn reported_len(&self) -> usize {
        self.reported_len
    }

    #[inline]
    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    /// Translate an offset of this view into top level packet coordinates
    #[inline]
    pub fn absolute(&self, offset: usize) -> usize {
        self.base_offset.saturating_add(offset)
    }

    /// Classify a read of `len` bytes at `offset`
    pub fn check(&self, offset: usize, len: usize) -> Result<()> {
        let end = match offset.checked_add(len) {
            Some(end) => end,
            None => return Err(Error::new(ErrorKind::Bounds, offset)),
        };
        if end > self.reported_len {
            Err(Error::new(ErrorKind::Bounds, offset))
        } else if end > self.data.len() {
            Err(Error::new(ErrorKind::ReportedBounds, offset))
        } else {
            Ok(())
        }
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    #[inline]
    pub fn read_u8(&self, offset: usize) -> Result<u8> {
        Ok(self.read(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16> {
        let b = self.read(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32> {
        let b = self.read(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Child view over `[offset, offset + len)` of this view
    ///
    /// The child's reported length is `len`, while its captured length is
    /// whatever part of that range this view actually holds. The child may
    /// therefore be partially captured, but never reaches past this view's
    /// reported length.
    pub fn subset(&self, offset: usize, len: usize) -> Result<Tvb<'a>> {
        let end = match offset.checked_add(len) {
            Some(end) if end <= self.reported_len => end,
            _ => return Err(Error::new(ErrorKind::Bounds, offset)),
        };
        let captured_end = min(end, self.data.len());
        let data = if offset < captured_end {
            &self.data[offset..captured_end]
        } else {
            &[]
        };
        Ok(Tvb {
            data,
            reported_len: len,
            base_offset: self.absolute(offset),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_inside_capture() {
        let buf = [1u8, 2, 3, 4];
        let tvb = Tvb::new(&buf);
        assert_eq!(tvb.read(1, 2).unwrap(), &[2, 3]);
        assert_eq!(tvb.read(4, 0).unwrap(), &[] as &[u8]);
        assert_eq!(tvb.read_u16(2).unwrap(), 0x0304);
        assert_eq!(tvb.read_u32(0).unwrap(), 0x01020304);
    }

    #[test]
    fn bounds_vs_reported_bounds() {
        let buf = [1u8, 2, 3, 4, 5, 6];
        let tvb = Tvb::with_snaplen(&buf, 4);
        assert_eq!(tvb.captured_len(), 4);
        assert_eq!(tvb.reported_len(), 6);

        let e = tvb.read(3, 2).unwrap_err();
        assert_eq!(e.kind, ErrorKind::ReportedBounds);
        assert_eq!(e.offset, 3);

        let e = tvb.read(3, 4).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Bounds);

        let e = tvb.read(usize::MAX, 2).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Bounds);
    }

    #[test]
    fn reported_shorter_than_captured() {
        let buf = [1u8, 2, 3, 4];
        let tvb = Tvb::with_reported_len(&buf, 2);
        assert_eq!(tvb.captured_len(), 2);
        assert_eq!(tvb.read(1, 2).unwrap_err().kind, ErrorKind::Bounds);
    }

    #[test]
    fn subset() {
        let buf = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let tvb = Tvb::with_snaplen(&buf, 6);
        let sub = tvb.subset(2, 3).unwrap();
        assert_eq!(sub.base_offset(), 2);
        assert_eq!(sub.read(0, 3).unwrap(), &[2, 3, 4]);
        assert_eq!(sub.read(1, 3).unwrap_err().kind, ErrorKind::Bounds);
        assert_eq!(sub.absolute(1), 3);

        let partial = tvb.subset(4, 4).unwrap();
        assert_eq!(partial.captured_len(), 2);
        assert_eq!(partial.reported_len(), 4);
        assert_eq!(partial.read(0, 3).unwrap_err().kind, ErrorKind::ReportedBounds);

        let nested = sub.subset(1, 2).unwrap();
        assert_eq!(nested.base_offset(), 3);

        assert!(tvb.subset(7, 2).is_err());
        let uncaptured = tvb.subset(7, 1).unwrap();
        assert_eq!(uncaptured.captured_len(), 0);
    }
}
