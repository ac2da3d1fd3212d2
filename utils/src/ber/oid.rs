//! OBJECT IDENTIFIER codec.
//!
//! On the wire an OID is a run of sub-identifiers, each a base-128 number with
//! bit 8 set on every octet but its last. The first sub-identifier packs the
//! first two arcs together: `first * 40 + second`.

use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use berdissect_api::error::{Error, ErrorKind, Result};

/// Decoded OBJECT IDENTIFIER
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Oid {
    arcs: Vec<u32>,
    /// Set when a sub-identifier did not fit in 32 bits and was saturated
    lossy: bool,
}

impl Oid {
    pub fn from_arcs(arcs: &[u32]) -> Self {
        Self {
            arcs: arcs.to_vec(),
            lossy: false,
        }
    }

    /// Expand encoded sub-identifiers into arcs
    pub fn from_subidentifiers(subids: &[u32], lossy: bool) -> Self {
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        if let Some((&first, rest)) = subids.split_first() {
            match first {
                0..=39 => arcs.extend_from_slice(&[0, first]),
                40..=79 => arcs.extend_from_slice(&[1, first - 40]),
                _ => arcs.extend_from_slice(&[2, first - 80]),
            }
            arcs.extend_from_slice(rest);
        }
        Self { arcs, lossy }
    }

    /// Decode OID content octets
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (subids, lossy) = decode_subidentifiers(bytes)?;
        Ok(Self::from_subidentifiers(&subids, lossy))
    }

    /// Content octets for this OID
    ///
    /// The first two arcs are combined in 64 bits, so `2.4294967295` still
    /// encodes correctly.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        match self.arcs.as_slice() {
            [] => {}
            [first] => push_subidentifier(&mut out, *first as u64 * 40),
            [first, second, rest @ ..] => {
                push_subidentifier(&mut out, *first as u64 * 40 + *second as u64);
                for &arc in rest {
                    push_subidentifier(&mut out, arc as u64);
                }
            }
        }
        out
    }

    #[inline]
    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    #[inline]
    pub fn is_lossy(&self) -> bool {
        self.lossy
    }

    pub fn starts_with(&self, prefix: &[u32]) -> bool {
        self.arcs.starts_with(prefix)
    }
}

impl Display for Oid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_oid(&self.arcs))
    }
}

impl FromStr for Oid {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let arcs = s
            .split('.')
            .map(u32::from_str)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::from_arcs(&arcs))
    }
}

/// Split OID content octets into sub-identifiers
///
/// A sub-identifier too large for `u32` saturates to `u32::MAX` and the
/// second member of the result is set. Content ending in the middle of a
/// sub-identifier is `Truncated`, reported at the end of the content.
pub fn decode_subidentifiers(bytes: &[u8]) -> Result<(Vec<u32>, bool)> {
    let mut subids = Vec::new();
    let mut lossy = false;
    let mut value: u32 = 0;
    let mut pending = false;

    for &octet in bytes {
        value = match value
            .checked_mul(128)
            .and_then(|v| v.checked_add((octet & 0x7f) as u32))
        {
            Some(v) => v,
            None => {
                lossy = true;
                u32::MAX
            }
        };
        if octet & 0x80 != 0 {
            pending = true;
        } else {
            subids.push(value);
            value = 0;
            pending = false;
        }
    }

    if pending {
        return Err(Error::new(ErrorKind::Truncated, bytes.len()));
    }
    Ok((subids, lossy))
}

/// Encode sub-identifiers, minimal form
pub fn encode_subidentifiers(subids: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(subids.len());
    for &subid in subids {
        push_subidentifier(&mut out, subid as u64);
    }
    out
}

fn push_subidentifier(out: &mut Vec<u8>, value: u64) {
    let mut digits = [0u8; 10];
    let mut n = 0;
    let mut v = value;
    loop {
        digits[n] = (v & 0x7f) as u8;
        n += 1;
        v >>= 7;
        if v == 0 {
            break;
        }
    }
    for i in (0..n).rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(digits[i] | continuation);
    }
}

/// Dotted decimal form, `1.3.6.1.2.1`
pub fn format_oid(arcs: &[u32]) -> String {
    arcs.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
