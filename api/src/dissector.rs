use anyhow::Result;

use crate::config::{Config, DecodeOptions};
use crate::error;
use crate::tree::ProtoTree;
use crate::tvb::Tvb;

/// A protocol handler turning the bytes of one PDU into field events
///
/// Implementations keep no state between calls, so one dissector may serve
/// independent packets from several threads.
pub trait Dissector: Send + Sync {
    /// Protocol short name
    fn name(&self) -> &'static str;

    /// Dissect one PDU, returning the number of bytes consumed
    ///
    /// On a malformed structure the dissector appends an error item to `tree`
    /// at the offset where decoding stopped, and returns that error. Items
    /// decoded before the failure stay in the tree.
    fn dissect(&self, tvb: Tvb<'_>, tree: &mut ProtoTree, opts: &DecodeOptions)
        -> error::Result<usize>;
}

/// Creates a dissector from the loaded configuration
pub trait Builder {
    fn name(&self) -> &'static str;

    fn build(&self, cfg: &Config) -> Result<Box<dyn Dissector>>;
}
