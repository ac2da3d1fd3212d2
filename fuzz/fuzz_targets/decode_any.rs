#![no_main]
use berdissect_api::config::DecodeOptions;
use berdissect_api::tvb::Tvb;
use berdissect_utils::ber::{decode_any, Cursor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let opts = DecodeOptions {
        max_depth: 32,
        ..DecodeOptions::default()
    };
    let mut cur = Cursor::new(Tvb::new(data));
    while !cur.is_exhausted() {
        let end = cur.end();
        match decode_any(&mut cur, end, &opts) {
            Ok(node) => assert!(node.end() <= data.len()),
            Err(_) => break,
        }
    }
});
