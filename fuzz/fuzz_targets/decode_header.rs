#![no_main]
use berdissect_api::tvb::Tvb;
use berdissect_utils::ber::{decode_header, Cursor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cur = Cursor::new(Tvb::new(data));
    if decode_header(&mut cur).is_ok() {
        assert!(cur.offset() <= data.len());
    }
});
