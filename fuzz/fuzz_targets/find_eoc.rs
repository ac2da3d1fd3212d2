#![no_main]
use berdissect_api::config::DecodeOptions;
use berdissect_api::tvb::Tvb;
use berdissect_utils::ber::{find_eoc, Cursor, EOC_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cur = Cursor::new(Tvb::new(data));
    if let Ok(len) = find_eoc(&mut cur, 0, &DecodeOptions::default()) {
        assert_eq!(cur.offset(), len + EOC_LEN);
        assert_eq!(&data[len..len + EOC_LEN], &[0, 0]);
    }
});
