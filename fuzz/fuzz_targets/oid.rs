#![no_main]
use berdissect_utils::ber::Oid;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(oid) = Oid::decode(data) {
        let _ = oid.to_string();
        if !oid.is_lossy() {
            let again = Oid::decode(&oid.encode()).unwrap();
            assert_eq!(again.arcs(), oid.arcs());
        }
    }
});
