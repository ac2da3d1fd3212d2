#![no_main]
use berdissect_api::config::{Config, DecodeOptions};
use berdissect_api::tree::ProtoTree;
use berdissect_api::tvb::Tvb;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = Config::default();
    let opts = DecodeOptions::default();
    let builders = vec![
        cops::new_builder(),
        gsm_map::new_builder(),
        krb5::new_builder(),
        ldap::new_builder(),
        snmp::new_builder(),
    ];
    for builder in builders {
        let dissector = builder.build(&cfg).unwrap();
        let mut tree = ProtoTree::new();
        match dissector.dissect(Tvb::new(data), &mut tree, &opts) {
            Ok(consumed) => assert!(consumed <= data.len()),
            Err(_) => assert!(tree.has_errors()),
        }
    }
});
