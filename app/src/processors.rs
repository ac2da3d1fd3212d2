//! Every processor is linked in and registered here

use anyhow::{anyhow, Result};
use strum::{EnumString, EnumVariantNames, IntoStaticStr};

use berdissect_api as api;
use api::config::Config;
use api::dissector::{Builder, Dissector};

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumString, EnumVariantNames, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Protocol {
    Cops,
    GsmMap,
    #[strum(serialize = "krb5")]
    Krb5,
    Ldap,
    Snmp,
}

pub fn builders() -> Vec<Box<dyn Builder>> {
    vec![
        cops::new_builder(),
        gsm_map::new_builder(),
        krb5::new_builder(),
        ldap::new_builder(),
        snmp::new_builder(),
    ]
}

/// Build the dissector for `protocol`, if the configuration enables it
pub fn build(cfg: &Config, protocol: Protocol) -> Result<Box<dyn Dissector>> {
    let name: &'static str = protocol.into();
    if !cfg.processor_enabled(name) {
        return Err(anyhow!("processor {} is disabled by the configuration", name));
    }
    let builder = builders()
        .into_iter()
        .find(|b| b.name() == name)
        .ok_or_else(|| anyhow!("no processor named {}", name))?;
    builder.build(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::VariantNames;

    #[test]
    fn every_protocol_has_a_builder() {
        let cfg = Config::default();
        for name in Protocol::VARIANTS {
            let protocol = Protocol::from_str(name).unwrap();
            let dissector = build(&cfg, protocol).unwrap();
            assert_eq!(dissector.name(), *name);
        }
        assert_eq!(builders().len(), Protocol::VARIANTS.len());
    }

    #[test]
    fn disabled_processor() {
        let cfg = Config {
            processors: vec!["ldap".to_string()],
            ..Config::default()
        };
        assert!(build(&cfg, Protocol::Ldap).is_ok());
        assert!(build(&cfg, Protocol::Snmp).is_err());
    }
}
