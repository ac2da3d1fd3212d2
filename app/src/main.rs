#[macro_use]
extern crate clap;

use std::fs;
use std::io::{self, Read};

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use serde_json::json;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use berdissect_api as api;
use api::config::Config;
use api::dissector::Dissector;
use api::tree::ProtoTree;
use api::tvb::Tvb;

mod commands;
mod config;
mod processors;

use commands::CliArg;
use processors::Protocol;

fn init_tracing(cfg: &Config) {
    let level = if cfg.verbose_mode {
        "debug"
    } else if cfg.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_hex(s: &str) -> Result<Vec<u8>> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&cleaned).map_err(|e| anyhow!("invalid hex input: {}", e))
}

fn read_input(matches: &ArgMatches) -> Result<Vec<u8>> {
    if let Some(hex) = matches.value_of(CliArg::Hex.as_str()) {
        return parse_hex(hex);
    }
    if let Some(path) = matches.value_of(CliArg::RawFile.as_str()) {
        return fs::read(path).with_context(|| format!("failed to read {}", path));
    }
    let mut s = String::new();
    io::stdin().read_to_string(&mut s)?;
    parse_hex(&s)
}

/// Dissect `data` and describe the outcome as JSON
fn dissect(dissector: &dyn Dissector, data: &[u8], cfg: &Config) -> serde_json::Value {
    let tvb = if cfg.snaplen > 0 {
        Tvb::with_snaplen(data, cfg.snaplen)
    } else {
        Tvb::new(data)
    };
    let mut tree = ProtoTree::new();
    let (consumed, error) = match dissector.dissect(tvb, &mut tree, &cfg.decode) {
        Ok(consumed) => (Some(consumed), None),
        Err(e) => {
            warn!(protocol = dissector.name(), %e, "dissection stopped");
            (None, Some(e.to_string()))
        }
    };
    if let Some(consumed) = consumed {
        if consumed < data.len() {
            debug!(consumed, len = data.len(), "trailing bytes left");
        }
    }
    json!({
        "protocol": dissector.name(),
        "consumed": consumed,
        "error": error,
        "items": tree.items,
    })
}

fn main() -> Result<()> {
    let matches = commands::new_root_command().get_matches();
    let cfg = config::parse_args(&matches)?;
    init_tracing(&cfg);

    let protocol = value_t!(matches, CliArg::Protocol.as_str(), Protocol)?;
    let dissector = processors::build(&cfg, protocol)?;
    let data = read_input(&matches)?;

    let out = dissect(dissector.as_ref(), &data, &cfg);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_input() {
        assert_eq!(parse_hex("30 03:02 01\n05").unwrap(), vec![0x30, 0x03, 0x02, 0x01, 0x05]);
        assert!(parse_hex("3").is_err());
        assert!(parse_hex("zz").is_err());
    }

    #[test]
    fn dissect_to_json() {
        let cfg = Config::default();
        let dissector = processors::build(&cfg, Protocol::Snmp).unwrap();
        let data = parse_hex(
            "302602010004067075626c6963a019020101020100020100300e300c06082b060102010101000500",
        )
        .unwrap();
        let out = dissect(dissector.as_ref(), &data, &cfg);
        assert_eq!(out["protocol"], "snmp");
        assert_eq!(out["consumed"], 40);
        assert!(out["error"].is_null());
        assert_eq!(out["items"][0]["display"], "version-1 get-request");
    }

    #[test]
    fn truncated_input_reports_error() {
        let cfg = Config {
            snaplen: 10,
            ..Config::default()
        };
        let dissector = processors::build(&cfg, Protocol::Snmp).unwrap();
        let data = parse_hex(
            "302602010004067075626c6963a019020101020100020100300e300c06082b060102010101000500",
        )
        .unwrap();
        let out = dissect(dissector.as_ref(), &data, &cfg);
        assert!(out["consumed"].is_null());
        assert!(out["error"].as_str().unwrap().starts_with("reported bounds"));
        assert!(!out["items"].as_array().unwrap().is_empty());
    }
}
