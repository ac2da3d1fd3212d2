use std::fs;

use anyhow::{Context, Result};
use clap::ArgMatches;
use yaml_rust::YamlLoader;

use berdissect_api as api;
use api::config::Config;

use super::commands::CliArg;

/// Load the config file, if any, then apply command line overrides
pub fn parse_args(matches: &ArgMatches) -> Result<Config> {
    let mut config = match matches.value_of(CliArg::Config.as_str()) {
        Some(config_file) => {
            let mut config = parse_config_file(config_file)?;
            config.fpath = config_file.to_string();
            config
        }
        None => Config::default(),
    };

    set_config_by_cli_args(&mut config, matches)?;

    Ok(config)
}

fn parse_config_file(config_file: &str) -> Result<Config> {
    let s = fs::read_to_string(config_file)
        .with_context(|| format!("failed to read config file {}", config_file))?;
    let docs = YamlLoader::load_from_str(&s)
        .with_context(|| format!("invalid YAML in {}", config_file))?;
    let doc = docs.into_iter().next().unwrap_or(yaml_rust::Yaml::Null);
    Ok(Config::from_yaml(doc))
}

fn set_config_by_cli_args(config: &mut Config, matches: &ArgMatches) -> Result<()> {
    if matches.is_present(CliArg::Quiet.as_str()) {
        config.quiet = true;
    }

    if matches.is_present(CliArg::Verbose.as_str()) {
        config.verbose_mode = true;
    }

    if let Some(snaplen) = matches.value_of(CliArg::Snaplen.as_str()) {
        config.snaplen = snaplen
            .parse()
            .with_context(|| format!("invalid snaplen {}", snaplen))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new_root_command;

    #[test]
    fn cli_overrides() {
        let matches = new_root_command()
            .get_matches_from_safe(vec!["berdissect", "-p", "snmp", "--snaplen", "12", "-v"])
            .unwrap();
        let cfg = parse_args(&matches).unwrap();
        assert_eq!(cfg.snaplen, 12);
        assert!(cfg.verbose_mode);
        assert!(!cfg.quiet);
        assert_eq!(cfg.decode.max_depth, 64);
    }

    #[test]
    fn bad_snaplen() {
        let matches = new_root_command()
            .get_matches_from_safe(vec!["berdissect", "-p", "ldap", "--snaplen", "lots"])
            .unwrap();
        assert!(parse_args(&matches).is_err());
    }

    #[test]
    fn unknown_protocol_rejected() {
        assert!(new_root_command()
            .get_matches_from_safe(vec!["berdissect", "-p", "dns"])
            .is_err());
    }
}
