use clap::{App, Arg};
use strum::VariantNames;

use crate::processors::Protocol;

/// Avaliable command line arguments
pub enum CliArg {
    Config,
    Hex,
    Protocol,
    RawFile,
    Quiet,
    Snaplen,
    Verbose,
}

impl CliArg {
    pub fn as_str(&self) -> &str {
        match self {
            &CliArg::Config => "config",
            &CliArg::Hex => "hex",
            &CliArg::Protocol => "protocol",
            &CliArg::RawFile => "raw-file",
            &CliArg::Quiet => "quiet",
            &CliArg::Snaplen => "snaplen",
            &CliArg::Verbose => "verbose",
        }
    }
}

/// Construct a new clap root command
pub fn new_root_command<'a>() -> clap::App<'a, 'static> {
    App::new(crate_name!())
        .version(crate_version!())
        .about("Dissect one BER encoded PDU and print its field tree as JSON")
        .args(&[
            Arg::with_name(CliArg::Config.as_str())
                .short("c")
                .value_name("FILE")
                .help("Use a specific config file")
                .takes_value(true),
            Arg::with_name(CliArg::Hex.as_str())
                .short("x")
                .long("hex")
                .value_name("HEX")
                .help("PDU bytes as a hex string, whitespace and colons ignored")
                .takes_value(true)
                .conflicts_with(CliArg::RawFile.as_str()),
            Arg::with_name(CliArg::Protocol.as_str())
                .short("p")
                .long("protocol")
                .value_name("PROTOCOL")
                .help("Processor used to dissect the input")
                .takes_value(true)
                .required(true)
                .possible_values(Protocol::VARIANTS),
            Arg::with_name(CliArg::RawFile.as_str())
                .short("r")
                .value_name("FILE")
                .help("Read the PDU from a raw binary file, hex from stdin otherwise")
                .takes_value(true)
                .conflicts_with(CliArg::Hex.as_str()),
            Arg::with_name(CliArg::Quiet.as_str())
                .short("q")
                .long("quiet")
                .help("Only log warnings and errors"),
            Arg::with_name(CliArg::Snaplen.as_str())
                .long("snaplen")
                .value_name("BYTES")
                .help("Pretend only this many bytes were captured")
                .takes_value(true),
            Arg::with_name(CliArg::Verbose.as_str())
                .short("v")
                .long("verbose")
                .help("Turn on debug logging"),
        ])
}
