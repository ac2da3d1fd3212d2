use crate::utils::yaml::{self, Yaml};

/// Decode policy applied to every BER decode of one dissection
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecodeOptions {
    /// Maximum nesting of constructed values, for both the EOC scanner and
    /// the schema decoder
    pub max_depth: usize,
    /// Widest INTEGER accepted where the call site does not pick its own limit
    pub max_int_len: usize,
    /// Maximum number of elements collected by one SEQUENCE OF / SET OF
    pub max_items: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_int_len: 8,
            max_items: 4096,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Configure file dist location
    pub fpath: String,
    pub decode: DecodeOptions,
    /// Enabled processors, empty means all of them
    pub processors: Vec<String>,
    /// Truncate inputs to this many captured bytes, 0 means no truncation
    pub snaplen: usize,
    pub quiet: bool,
    pub verbose_mode: bool,
    pub doc: Yaml,
}

impl Config {
    /// Build a configuration from an already loaded YAML document
    pub fn from_yaml(doc: yaml_rust::Yaml) -> Self {
        let mut config = Config {
            doc: Yaml(doc),
            ..Default::default()
        };
        let defaults = DecodeOptions::default();
        config.decode.max_depth =
            config.get_integer("ber.max.depth", defaults.max_depth as i64, 1, 1024) as usize;
        config.decode.max_int_len =
            config.get_integer("ber.max.int.length", defaults.max_int_len as i64, 1, 16) as usize;
        config.decode.max_items =
            config.get_integer("ber.max.items", defaults.max_items as i64, 1, 1_000_000) as usize;
        config.processors = config.get_str_arr("processors");
        config.snaplen = config.get_integer("snaplen", 0, 0, u32::MAX as i64) as usize;
        config.quiet = config.get_boolean("quiet", false);
        config.verbose_mode = config.get_boolean("verbose", false);
        config
    }

    /// Whether the named processor should be registered
    pub fn processor_enabled(&self, name: &str) -> bool {
        self.processors.is_empty() || self.processors.iter().any(|p| p == name)
    }

    pub fn get_integer(&self, key: &str, default: i64, min: i64, max: i64) -> i64 {
        yaml::get_integer(self.doc.as_ref(), key, default, min, max)
    }

    pub fn get_str_arr(&self, key: &str) -> Vec<String> {
        yaml::get_str_arr(self.doc.as_ref(), key)
    }

    pub fn get_boolean(&self, key: &str, default: bool) -> bool {
        yaml::get_boolean(self.doc.as_ref(), key, default)
    }
}
