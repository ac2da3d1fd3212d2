use tracing::warn;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
/// Simple wrapper struct to implement Default trait for yaml_rust::Yaml
pub struct Yaml(pub yaml_rust::Yaml);

impl Default for Yaml {
    fn default() -> Self {
        Self(yaml_rust::Yaml::Null)
    }
}

impl AsRef<yaml_rust::Yaml> for Yaml {
    fn as_ref(&self) -> &yaml_rust::Yaml {
        &self.0
    }
}

impl AsMut<yaml_rust::Yaml> for Yaml {
    fn as_mut(&mut self) -> &mut yaml_rust::Yaml {
        &mut self.0
    }
}

pub fn get_boolean(doc: &yaml_rust::Yaml, key: &str, default: bool) -> bool {
    match doc[key] {
        yaml_rust::Yaml::Boolean(b) => b,
        yaml_rust::Yaml::BadValue => {
            warn!("Option {} not found or bad boolean value, set {} to {}", key, key, default);
            default
        }
        _ => {
            warn!("Wrong value type for {}, expecting boolean, set {} to {}", key, key, default);
            default
        }
    }
}

pub fn get_integer(doc: &yaml_rust::Yaml, key: &str, default: i64, min: i64, max: i64) -> i64 {
    match doc[key] {
        yaml_rust::Yaml::Integer(i) => {
            if i < min || i > max {
                warn!(
                    "Option {} is less/greater than min/max value {}/{}, set {} to {}",
                    key, min, max, key, default
                );
                default
            } else {
                i
            }
        }
        yaml_rust::Yaml::BadValue => {
            warn!("Option {} not found or bad integer value, set {} to {}", key, key, default);
            default
        }
        _ => {
            warn!("Wrong value type for {}, expecting integer, set {} to {}", key, key, default);
            default
        }
    }
}

pub fn get_str_arr(doc: &yaml_rust::Yaml, key: &str) -> Vec<String> {
    let mut result = vec![];
    match &doc[key] {
        yaml_rust::Yaml::Array(a) => {
            for element in a {
                match element {
                    yaml_rust::Yaml::String(s) => result.push(String::from(s)),
                    yaml_rust::Yaml::BadValue => warn!("Bad string value for {}'s element", key),
                    _ => warn!("Wrong value type for {}' element, expecting string", key),
                }
            }
        }
        yaml_rust::Yaml::BadValue => warn!(
            "Option {} not found or bad array value, set {} to empty array",
            key, key
        ),
        _ => warn!(
            "Wrong value type for {}, expecting array, set {} to empty array",
            key, key
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaml_rust::YamlLoader;

    fn doc(s: &str) -> yaml_rust::Yaml {
        YamlLoader::load_from_str(s).unwrap().remove(0)
    }

    #[test]
    fn integer_range_and_type() {
        let d = doc("ber.max.depth: 32\nbad: abc\nhuge: 99999");
        assert_eq!(get_integer(&d, "ber.max.depth", 64, 1, 1024), 32);
        assert_eq!(get_integer(&d, "bad", 64, 1, 1024), 64);
        assert_eq!(get_integer(&d, "huge", 64, 1, 1024), 64);
        assert_eq!(get_integer(&d, "missing", 7, 1, 1024), 7);
    }

    #[test]
    fn arrays_and_booleans() {
        let d = doc("quiet: yes\nverbose: true\nlist: [snmp, krb5, 3]");
        assert_eq!(get_str_arr(&d, "list"), vec!["snmp", "krb5"]);
        assert!(get_str_arr(&d, "missing").is_empty());
        assert!(get_boolean(&d, "verbose", false));
        assert!(!get_boolean(&d, "quiet", false));
        assert!(get_boolean(&d, "missing", true));
    }
}
