//! Values for configuration-file substitution and the files that use them.
//!
//! Substitution itself happens outside the model; these types only carry the
//! data to whoever performs it.

use crate::error::{BuildError, Result};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) => f.write_str(s),
            ConfigValue::Integer(i) => write!(f, "{i}"),
            ConfigValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationData {
    values: IndexMap<String, ConfigValue>,
}

impl ConfigurationData {
    pub fn new() -> Self {
        ConfigurationData::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Result<&ConfigValue> {
        self.values
            .get(name)
            .ok_or_else(|| BuildError::MissingConfigValue {
                key: name.to_string(),
            })
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigureFile {
    subdir: String,
    sourcename: String,
    targetname: String,
    configuration_data: Rc<ConfigurationData>,
}

impl ConfigureFile {
    pub fn new(
        subdir: impl Into<String>,
        sourcename: impl Into<String>,
        targetname: impl Into<String>,
        configuration_data: Rc<ConfigurationData>,
    ) -> Self {
        ConfigureFile {
            subdir: subdir.into(),
            sourcename: sourcename.into(),
            targetname: targetname.into(),
            configuration_data,
        }
    }

    pub fn get_subdir(&self) -> &str {
        &self.subdir
    }

    pub fn get_source_name(&self) -> &str {
        &self.sourcename
    }

    pub fn get_target_name(&self) -> &str {
        &self.targetname
    }

    pub fn get_configuration_data(&self) -> &Rc<ConfigurationData> {
        &self.configuration_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_enumeration() {
        let mut data = ConfigurationData::new();
        data.set("VERSION", "1.4.0");
        data.set("HAVE_ZLIB", true);
        data.set("MAX_JOBS", 8i64);

        assert_eq!(data.get("VERSION").unwrap().to_string(), "1.4.0");
        assert_eq!(data.get("MAX_JOBS").unwrap(), &ConfigValue::Integer(8));
        assert!(data.has("HAVE_ZLIB"));
        let keys: Vec<_> = data.keys().collect();
        assert_eq!(keys, vec!["VERSION", "HAVE_ZLIB", "MAX_JOBS"]);
    }

    #[test]
    fn missing_key_is_an_error() {
        let data = ConfigurationData::new();
        assert_eq!(
            data.get("NOPE").unwrap_err(),
            BuildError::MissingConfigValue { key: "NOPE".into() }
        );
    }

    #[test]
    fn configure_file_shares_its_data() {
        let mut data = ConfigurationData::new();
        data.set("PREFIX", "/usr");
        let data = Rc::new(data);
        let file = ConfigureFile::new("src", "config.h.in", "config.h", Rc::clone(&data));
        assert_eq!(file.get_subdir(), "src");
        assert_eq!(file.get_source_name(), "config.h.in");
        assert_eq!(file.get_target_name(), "config.h");
        assert!(Rc::ptr_eq(file.get_configuration_data(), &data));
    }
}
