//! Data source options and feature flags.
//!
//! Every data source keeps a string-keyed option store. Drivers register
//! their defaults once with [`DataSourceOptions::add_default_options`];
//! callers override them with [`DataSourceOptions::set_options`], either
//! programmatically or from a JSON document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Option key holding the list of fields to render.
pub const FIELDS: &str = "fields";
/// Option key holding field → label overrides.
pub const LABELS: &str = "labels";

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Flag
    Bool(bool),
    /// Integer setting
    Int(i64),
    /// String setting (property names, for instance)
    Text(String),
    /// Ordered list of names (fields, sort fields)
    List(Vec<String>),
    /// Name → text mapping (labels)
    Map(BTreeMap<String, String>),
}

impl OptionValue {
    /// Loose truthiness: zero, empty strings, `"0"` and empty collections are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Bool(v) => *v,
            OptionValue::Int(v) => *v != 0,
            OptionValue::Text(s) => !s.is_empty() && s != "0",
            OptionValue::List(items) => !items.is_empty(),
            OptionValue::Map(map) => !map.is_empty(),
        }
    }

    /// Get this value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a list of names.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get this value as a name → text map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            OptionValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Text(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Text(v)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::List(v)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::List(v.into_iter().map(str::to_string).collect())
    }
}

impl From<BTreeMap<String, String>> for OptionValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        OptionValue::Map(v)
    }
}

/// A set of options keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    entries: BTreeMap<String, OptionValue>,
}

impl Options {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an option.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    /// Check whether an option is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no option is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (key, value) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parse an option set from a JSON object.
    ///
    /// ```
    /// use datagrid_core::{OptionValue, Options};
    ///
    /// let opts = Options::from_json_str(r#"{"raw_count": true, "fields": ["id", "name"]}"#).unwrap();
    /// assert_eq!(opts.get("raw_count"), Some(&OptionValue::Bool(true)));
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid options document: {}", e),
                source: Some(Box::new(e)),
            })
        })
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for Options {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Options::new();
        for (k, v) in iter {
            options.insert(k, v);
        }
        options
    }
}

impl IntoIterator for Options {
    type Item = (String, OptionValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Optional capabilities a driver declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Sorting by several fields at once
    MultiSort,
}

/// The set of capabilities a driver declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    pub multi_sort: bool,
}

impl Features {
    /// Check whether a feature is declared.
    pub const fn has(&self, feature: Feature) -> bool {
        match feature {
            Feature::MultiSort => self.multi_sort,
        }
    }
}

/// Option storage shared by every data source driver.
///
/// Starts with the base options (`fields`, `labels`) empty.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceOptions {
    values: Options,
    features: Features,
}

impl Default for DataSourceOptions {
    fn default() -> Self {
        let values = Options::new()
            .with(FIELDS, OptionValue::List(Vec::new()))
            .with(LABELS, OptionValue::Map(BTreeMap::new()));
        Self {
            values,
            features: Features::default(),
        }
    }
}

impl DataSourceOptions {
    /// Create the store with base defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register driver defaults. Never overrides a value already present.
    pub fn add_default_options(&mut self, defaults: Options) {
        for (key, value) in defaults {
            self.values.entries.entry(key).or_insert(value);
        }
    }

    /// Merge options over the current values.
    pub fn set_options(&mut self, options: Options) {
        for (key, value) in options {
            tracing::trace!(option = %key, value = ?value, "Setting data source option");
            self.values.entries.insert(key, value);
        }
    }

    /// Set a single option.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.values.insert(key, value);
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Truthiness of an option; missing options are false.
    pub fn bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(OptionValue::is_truthy)
    }

    /// A non-empty string option.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(OptionValue::as_str)
            .filter(|s| !s.is_empty())
    }

    /// A list option; missing or non-list options read as empty.
    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(OptionValue::as_list).unwrap_or(&[])
    }

    /// A map option.
    pub fn map(&self, key: &str) -> Option<&BTreeMap<String, String>> {
        self.get(key).and_then(OptionValue::as_map)
    }

    /// The resolved field list.
    pub fn fields(&self) -> &[String] {
        self.list(FIELDS)
    }

    /// The resolved field → label overrides.
    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.map(LABELS)
    }

    /// All current values.
    pub fn values(&self) -> &Options {
        &self.values
    }

    /// Declare the driver's features.
    pub fn set_features(&mut self, features: Features) {
        self.features = features;
    }

    /// Check whether the driver declared a feature.
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.has(feature)
    }
}
