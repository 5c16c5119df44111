//! Output records handed to the grid.

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Field names shared across all records of one fetch.
///
/// Wrapped in `Arc` so every record from the same fetch shares the same
/// field list instead of repeating it per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    /// Field names in output order
    names: Vec<String>,
    /// Name -> index mapping for O(1) lookup
    name_to_index: HashMap<String, usize>,
}

impl Columns {
    /// Create the field list from names in output order.
    ///
    /// A repeated name resolves to its first position.
    pub fn new(names: Vec<String>) -> Self {
        let mut name_to_index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            name_to_index.entry(name.clone()).or_insert(i);
        }
        Self {
            names,
            name_to_index,
        }
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get the index of a field by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Check if a field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Get all field names.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// One row as handed to the grid: an ordered field-name → value mapping.
///
/// A field the underlying row did not provide is present with `Value::Null`,
/// so every record of a fetch has exactly the same fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Field values in order
    values: Vec<Value>,
    /// Shared field names
    columns: Arc<Columns>,
}

impl Record {
    /// Create a record with its own field list.
    ///
    /// For multiple records from the same fetch, prefer `with_columns`.
    pub fn new(field_names: Vec<String>, values: Vec<Value>) -> Self {
        Self::with_columns(Arc::new(Columns::new(field_names)), values)
    }

    /// Create a record sharing an existing field list.
    ///
    /// Values are padded with `Value::Null` (or truncated) to the field count.
    pub fn with_columns(columns: Arc<Columns>, mut values: Vec<Value>) -> Self {
        values.resize(columns.len(), Value::Null);
        Self { values, columns }
    }

    /// Get the shared field list.
    pub fn columns(&self) -> Arc<Columns> {
        Arc::clone(&self.columns)
    }

    /// Get the number of fields in this record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if this record has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Get a value by field name.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Check if a field exists by name.
    pub fn contains_field(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Replace the value of an existing field. Returns `false` if the field is unknown.
    pub fn set(&mut self, name: &str, value: Value) -> bool {
        match self.columns.index_of(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// Get all field names.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.names().iter().map(String::as_str)
    }

    /// Iterate over all values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    /// Iterate over (field_name, value) pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Render this record as a JSON object keeping field order.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value.to_json())?;
        }
        map.end()
    }
}
