//! Getter registry and per-field accessors.
//!
//! Record sets may expose a getter method for a field (`getFirstName` for
//! `first_name`). Getters are registered once per record-set type and
//! resolved against the field list when the source is bound, so reading a
//! row never has to search for a method by name.

use std::collections::HashMap;
use std::fmt;

use datagrid_core::Value;

use crate::record_set::DataObject;

/// A getter reading one field of the current row.
pub type Getter<R> = fn(&R) -> Value;

/// Conventional getter method name for a field.
///
/// Underscore-separated segments are capitalized and concatenated behind
/// a `get` prefix.
///
/// ```
/// use datagrid_dataobject::getter_name;
///
/// assert_eq!(getter_name("first_name"), "getFirstName");
/// assert_eq!(getter_name("email"), "getEmail");
/// ```
pub fn getter_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len() + 3);
    name.push_str("get");
    for segment in field.split('_') {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Getter methods exposed by a record-set type.
///
/// Method names match case-insensitively, so `getFirstName` and
/// `getfirstname` are the same getter.
pub struct Getters<R> {
    by_name: HashMap<String, (String, Getter<R>)>,
}

impl<R> Getters<R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Builder-style registration.
    pub fn with(mut self, method: &str, getter: Getter<R>) -> Self {
        self.insert(method, getter);
        self
    }

    /// Register a getter under its method name.
    pub fn insert(&mut self, method: &str, getter: Getter<R>) {
        self.by_name
            .insert(method.to_ascii_lowercase(), (method.to_string(), getter));
    }

    /// Look a getter up by method name.
    pub fn lookup(&self, method: &str) -> Option<Getter<R>> {
        self.by_name
            .get(&method.to_ascii_lowercase())
            .map(|(_, getter)| *getter)
    }

    /// Look up the conventional getter for a field.
    pub fn for_field(&self, field: &str) -> Option<Getter<R>> {
        self.lookup(&getter_name(field))
    }

    /// Number of registered getters.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check if no getter is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl<R> Default for Getters<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for Getters<R> {
    fn clone(&self) -> Self {
        Self {
            by_name: self.by_name.clone(),
        }
    }
}

impl<R> fmt::Debug for Getters<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.by_name.values().map(|(m, _)| m.as_str()).collect();
        methods.sort_unstable();
        f.debug_struct("Getters").field("methods", &methods).finish()
    }
}

/// How one field is read from the current row.
pub enum Accessor<R> {
    /// Through a registered getter
    Getter(Getter<R>),
    /// Straight from the attribute; NULL if unset
    Attribute,
}

impl<R> Clone for Accessor<R> {
    fn clone(&self) -> Self {
        match self {
            Accessor::Getter(g) => Accessor::Getter(*g),
            Accessor::Attribute => Accessor::Attribute,
        }
    }
}

impl<R> fmt::Debug for Accessor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Getter(_) => f.write_str("Getter"),
            Accessor::Attribute => f.write_str("Attribute"),
        }
    }
}

/// Field → accessor table resolved for one field list.
pub struct Accessors<R> {
    getters: Getters<R>,
    resolved: Vec<(String, Accessor<R>)>,
}

impl<R: DataObject> Accessors<R> {
    /// Create an empty table over a getter registry.
    pub fn new(getters: Getters<R>) -> Self {
        Self {
            getters,
            resolved: Vec::new(),
        }
    }

    /// Resolve accessors for a field list. A no-op if already resolved for it.
    pub fn resolve(&mut self, fields: &[String]) {
        let unchanged = self.resolved.len() == fields.len()
            && self
                .resolved
                .iter()
                .zip(fields)
                .all(|((name, _), field)| name == field);
        if unchanged {
            return;
        }

        self.resolved = fields
            .iter()
            .map(|field| {
                let accessor = match self.getters.for_field(field) {
                    Some(getter) => Accessor::Getter(getter),
                    None => Accessor::Attribute,
                };
                tracing::trace!(field = %field, accessor = ?accessor, "Resolved field accessor");
                (field.clone(), accessor)
            })
            .collect();
    }

    /// Accessor resolved for a field.
    pub fn accessor(&self, field: &str) -> Option<&Accessor<R>> {
        self.resolved
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, accessor)| accessor)
    }

    /// Fields in resolution order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.resolved.iter().map(|(name, _)| name.as_str())
    }

    /// Read every resolved field from the current row.
    pub fn read(&self, object: &R) -> Vec<Value> {
        self.resolved
            .iter()
            .map(|(name, accessor)| match accessor {
                Accessor::Getter(getter) => getter(object),
                Accessor::Attribute => object.field(name).unwrap_or(Value::Null),
            })
            .collect()
    }
}

impl<R> fmt::Debug for Accessors<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("getters", &self.getters)
            .field("resolved", &self.resolved)
            .finish()
    }
}
