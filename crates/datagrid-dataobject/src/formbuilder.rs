//! Display strings for linked records.
//!
//! With formbuilder integration enabled, a field that links to a record in
//! another table is shown as a short description of that record instead of
//! its raw key.

use datagrid_core::Value;

use crate::fields;
use crate::options::LINK_DISPLAY_FIELDS_PROPERTY;
use crate::record_set::DataObject;

/// Renders a linked record as a display string.
pub trait FormBuilder {
    /// Describe the linked record.
    fn data_object_string(&self, linked: &dyn DataObject) -> String;
}

/// Joins the linked record's display fields.
///
/// Display fields come from the record's `fb_linkDisplayFields` property;
/// without it the record's first field is used. Unset values are skipped.
#[derive(Debug, Clone)]
pub struct DefaultFormBuilder {
    separator: String,
}

impl Default for DefaultFormBuilder {
    fn default() -> Self {
        Self {
            separator: ", ".to_string(),
        }
    }
}

impl DefaultFormBuilder {
    /// Create a form builder joining display fields with `", "`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different separator between display fields.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl FormBuilder for DefaultFormBuilder {
    fn data_object_string(&self, linked: &dyn DataObject) -> String {
        let display_fields = linked
            .property(LINK_DISPLAY_FIELDS_PROPERTY)
            .and_then(fields::names)
            .unwrap_or_else(|| {
                linked
                    .to_map()
                    .into_iter()
                    .take(1)
                    .map(|(name, _)| name)
                    .collect()
            });

        display_fields
            .iter()
            .filter_map(|name| linked.field(name))
            .filter(|value| !value.is_null())
            .map(|value: Value| value.to_display_string())
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}
