//! Option keys understood by the DataObject driver.

use datagrid_core::Options;

/// Read fields from the record set's private attributes instead of its public mapping.
pub const USE_PRIVATE_VARS: &str = "use_private_vars";
/// Name of the record-set property holding label overrides.
pub const LABELS_PROPERTY: &str = "labels_property";
/// Name of the record-set property holding the fields to render.
pub const FIELDS_PROPERTY: &str = "fields_property";
/// Name of the record-set property holding the default sort fields.
pub const SORT_PROPERTY: &str = "sort_property";
/// Enable linked-field resolution and formbuilder field ordering.
pub const FORMBUILDER_INTEGRATION: &str = "formbuilder_integration";
/// Count by running the full query instead of the record set's fast count.
pub const RAW_COUNT: &str = "raw_count";

/// Record-set property giving the preferred field order (formbuilder integration).
pub const PREDEFINED_ORDER_PROPERTY: &str = "fb_preDefOrder";
/// Record-set property naming the fields that represent a linked record.
pub const LINK_DISPLAY_FIELDS_PROPERTY: &str = "fb_linkDisplayFields";

/// Driver defaults registered on construction.
pub fn default_options() -> Options {
    Options::new()
        .with(USE_PRIVATE_VARS, false)
        .with(LABELS_PROPERTY, "fb_fieldLabels")
        .with(FIELDS_PROPERTY, "fb_fieldsToRender")
        .with(SORT_PROPERTY, "fb_linkOrderFields")
        .with(FORMBUILDER_INTEGRATION, false)
        .with(RAW_COUNT, false)
}
