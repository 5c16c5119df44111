//! Field list resolution helpers.

use std::collections::HashSet;

use datagrid_core::OptionValue;

/// Name fragments marking formbuilder link pseudo-fields.
///
/// These fields describe relations, not columns, and are never rendered.
pub const LINK_MARKERS: [&str; 3] = ["__tripleLink_", "__crossLink_", "__reverseLink_"];

/// Interpret a record-set property as a list of names.
///
/// A list is taken as is; a single non-empty string is a one-element list.
pub fn names(value: OptionValue) -> Option<Vec<String>> {
    match value {
        OptionValue::List(names) => Some(names),
        OptionValue::Text(name) if !name.is_empty() => Some(vec![name]),
        _ => None,
    }
}

/// Move the fields named in `order` to the front, in that order.
///
/// Names in `order` that are not fields are ignored, repeated names count
/// once, and the remaining fields keep their relative order.
///
/// ```
/// use datagrid_dataobject::fields::order_by_predefined;
///
/// let fields: Vec<String> = vec!["a".into(), "b".into(), "c".into(), "d".into()];
/// let order: Vec<String> = vec!["c".into(), "a".into()];
/// assert_eq!(order_by_predefined(fields, &order), ["c", "a", "b", "d"]);
/// ```
pub fn order_by_predefined(fields: Vec<String>, order: &[String]) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::with_capacity(fields.len());
    for name in order {
        if fields.contains(name) && !ordered.contains(name) {
            ordered.push(name.clone());
        }
    }
    let rest: Vec<String> = fields
        .into_iter()
        .filter(|field| !ordered.contains(field))
        .collect();
    ordered.extend(rest);
    ordered
}

/// The field list with repeated names dropped, keeping the first occurrence.
pub fn unique(fields: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(fields.len());
    fields
        .iter()
        .filter(|field| seen.insert(field.as_str()))
        .cloned()
        .collect()
}

/// Whether a field name is a formbuilder link pseudo-field.
pub fn is_link_field(name: &str) -> bool {
    LINK_MARKERS.iter().any(|marker| name.contains(marker))
}

/// Drop link pseudo-fields, keeping order.
pub fn strip_link_fields(fields: Vec<String>) -> Vec<String> {
    fields
        .into_iter()
        .filter(|field| !is_link_field(field))
        .collect()
}

/// Whether an attribute is record-set bookkeeping rather than a column:
/// names starting with `_` or `fb_`, and the row counter `N`.
pub fn is_internal_var(name: &str) -> bool {
    name.starts_with('_') || name.starts_with("fb_") || name == "N"
}
