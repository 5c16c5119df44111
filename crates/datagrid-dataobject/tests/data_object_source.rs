//! Driver behavior against an in-memory record set.

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{Call, UserSet, user};
use datagrid_core::{
    BindError, DataSource, Dialect, Error, Feature, Options, SortDirection, SortSpec, Value,
};
use datagrid_dataobject::{DataObjectSource, Limit};
use serde_json::json;

fn bound(set: UserSet, options: Options) -> DataObjectSource<UserSet> {
    let mut source = DataObjectSource::new();
    source
        .bind(Box::new(set), options)
        .expect("binding a UserSet succeeds");
    source
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_bind_rejects_other_containers() {
    let mut source = DataObjectSource::<UserSet>::new();
    let err = source
        .bind(Box::new(42_u32), Options::new())
        .expect_err("a number is not a record set");

    match err {
        Error::Bind(BindError::TypeMismatch { expected }) => {
            assert!(expected.ends_with("UserSet"), "expected = {expected}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!source.is_bound());
}

#[test]
fn test_operations_require_a_binding() {
    let mut source = DataObjectSource::<UserSet>::new();
    assert!(matches!(source.count(), Err(Error::Bind(BindError::NotBound))));
    assert!(matches!(source.fetch(0, None), Err(Error::Bind(BindError::NotBound))));
    assert!(matches!(
        source.sort(SortSpec::field("id")),
        Err(Error::Bind(BindError::NotBound))
    ));
}

#[test]
fn test_bind_merges_options() {
    let source = bound(UserSet::sample(), Options::new().with("raw_count", true));
    assert!(source.options().bool("raw_count"));
    assert_eq!(source.options().text("fields_property"), Some("fb_fieldsToRender"));
    assert!(source.has_feature(Feature::MultiSort));
}

#[test]
fn test_fields_and_labels_come_from_properties() {
    let labels: BTreeMap<String, String> =
        [("last_name".to_string(), "Surname".to_string())].into();
    let set = UserSet::sample()
        .with_property("fb_fieldsToRender", vec!["last_name", "id"])
        .with_property("fb_fieldLabels", labels.clone());

    let mut source = bound(set, Options::new());
    assert_eq!(source.options().fields(), strings(&["last_name", "id"]));
    assert_eq!(source.options().labels(), Some(&labels));

    let records = source.fetch(0, None).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].to_json(), json!({"last_name": "Lovelace", "id": 1}));
    assert_eq!(records[2].to_json(), json!({"last_name": null, "id": 3}));
}

#[test]
fn test_explicit_fields_take_precedence() {
    let set = UserSet::sample().with_property("fb_fieldsToRender", vec!["last_name"]);
    let mut source = bound(set, Options::new().with("fields", vec!["id"]));
    assert_eq!(source.options().fields(), strings(&["id"]));

    let records = source.fetch(0, Some(1)).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].field_names().collect::<Vec<_>>(), vec!["id"]);
}

#[test]
fn test_explicit_labels_take_precedence() {
    let declared: BTreeMap<String, String> =
        [("last_name".to_string(), "Surname".to_string())].into();
    let explicit: BTreeMap<String, String> =
        [("id".to_string(), "User #".to_string())].into();
    let set = UserSet::sample().with_property("fb_fieldLabels", declared);

    let source = bound(set, Options::new().with("labels", explicit.clone()));
    assert_eq!(source.options().labels(), Some(&explicit));
}

#[test]
fn test_empty_property_name_disables_lookup() {
    let set = UserSet::sample().with_property("fb_fieldsToRender", vec!["last_name"]);
    let mut source = bound(set, Options::new().with("fields_property", ""));
    assert!(source.options().fields().is_empty());

    source.fetch(0, None).unwrap();
    assert_eq!(
        source.options().fields(),
        strings(&["id", "first_name", "last_name", "author_id"])
    );
}

#[test]
fn test_formbuilder_orders_and_strips_fields() {
    let set = UserSet::sample()
        .with_property(
            "fb_fieldsToRender",
            vec!["id", "first_name", "last_name", "__crossLink_tags", "author_id"],
        )
        .with_property("fb_preDefOrder", vec!["last_name", "id"]);

    let source = bound(set.clone(), Options::new().with("formbuilder_integration", true));
    assert_eq!(
        source.options().fields(),
        strings(&["last_name", "id", "first_name", "author_id"])
    );

    let plain = bound(set, Options::new());
    assert_eq!(
        plain.options().fields(),
        strings(&["id", "first_name", "last_name", "__crossLink_tags", "author_id"])
    );
}

#[test]
fn test_count_is_memoized() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set, Options::new());

    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(source.cached_row_count(), Some(3));
    source.fetch(0, None).unwrap();
    assert_eq!(log.count_calls(&Call::Count), 1);
}

#[test]
fn test_rebinding_resets_the_count() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set.clone(), Options::new());
    source.count().unwrap();

    let mut smaller = set;
    smaller.rows.truncate(1);
    source.bind(Box::new(smaller), Options::new()).unwrap();
    assert_eq!(source.cached_row_count(), None);
    assert_eq!(source.count().unwrap(), 1);
    assert_eq!(log.count_calls(&Call::Count), 2);
}

#[test]
fn test_count_uses_the_executed_query() {
    use datagrid_dataobject::RecordSet;

    let mut set = UserSet::sample();
    set.rows.truncate(2);
    set.find().unwrap();
    set.clear_calls();
    let log = set.clone();

    let mut source = bound(set, Options::new());
    assert_eq!(source.count().unwrap(), 2);

    let records = source.fetch(0, Some(10)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(log.count_calls(&Call::Count), 0);
    assert_eq!(log.count_calls(&Call::Find), 0);
    assert!(!log.calls().iter().any(|c| matches!(c, Call::Limit(_))));
}

#[test]
fn test_raw_count_runs_unordered_query_on_a_copy() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set, Options::new().with("raw_count", true));
    source
        .sort(SortSpec::with_direction("last_name", SortDirection::Desc))
        .unwrap();
    log.clear_calls();

    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(log.calls(), vec![Call::OrderBy(None), Call::Find, Call::Free]);

    let object = source.object().unwrap();
    assert_eq!(object.order, vec!["\"last_name\" DESC"]);
    assert!(!datagrid_dataobject::RecordSet::has_result(object));
}

#[test]
fn test_raw_count_failure_is_a_count_error() {
    let mut set = UserSet::sample();
    set.fail_find = true;
    let log = set.clone();
    let mut source = bound(set, Options::new().with("raw_count", true));

    let err = source.count().unwrap_err();
    assert!(err.is_count_error(), "got {err:?}");
    assert_eq!(source.cached_row_count(), None);
    assert_eq!(log.count_calls(&Call::Free), 1);
}

#[test]
fn test_fast_count_failure_is_a_count_error() {
    let mut set = UserSet::sample();
    set.fail_count = true;
    let mut source = bound(set, Options::new());

    let err = source.count().unwrap_err();
    assert!(matches!(err, Error::Count(_)));
    assert!(err.to_string().contains("can't count the number of rows"));
    assert!(source.fetch(0, None).unwrap_err().is_count_error());
}

#[test]
fn test_empty_result_skips_field_derivation() {
    let mut source = bound(UserSet::new(Vec::new()), Options::new());
    let records = source.fetch(0, None).unwrap();

    assert!(records.is_empty());
    assert!(source.options().fields().is_empty());
}

#[test]
fn test_page_requests_translate_to_limits() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set, Options::new());

    let records = source.fetch(0, Some(2)).unwrap();
    assert_eq!(records.len(), 2);
    assert!(log.calls().contains(&Call::Limit(Some(Limit::Length(2)))));

    log.clear_calls();
    let records = source.fetch(1, Some(10)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get_by_name("id"), Some(&Value::BigInt(2)));
    assert!(log.calls().contains(&Call::Limit(Some(Limit::Window {
        offset: 1,
        length: Some(10)
    }))));

    log.clear_calls();
    let records = source.fetch(5, Some(10)).unwrap();
    assert!(records.is_empty());
    assert!(log.calls().contains(&Call::Limit(Some(Limit::Window {
        offset: 5,
        length: Some(10)
    }))));
}

#[test]
fn test_unlimited_fetch_sets_no_limit() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set, Options::new());

    assert_eq!(source.fetch(0, None).unwrap().len(), 3);
    assert_eq!(source.fetch(0, Some(0)).unwrap().len(), 3);
    assert_eq!(log.count_calls(&Call::Limit(None)), 2);
    assert!(!log.calls().iter().any(|c| matches!(c, Call::Limit(Some(_)))));
}

#[test]
fn test_unlimited_fetch_after_a_page_returns_every_row() {
    let mut source = bound(UserSet::sample(), Options::new());

    assert_eq!(source.fetch(0, Some(2)).unwrap().len(), 2);
    let records = source.fetch(0, None).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(source.count().unwrap(), 3);
    assert_eq!(source.object().unwrap().limit, None);
}

#[test]
fn test_repeated_fields_are_collapsed() {
    let mut source = bound(
        UserSet::sample(),
        Options::new().with("fields", vec!["id", "last_name", "id"]),
    );
    let records = source.fetch(0, Some(1)).unwrap();

    assert_eq!(records[0].len(), 2);
    assert_eq!(
        records[0].field_names().collect::<Vec<_>>(),
        vec!["id", "last_name"]
    );
    assert_eq!(records[0].to_json(), json!({"id": 1, "last_name": "Lovelace"}));
}

#[test]
fn test_getters_take_precedence_over_attributes() {
    let mut source = bound(
        UserSet::sample(),
        Options::new().with("fields", vec!["first_name", "last_name", "nickname"]),
    );
    let records = source.fetch(0, None).unwrap();

    assert_eq!(
        records[0].values().cloned().collect::<Vec<_>>(),
        vec![
            Value::Text("<ada>".into()),
            Value::Text("Lovelace".into()),
            Value::Null,
        ]
    );
    assert_eq!(records[2].get_by_name("last_name"), Some(&Value::Null));
}

#[test]
fn test_fields_derived_from_first_row() {
    let mut source = bound(UserSet::sample(), Options::new());
    let records = source.fetch(0, None).unwrap();

    assert_eq!(
        source.options().fields(),
        strings(&["id", "first_name", "last_name", "author_id"])
    );
    assert_eq!(
        records[1].to_json(),
        json!({"id": 2, "first_name": "<grace>", "last_name": "Hopper", "author_id": null})
    );
    assert!(Arc::ptr_eq(&records[0].columns(), &records[2].columns()));
}

#[test]
fn test_private_vars_skip_internal_attributes() {
    let mut set = UserSet::sample();
    set.private_vars = strings(&["_database", "N", "fb_fieldLabels", "secret"]);
    let mut source = bound(set, Options::new().with("use_private_vars", true));
    let records = source.fetch(0, None).unwrap();

    assert_eq!(
        source.options().fields(),
        strings(&["secret", "id", "first_name", "last_name", "author_id"])
    );
    assert_eq!(records[0].get_by_name("secret"), Some(&Value::Null));
}

#[test]
fn test_default_sort_applied_once() {
    let mut set = UserSet::sample().with_property("fb_linkOrderFields", vec!["last_name", "id"]);
    set.dialect = Dialect::Mysql;
    let mut source = bound(set, Options::new());

    source.fetch(0, None).unwrap();
    source.fetch(0, None).unwrap();
    assert_eq!(source.object().unwrap().order, vec!["`last_name`", "`id`"]);
}

#[test]
fn test_sort_quotes_fields() {
    let mut source = bound(UserSet::sample(), Options::new());
    source
        .sort(SortSpec::multi([
            ("last_name", SortDirection::Asc),
            ("first\"name", SortDirection::Desc),
        ]))
        .unwrap();
    source.sort(SortSpec::field("id")).unwrap();

    assert_eq!(
        source.object().unwrap().order,
        vec!["\"last_name\" ASC", "\"first\"\"name\" DESC", "\"id\""]
    );
}

#[test]
fn test_formbuilder_resolves_links() {
    let mut set = UserSet::sample();
    set.links = strings(&["author_id"]);

    let mut source = bound(
        set.clone(),
        Options::new().with("formbuilder_integration", true),
    );
    let records = source.fetch(0, None).unwrap();
    assert_eq!(
        records[0].get_by_name("author_id"),
        Some(&Value::Text("Ursula, Le Guin".into()))
    );
    assert_eq!(records[1].get_by_name("author_id"), Some(&Value::Null));
    // A link that fails to load keeps its raw value.
    assert_eq!(records[2].get_by_name("author_id"), Some(&Value::BigInt(11)));

    let mut plain = bound(set, Options::new());
    let records = plain.fetch(0, None).unwrap();
    assert_eq!(records[0].get_by_name("author_id"), Some(&Value::BigInt(10)));
}

#[test]
fn test_result_released_after_fetch() {
    let set = UserSet::sample();
    let log = set.clone();
    let mut source = bound(set, Options::new());

    source.fetch(0, None).unwrap();
    assert_eq!(log.calls().last(), Some(&Call::Free));
    assert!(!datagrid_dataobject::RecordSet::has_result(
        source.object().unwrap()
    ));
}

#[test]
fn test_rebinding_frees_the_previous_result() {
    use datagrid_dataobject::RecordSet;

    let mut first = UserSet::sample();
    first.find().unwrap();
    let first_log = first.clone();
    let mut source = bound(first, Options::new());

    let second = UserSet::sample();
    let second_log = second.clone();
    source.bind(Box::new(second), Options::new()).unwrap();

    assert_eq!(first_log.calls().last(), Some(&Call::Free));
    assert_eq!(second_log.count_calls(&Call::Free), 0);
    assert!(!source.object().unwrap().has_result());
}

#[test]
fn test_drop_releases_pending_result() {
    use datagrid_dataobject::RecordSet;

    let mut set = UserSet::sample();
    set.find().unwrap();
    let log = set.clone();
    let source = bound(set, Options::new());
    drop(source);

    assert_eq!(log.calls().last(), Some(&Call::Free));
}

#[test]
fn test_unbind_returns_the_record_set() {
    let mut source = bound(
        UserSet::new(vec![user(9, "edsger", None, None)]),
        Options::new(),
    );
    let set = source.unbind().expect("bound");
    assert_eq!(set.rows.len(), 1);
    assert!(!source.is_bound());
}
