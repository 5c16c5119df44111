//! In-memory record set recording every call the driver makes.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use datagrid_core::{Dialect, Error, OptionValue, QueryErrorKind, Result, Value};
use datagrid_dataobject::{Connection, DataObject, Getters, Limit, RecordSet};

/// A call made on the record set (or one of its clones).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Find,
    Fetch,
    Count,
    OrderBy(Option<String>),
    Limit(Option<Limit>),
    Free,
}

pub type Row = Vec<(String, Value)>;

#[derive(Debug, Clone)]
pub struct UserSet {
    pub rows: Vec<Row>,
    pub properties: HashMap<String, OptionValue>,
    pub private_vars: Vec<String>,
    pub links: Vec<String>,
    pub dialect: Dialect,
    pub fail_count: bool,
    pub fail_find: bool,
    pub order: Vec<String>,
    pub limit: Option<Limit>,
    pub log: Rc<RefCell<Vec<Call>>>,
    result: Option<Vec<Row>>,
    position: usize,
    current: Option<Row>,
    n: u64,
}

pub fn user(id: i64, first: &str, last: Option<&str>, author_id: Option<i64>) -> Row {
    vec![
        ("id".to_string(), Value::BigInt(id)),
        ("first_name".to_string(), Value::from(first)),
        ("last_name".to_string(), Value::from(last)),
        ("author_id".to_string(), Value::from(author_id)),
    ]
}

impl UserSet {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            properties: HashMap::new(),
            private_vars: vec!["_database".into(), "N".into(), "fb_fieldLabels".into()],
            links: Vec::new(),
            dialect: Dialect::Postgres,
            fail_count: false,
            fail_find: false,
            order: Vec::new(),
            limit: None,
            log: Rc::new(RefCell::new(Vec::new())),
            result: None,
            position: 0,
            current: None,
            n: 0,
        }
    }

    pub fn sample() -> Self {
        Self::new(vec![
            user(1, "ada", Some("Lovelace"), Some(10)),
            user(2, "grace", Some("Hopper"), None),
            user(3, "alan", None, Some(11)),
        ])
    }

    pub fn with_property(mut self, name: &str, value: impl Into<OptionValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.log.borrow_mut().clear();
    }

    pub fn count_calls(&self, call: &Call) -> usize {
        self.log.borrow().iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push(call);
    }
}

impl DataObject for UserSet {
    fn table_name(&self) -> &str {
        "users"
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.current
            .as_ref()?
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_null())
    }

    fn to_map(&self) -> Vec<(String, Value)> {
        self.current.clone().unwrap_or_default()
    }

    fn object_vars(&self) -> Vec<String> {
        let mut vars = self.private_vars.clone();
        vars.extend(self.to_map().into_iter().map(|(name, _)| name));
        vars
    }

    fn property(&self, name: &str) -> Option<OptionValue> {
        self.properties.get(name).cloned()
    }

    fn links(&self) -> Vec<String> {
        self.links.clone()
    }

    fn get_link(&self, field: &str) -> Result<Option<Box<dyn DataObject>>> {
        match (field, self.field(field).and_then(|v| v.as_i64())) {
            ("author_id", Some(10)) => Ok(Some(Box::new(Author::new("Ursula", "Le Guin")))),
            ("author_id", Some(_)) => Err(Error::query(QueryErrorKind::Link, "dangling link")),
            _ => Ok(None),
        }
    }
}

impl RecordSet for UserSet {
    fn find(&mut self) -> Result<u64> {
        self.record(Call::Find);
        if self.fail_find {
            return Err(Error::query(QueryErrorKind::Execute, "result is not numeric"));
        }
        let rows: Vec<Row> = match self.limit {
            None => self.rows.clone(),
            Some(Limit::Length(n)) => self.rows.iter().take(n as usize).cloned().collect(),
            Some(Limit::Window { offset, length }) => self
                .rows
                .iter()
                .skip(offset as usize)
                .take(length.map_or(usize::MAX, |n| n as usize))
                .cloned()
                .collect(),
        };
        self.n = rows.len() as u64;
        self.result = Some(rows);
        self.position = 0;
        Ok(self.n)
    }

    fn fetch(&mut self) -> Result<bool> {
        self.record(Call::Fetch);
        let Some(result) = &self.result else {
            return Ok(false);
        };
        self.current = result.get(self.position).cloned();
        self.position += 1;
        Ok(self.current.is_some())
    }

    fn count(&mut self) -> Result<u64> {
        self.record(Call::Count);
        if self.fail_count {
            return Err(Error::query(QueryErrorKind::Count, "count query failed"));
        }
        Ok(self.rows.len() as u64)
    }

    fn order_by(&mut self, clause: Option<&str>) {
        self.record(Call::OrderBy(clause.map(str::to_string)));
        match clause {
            Some(clause) => self.order.push(clause.to_string()),
            None => self.order.clear(),
        }
    }

    fn limit(&mut self, limit: Option<Limit>) {
        self.record(Call::Limit(limit));
        self.limit = limit;
    }

    fn connection(&self) -> &dyn Connection {
        &self.dialect
    }

    fn row_count(&self) -> u64 {
        self.n
    }

    fn has_result(&self) -> bool {
        self.result.is_some()
    }

    fn free(&mut self) {
        self.record(Call::Free);
        self.result = None;
        self.current = None;
    }

    fn getters() -> Getters<Self> {
        Getters::new().with("getFirstName", |users: &UserSet| {
            users
                .field("first_name")
                .and_then(|v| v.as_str().map(|s| format!("<{}>", s)))
                .map_or(Value::Null, Value::Text)
        })
    }
}

/// A linked record in another table.
pub struct Author {
    first_name: String,
    last_name: String,
}

impl Author {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        }
    }
}

impl DataObject for Author {
    fn table_name(&self) -> &str {
        "authors"
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "first_name" => Some(Value::from(self.first_name.as_str())),
            "last_name" => Some(Value::from(self.last_name.as_str())),
            _ => None,
        }
    }

    fn to_map(&self) -> Vec<(String, Value)> {
        vec![
            ("first_name".into(), Value::from(self.first_name.as_str())),
            ("last_name".into(), Value::from(self.last_name.as_str())),
        ]
    }

    fn property(&self, name: &str) -> Option<OptionValue> {
        (name == "fb_linkDisplayFields")
            .then(|| OptionValue::from(vec!["first_name", "last_name"]))
    }
}
