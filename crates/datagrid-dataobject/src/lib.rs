//! DataObject driver for DataGrid data sources.
//!
//! `datagrid-dataobject` adapts an ORM record set ("DataObject") to the
//! grid's [`DataSource`](datagrid_core::DataSource) contract:
//!
//! - **Binding** resolves the field list and labels, either from explicit
//!   options or from properties declared on the record set.
//! - **Counting** is delegated to the record set and memoized per binding.
//! - **Sorting and paging** become ORDER BY and LIMIT calls on the pending
//!   query; nothing is sorted or sliced in memory.
//! - **Fetching** copies each row into a [`Record`](datagrid_core::Record),
//!   reading fields through a getter registry resolved at bind time.
//!
//! The record set itself is supplied by the caller through the
//! [`RecordSet`] and [`DataObject`] traits.

pub mod clause;
pub mod connection;
pub mod fields;
pub mod formbuilder;
pub mod getters;
pub mod options;
pub mod record_set;
pub mod source;

pub use clause::{Limit, OrderBy};
pub use connection::Connection;
pub use formbuilder::{DefaultFormBuilder, FormBuilder};
pub use getters::{Accessor, Accessors, Getter, Getters, getter_name};
pub use record_set::{DataObject, RecordSet};
pub use source::DataObjectSource;
