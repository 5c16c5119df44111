//! Core types and traits for DataGrid data sources.
//!
//! This crate provides the foundational abstractions every driver builds on:
//!
//! - `DataSource` trait for the grid-facing fetch/count/sort contract
//! - `DataSourceOptions` for option storage with default merging and feature flags
//! - `Record` for one output row, `Value` for one cell
//! - `Dialect` for SQL identifier quoting

pub mod error;
pub mod identifiers;
pub mod options;
pub mod record;
pub mod source;
pub mod value;

pub use error::{BindError, ConfigError, CountError, Error, QueryError, QueryErrorKind, Result};
pub use identifiers::{Dialect, quote_ident, quote_ident_mysql};
pub use options::{DataSourceOptions, Feature, Features, OptionValue, Options};
pub use record::{Columns, Record};
pub use source::{DataSource, SortDirection, SortSpec};
pub use value::Value;
