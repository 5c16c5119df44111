//! DataGrid data sources.
//!
//! A grid renders pages of records; a data source produces them. This crate
//! bundles the shared contract with the DataObject driver, which feeds the
//! grid from an ORM record set:
//!
//! ```ignore
//! use datagrid::prelude::*;
//!
//! let mut source = DataObjectSource::<Users>::new();
//! source.bind(Box::new(users), Options::new())?;
//!
//! let total = source.count()?;
//! source.sort(SortSpec::multi([("last_name", SortDirection::Asc)]))?;
//! for record in source.fetch(0, Some(25))? {
//!     println!("{}", record.to_json());
//! }
//! ```

pub use datagrid_core::{
    BindError, Columns, ConfigError, CountError, DataSource, DataSourceOptions, Dialect, Error,
    Feature, Features, OptionValue, Options, QueryError, QueryErrorKind, Record, Result,
    SortDirection, SortSpec, Value, quote_ident, quote_ident_mysql,
};
pub use datagrid_dataobject::{
    Accessor, Accessors, Connection, DataObject, DataObjectSource, DefaultFormBuilder,
    FormBuilder, Getter, Getters, Limit, OrderBy, RecordSet, getter_name,
};

/// Option keys understood by the DataObject driver.
pub mod options {
    pub use datagrid_core::options::{FIELDS, LABELS};
    pub use datagrid_dataobject::options::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Connection, DataObject, DataObjectSource, DataSource, Dialect, Error, Getters, Limit,
        Options, Record, RecordSet, Result, SortDirection, SortSpec, Value,
    };
}
