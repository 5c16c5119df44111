//! Record-set traits implemented by the ORM side.
//!
//! A record set represents one query against one table. It builds its query
//! incrementally (`order_by`, `limit`), runs it with `find`, then walks the
//! result with `fetch`, exposing the current row through its fields.

use datagrid_core::{OptionValue, Result, Value};

use crate::clause::Limit;
use crate::connection::Connection;
use crate::getters::Getters;

/// Read access to a record set's current row and its declared properties.
///
/// This half of the contract is object-safe so linked records of any type
/// can be handed around as `&dyn DataObject`.
pub trait DataObject {
    /// Table this record set maps.
    fn table_name(&self) -> &str;

    /// Value of an attribute on the current row.
    ///
    /// Returns `None` when the attribute does not exist or is unset (NULL).
    fn field(&self, name: &str) -> Option<Value>;

    /// Public field → value mapping of the current row, in table order.
    fn to_map(&self) -> Vec<(String, Value)>;

    /// Names of all attributes, including private ones.
    ///
    /// Defaults to the public field names.
    fn object_vars(&self) -> Vec<String> {
        self.to_map().into_iter().map(|(name, _)| name).collect()
    }

    /// A configuration property declared on the record set
    /// (`fb_fieldsToRender`, `fb_fieldLabels`, and the like).
    fn property(&self, name: &str) -> Option<OptionValue>;

    /// Fields that link to a record in another table.
    fn links(&self) -> Vec<String> {
        Vec::new()
    }

    /// Load the record a link field points at.
    fn get_link(&self, field: &str) -> Result<Option<Box<dyn DataObject>>> {
        let _ = field;
        Ok(None)
    }
}

/// A queryable record set the driver can bind.
///
/// Cloning must produce an independent record set carrying the same pending
/// query; the driver clones to count without disturbing the original.
pub trait RecordSet: DataObject + Clone + 'static {
    /// Run the pending query. Returns the number of rows found.
    fn find(&mut self) -> Result<u64>;

    /// Advance to the next row. Returns `false` once the result is exhausted.
    fn fetch(&mut self) -> Result<bool>;

    /// Optimized row count for the pending query.
    fn count(&mut self) -> Result<u64>;

    /// Append an ORDER BY clause; `None` clears every clause.
    fn order_by(&mut self, clause: Option<&str>);

    /// Restrict the pending query to one page; `None` removes any limit.
    fn limit(&mut self, limit: Option<Limit>);

    /// Connection the query runs on.
    fn connection(&self) -> &dyn Connection;

    /// Row count of the last executed query (0 if none ran).
    fn row_count(&self) -> u64;

    /// Whether a query result is currently held.
    fn has_result(&self) -> bool;

    /// Release the held query result.
    fn free(&mut self);

    /// Getter methods this record set exposes, keyed by method name.
    fn getters() -> Getters<Self> {
        Getters::new()
    }
}
