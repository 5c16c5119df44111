//! Connection handle behind a record set.
//!
//! The driver only needs one thing from the database connection: quoting
//! field names before they are embedded in ORDER BY clauses.

use datagrid_core::Dialect;

/// The database connection a record set runs its queries on.
pub trait Connection {
    /// SQL dialect spoken by this connection.
    fn dialect(&self) -> Dialect;

    /// Quote an identifier for this connection.
    fn quote_identifier(&self, name: &str) -> String {
        self.dialect().quote_identifier(name)
    }
}

impl Connection for Dialect {
    fn dialect(&self) -> Dialect {
        *self
    }
}
