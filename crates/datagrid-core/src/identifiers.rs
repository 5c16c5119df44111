//! SQL identifier quoting.
//!
//! Field names handed to a data source end up embedded in ORDER BY clauses,
//! so they are always quoted for the target dialect first.

/// SQL dialect of the connection behind a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// PostgreSQL (ANSI double quotes)
    #[default]
    Postgres,
    /// SQLite (ANSI double quotes)
    Sqlite,
    /// MySQL (backticks)
    Mysql,
}

impl Dialect {
    /// Quote an identifier for this dialect.
    ///
    /// Properly escapes embedded quote characters by doubling them:
    /// - For Postgres/SQLite: `"` becomes `""`
    /// - For MySQL: `` ` `` becomes ``` `` ```
    pub fn quote_identifier(self, name: &str) -> String {
        match self {
            Dialect::Postgres | Dialect::Sqlite => quote_ident(name),
            Dialect::Mysql => quote_ident_mysql(name),
        }
    }
}

/// Quote a SQL identifier using ANSI double-quoting.
///
/// Embedded double-quotes are escaped by doubling them (`"` → `""`).
///
/// # Examples
///
/// ```
/// use datagrid_core::quote_ident;
///
/// assert_eq!(quote_ident("users"), "\"users\"");
/// assert_eq!(quote_ident("user\"name"), "\"user\"\"name\"");
/// ```
#[inline]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a SQL identifier using MySQL backtick quoting.
///
/// # Examples
///
/// ```
/// use datagrid_core::quote_ident_mysql;
///
/// assert_eq!(quote_ident_mysql("users"), "`users`");
/// assert_eq!(quote_ident_mysql("user`name"), "`user``name`");
/// ```
#[inline]
pub fn quote_ident_mysql(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
