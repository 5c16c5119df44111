//! ORDER BY and LIMIT clauses handed to the record set.

use datagrid_core::SortDirection;

/// ORDER BY clause for one already-quoted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    column: String,
    direction: Option<SortDirection>,
}

impl OrderBy {
    /// Order by a quoted column with the backend's default direction.
    pub fn new(column: impl Into<String>, direction: Option<SortDirection>) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Generate SQL for this ORDER BY clause.
    pub fn to_sql(&self) -> String {
        match self.direction {
            Some(direction) => format!("{} {}", self.column, direction.as_sql()),
            None => self.column.clone(),
        }
    }
}

/// LIMIT clause for one page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// `LIMIT length`
    Length(u64),
    /// `LIMIT offset, length`; no length means "to the end"
    Window { offset: u64, length: Option<u64> },
}

impl Limit {
    /// The limit a page request translates to, if any.
    ///
    /// A non-zero offset always produces a window. Without an offset only a
    /// non-zero length limits the query.
    pub fn for_page(offset: u64, len: Option<u64>) -> Option<Self> {
        if offset != 0 {
            Some(Limit::Window {
                offset,
                length: len,
            })
        } else {
            len.filter(|&n| n != 0).map(Limit::Length)
        }
    }

    /// Generate SQL for this LIMIT clause (MySQL form).
    pub fn to_sql(&self) -> String {
        match self {
            Limit::Length(n) => format!("LIMIT {}", n),
            Limit::Window {
                offset,
                length: Some(n),
            } => format!("LIMIT {}, {}", offset, n),
            Limit::Window {
                offset,
                length: None,
            } => format!("LIMIT {}, {}", offset, u64::MAX),
        }
    }
}
