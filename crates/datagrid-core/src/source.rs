//! The grid-facing data source contract.

use std::any::Any;

use crate::Result;
use crate::options::{DataSourceOptions, Feature, Options};
use crate::record::Record;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Get the SQL keyword for this direction.
    pub const fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Parse a direction (case-insensitive, surrounding whitespace ignored).
    ///
    /// Returns `None` if the string is not `ASC` or `DESC`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// What to sort by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortSpec {
    /// A single field, with or without an explicit direction
    Single {
        field: String,
        direction: Option<SortDirection>,
    },
    /// Several fields, applied in order
    Multi(Vec<(String, SortDirection)>),
}

impl SortSpec {
    /// Sort by one field using the backend's default direction.
    pub fn field(field: impl Into<String>) -> Self {
        SortSpec::Single {
            field: field.into(),
            direction: None,
        }
    }

    /// Sort by one field in the given direction.
    pub fn with_direction(field: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec::Single {
            field: field.into(),
            direction: Some(direction),
        }
    }

    /// Sort by several fields, in order.
    pub fn multi<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SortDirection)>,
        S: Into<String>,
    {
        SortSpec::Multi(
            entries
                .into_iter()
                .map(|(field, dir)| (field.into(), dir))
                .collect(),
        )
    }
}

/// A source of rows for the grid.
///
/// Drivers adapt a concrete container (a record set, an array, a file) to
/// this contract. The grid binds a container, asks for the total row count,
/// optionally sorts, then fetches one page of records.
pub trait DataSource {
    /// Bind a container to this data source.
    ///
    /// Non-empty `options` are merged into the option store before the
    /// container is checked. A container of the wrong type is rejected with
    /// `BindError::TypeMismatch`.
    fn bind(&mut self, source: Box<dyn Any>, options: Options) -> Result<()>;

    /// Total number of rows the bound container would produce.
    fn count(&mut self) -> Result<u64>;

    /// Fetch a page of records. `len = None` means "up to the end".
    fn fetch(&mut self, offset: u64, len: Option<u64>) -> Result<Vec<Record>>;

    /// Sort the rows. Must be called before `fetch`.
    fn sort(&mut self, spec: SortSpec) -> Result<()>;

    /// The option store.
    fn options(&self) -> &DataSourceOptions;

    /// Mutable access to the option store.
    fn options_mut(&mut self) -> &mut DataSourceOptions;

    /// Merge options over the current values.
    fn set_options(&mut self, options: Options) {
        self.options_mut().set_options(options);
    }

    /// Check whether the driver declared a feature.
    fn has_feature(&self, feature: Feature) -> bool {
        self.options().has_feature(feature)
    }
}
