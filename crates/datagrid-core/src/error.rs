//! Error types for data source operations.

use std::fmt;

/// The primary error type for all data source operations.
#[derive(Debug)]
pub enum Error {
    /// Binding errors (wrong source type, nothing bound)
    Bind(BindError),
    /// Row counting failed
    Count(CountError),
    /// The bound record set failed to run or iterate a query
    Query(QueryError),
    /// Malformed option documents
    Config(ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The bound value does not provide the record-set capabilities the driver needs
    TypeMismatch {
        /// Type name the driver expected
        expected: &'static str,
    },
    /// An operation that needs a bound source was called before `bind`
    NotBound,
}

#[derive(Debug)]
pub struct CountError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Which record-set operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Running the pending query (`find`)
    Execute,
    /// Advancing the cursor (`fetch`)
    Fetch,
    /// Optimized row counting (`count`)
    Count,
    /// Following a link to another record set
    Link,
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Build a query error of the given kind.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            message: message.into(),
            source: None,
        })
    }

    /// Is this a failure to bind (or a call made before binding)?
    pub fn is_bind_error(&self) -> bool {
        matches!(self, Error::Bind(_))
    }

    /// Is this a failure to count rows?
    pub fn is_count_error(&self) -> bool {
        matches!(self, Error::Count(_))
    }
}

impl CountError {
    /// Wrap an underlying failure as the cause of a count error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bind(e) => write!(f, "Bind error: {}", e),
            Error::Count(e) => write!(f, "Count error: {}", e.message),
            Error::Query(e) => write!(f, "Query error ({:?}): {}", e.kind, e.message),
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Count(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Bind(_) => None,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::TypeMismatch { expected } => {
                write!(f, "the provided source must be a {}", expected)
            }
            BindError::NotBound => write!(f, "no source has been bound"),
        }
    }
}

impl fmt::Display for CountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Error::Bind(err)
    }
}

impl From<CountError> for Error {
    fn from(err: CountError) -> Self {
        Error::Count(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Result type alias for data source operations.
pub type Result<T> = std::result::Result<T, Error>;
