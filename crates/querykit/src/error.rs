//! Error types for querykit

use thiserror::Error;

/// Result type alias for querykit operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error types for statement building
#[derive(Debug, Error)]
pub enum QueryError {
    /// A dialect-dependent helper was called on a builder without a driver
    #[error("No database driver bound to the query (required by {operation})")]
    NoDriver { operation: &'static str },

    /// `from` received a sub-query without an alias
    #[error("Sub-query used in FROM requires an alias")]
    MissingSubqueryAlias,

    /// `extend_where` (or `or_where`/`and_where`) called before any `where_`
    #[error("Cannot extend WHERE: no WHERE clause has been set")]
    NoWhereClause,

    /// A format token could not be resolved (strict mode only)
    #[error("Invalid format token '{token}': {reason}")]
    InvalidToken { token: String, reason: String },

    /// Driver configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error while loading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QueryError {
    /// Create a missing-driver error for the named operation
    pub fn no_driver(operation: &'static str) -> Self {
        Self::NoDriver { operation }
    }

    /// Create an invalid-token error
    pub fn invalid_token(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a missing-driver (configuration) error
    pub fn is_no_driver(&self) -> bool {
        matches!(self, Self::NoDriver { .. })
    }

    /// Check if this is a builder precondition violation
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::MissingSubqueryAlias | Self::NoWhereClause)
    }
}

impl From<toml::de::Error> for QueryError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
